//! Workspace loading: metadata, embedding tables, known facts.
//!
//! A workspace is a directory with three files:
//!
//! | File | Format |
//! |------|--------|
//! | `meta.txt` | three whitespace-separated integers: entity count, relation count, class count |
//! | `hole` / `transe` | big-endian `f64` stream: dimension, then entity rows, then relation rows |
//! | `train.txt` | whitespace-delimited integer triples `subject predicate object` |
//!
//! The vector file carries no header magic and no per-row lengths; the
//! counts in `meta.txt` fix the layout. The first double encodes the
//! embedding dimension and is rounded before use, tolerating float noise
//! from the exporter. Big-endian matches the JVM `DataOutputStream` format
//! the training pipeline writes.
//!
//! Loading is fail-fast: any IO or parse problem surfaces as a single
//! [`Error`] and no partially-loaded store is ever observable. All tables
//! are immutable after load and safe for unsynchronized concurrent reads.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::facts::FactIndex;
use crate::fft::fft;

/// Workspace metadata from `meta.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of entities.
    pub n_entities: usize,
    /// Number of relations.
    pub n_relations: usize,
    /// Number of entity classes; carried for workspace tooling, unused by
    /// scoring.
    pub n_classes: usize,
}

/// Contiguous row-major table of `f64` embeddings.
///
/// One flat buffer with stride arithmetic instead of a vector of vectors;
/// scoring walks rows sequentially and the layout keeps them on adjacent
/// cache lines.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dim: usize,
    data: Vec<f64>,
}

impl EmbeddingTable {
    pub(crate) fn new(dim: usize, data: Vec<f64>) -> Self {
        debug_assert!(dim > 0);
        debug_assert_eq!(data.len() % dim, 0);
        Self { dim, data }
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Row `i` as a slice. Panics if `i` is out of bounds; callers go
    /// through the bounds-checked [`EmbeddingStore`] accessors.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

/// Forward FFT of every row of an [`EmbeddingTable`], split into real and
/// imaginary planes.
///
/// Row `i` is always the exact transform of table row `i`: both are built
/// once at load and never mutated, so the invariant cannot go stale.
#[derive(Debug, Clone)]
pub struct SpectrumTable {
    dim: usize,
    real: Vec<f64>,
    imag: Vec<f64>,
}

impl SpectrumTable {
    /// Transform every row of `table` once, in parallel.
    pub fn from_table(table: &EmbeddingTable) -> Self {
        let dim = table.dim;
        let mut real = table.data.clone();
        let mut imag = vec![0.0; real.len()];
        real.par_chunks_mut(dim)
            .zip(imag.par_chunks_mut(dim))
            .for_each(|(re, im)| fft(re, im, true));
        Self { dim, real, imag }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.real.len() / self.dim
    }

    /// Real and imaginary planes of row `i`.
    pub fn row(&self, i: usize) -> (&[f64], &[f64]) {
        let span = i * self.dim..(i + 1) * self.dim;
        (&self.real[span.clone()], &self.imag[span])
    }
}

/// Loaded embedding workspace: metadata, entity and relation tables, and
/// the per-predicate known-fact indexes.
///
/// Constructed exactly once, read-only afterward, and shared across
/// scoring worker threads without synchronization.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    meta: Metadata,
    entities: EmbeddingTable,
    relations: EmbeddingTable,
    facts: Vec<FactIndex>,
}

impl EmbeddingStore {
    /// Load a workspace, reading embedding vectors from `vector_file`
    /// (`"hole"` or `"transe"`, depending on the model).
    pub fn load(workspace: impl AsRef<Path>, vector_file: &str) -> Result<Self> {
        let workspace = workspace.as_ref();
        let meta = read_meta(&workspace.join("meta.txt"))?;
        let (entities, relations) = read_vectors(&workspace.join(vector_file), &meta)?;
        let facts = read_facts(&workspace.join("train.txt"), meta.n_relations)?;

        info!(
            n_entities = meta.n_entities,
            n_relations = meta.n_relations,
            dim = entities.dim(),
            workspace = %workspace.display(),
            "loaded embedding workspace"
        );

        Ok(Self {
            meta,
            entities,
            relations,
            facts,
        })
    }

    /// Build a store from in-memory embeddings, with empty fact indexes.
    ///
    /// All rows must share one dimension. Class count is zero.
    pub fn from_embeddings(entities: Vec<Vec<f64>>, relations: Vec<Vec<f64>>) -> Result<Self> {
        let dim = entities
            .first()
            .or_else(|| relations.first())
            .map(Vec::len)
            .unwrap_or(0);
        if dim == 0 {
            return Err(Error::Malformed("no embeddings provided".into()));
        }
        for row in entities.iter().chain(&relations) {
            if row.len() != dim {
                return Err(Error::Malformed(format!(
                    "embedding row has dimension {}, expected {}",
                    row.len(),
                    dim
                )));
            }
        }

        let meta = Metadata {
            n_entities: entities.len(),
            n_relations: relations.len(),
            n_classes: 0,
        };
        let facts = vec![FactIndex::new(); meta.n_relations];
        Ok(Self {
            meta,
            entities: EmbeddingTable::new(dim, entities.concat()),
            relations: EmbeddingTable::new(dim, relations.concat()),
            facts,
        })
    }

    /// Workspace metadata.
    pub fn meta(&self) -> Metadata {
        self.meta
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.entities.dim()
    }

    /// Number of entities.
    pub fn n_entities(&self) -> usize {
        self.meta.n_entities
    }

    /// Number of relations.
    pub fn n_relations(&self) -> usize {
        self.meta.n_relations
    }

    /// Entity embedding table.
    pub fn entities(&self) -> &EmbeddingTable {
        &self.entities
    }

    /// Relation embedding table.
    pub fn relations(&self) -> &EmbeddingTable {
        &self.relations
    }

    /// Bounds-checked entity row.
    pub fn entity(&self, id: usize) -> Result<&[f64]> {
        if id >= self.meta.n_entities {
            return Err(Error::EntityOutOfBounds {
                id,
                n: self.meta.n_entities,
            });
        }
        Ok(self.entities.row(id))
    }

    /// Bounds-checked relation row.
    pub fn relation(&self, id: usize) -> Result<&[f64]> {
        if id >= self.meta.n_relations {
            return Err(Error::RelationOutOfBounds {
                id,
                n: self.meta.n_relations,
            });
        }
        Ok(self.relations.row(id))
    }

    /// Known-fact indexes, one per relation id.
    pub fn facts(&self) -> &[FactIndex] {
        &self.facts
    }

    /// Bounds-checked fact index for one predicate.
    pub fn fact_index(&self, predicate: usize) -> Result<&FactIndex> {
        self.facts
            .get(predicate)
            .ok_or(Error::RelationOutOfBounds {
                id: predicate,
                n: self.meta.n_relations,
            })
    }

    /// Record a known fact, e.g. when building a store in memory.
    pub fn add_fact(&mut self, subject: usize, predicate: usize, object: usize) -> Result<()> {
        if predicate >= self.facts.len() {
            return Err(Error::RelationOutOfBounds {
                id: predicate,
                n: self.meta.n_relations,
            });
        }
        self.facts[predicate].add_fact(subject, object);
        Ok(())
    }
}

fn read_meta(path: &Path) -> Result<Metadata> {
    let text = fs::read_to_string(path)?;
    let mut fields = text.split_whitespace().map(|tok| {
        tok.parse::<usize>()
            .map_err(|_| Error::Malformed(format!("meta.txt: bad integer '{tok}'")))
    });
    let mut next = |name: &str| -> Result<usize> {
        match fields.next() {
            Some(value) => value,
            None => Err(Error::Malformed(format!("meta.txt: missing {name}"))),
        }
    };
    let meta = Metadata {
        n_entities: next("entity count")?,
        n_relations: next("relation count")?,
        n_classes: next("class count")?,
    };
    debug!(path = %path.display(), ?meta, "read metadata");
    Ok(meta)
}

fn read_vectors(path: &Path, meta: &Metadata) -> Result<(EmbeddingTable, EmbeddingTable)> {
    let bytes = fs::read(path)?;
    if bytes.len() % 8 != 0 {
        return Err(Error::Malformed(format!(
            "{}: length {} is not a multiple of 8",
            path.display(),
            bytes.len()
        )));
    }

    let mut doubles = Vec::with_capacity(bytes.len() / 8);
    for chunk in bytes.chunks_exact(8) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        doubles.push(f64::from_be_bytes(raw));
    }

    let dim_raw = *doubles.first().ok_or_else(|| {
        Error::Malformed(format!("{}: vector file is empty", path.display()))
    })?;
    let rounded = dim_raw.round();
    if !rounded.is_finite() || rounded < 1.0 || (dim_raw - rounded).abs() > 1e-3 {
        return Err(Error::Malformed(format!(
            "{}: bad embedding dimension {dim_raw}",
            path.display()
        )));
    }
    let dim = rounded as usize;

    let expected = (meta.n_entities + meta.n_relations) * dim;
    let actual = doubles.len() - 1;
    if actual != expected {
        return Err(Error::Malformed(format!(
            "{}: holds {actual} doubles, expected {expected} \
             ({} entities + {} relations at dimension {dim})",
            path.display(),
            meta.n_entities,
            meta.n_relations
        )));
    }

    let entity_end = 1 + meta.n_entities * dim;
    let entities = EmbeddingTable::new(dim, doubles[1..entity_end].to_vec());
    let relations = EmbeddingTable::new(dim, doubles[entity_end..].to_vec());
    debug!(path = %path.display(), dim, "read vector file");
    Ok((entities, relations))
}

fn read_facts(path: &Path, n_relations: usize) -> Result<Vec<FactIndex>> {
    let text = fs::read_to_string(path)?;
    let mut facts = vec![FactIndex::new(); n_relations];

    let mut tokens = text.split_whitespace();
    let mut count = 0usize;
    while let Some(first) = tokens.next() {
        let (second, third) = match (tokens.next(), tokens.next()) {
            (Some(p), Some(o)) => (p, o),
            _ => {
                return Err(Error::Malformed(format!(
                    "{}: trailing tokens, triples must come in threes",
                    path.display()
                )))
            }
        };
        let parse = |tok: &str| {
            tok.parse::<usize>()
                .map_err(|_| Error::Malformed(format!("{}: bad id '{tok}'", path.display())))
        };
        let (s, p, o) = (parse(first)?, parse(second)?, parse(third)?);
        if p >= n_relations {
            return Err(Error::Malformed(format!(
                "{}: predicate {p} out of bounds ({n_relations} relations)",
                path.display()
            )));
        }
        facts[p].add_fact(s, o);
        count += 1;
    }
    debug!(path = %path.display(), triples = count, "read training facts");
    Ok(facts)
}
