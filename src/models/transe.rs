//! TransE: translation embeddings.
//!
//! TransE ([Bordes et al. 2013](https://papers.nips.cc/paper/2013/hash/1cecc7a77928ca8133fa24680a88d2f9-Abstract.html))
//! interprets a relation as a translation in embedding space: a true
//! triple satisfies `h + r ≈ t`, so plausibility falls with the distance
//! `‖h + r − t‖₂`. The distance is mapped through the logistic function to
//! keep the (0, 1) score contract shared with [`HolE`](super::HolE); a
//! perfect translation scores 0.5 and anything farther scores below it.
//!
//! Structurally this is the interchangeable second implementation of the
//! scoring capability: same workspace layout, same fact indexes, no
//! spectra and no cache (the distance has no pair-reusable intermediate).

use std::path::Path;

use crate::error::Result;
use crate::facts::FactIndex;
use crate::models::ModelKind;
use crate::scoring::sigmoid;
use crate::store::EmbeddingStore;
use crate::EmbeddingClient;

/// Translation embedding client.
#[derive(Debug, Clone)]
pub struct TransE {
    store: EmbeddingStore,
}

impl TransE {
    /// Load from a workspace directory (vector file `transe`).
    pub fn load(workspace: impl AsRef<Path>) -> Result<Self> {
        let store = EmbeddingStore::load(workspace, ModelKind::TransE.vector_file())?;
        Ok(Self { store })
    }

    /// Build from in-memory embeddings.
    pub fn from_embeddings(entities: Vec<Vec<f64>>, relations: Vec<Vec<f64>>) -> Result<Self> {
        Ok(Self {
            store: EmbeddingStore::from_embeddings(entities, relations)?,
        })
    }

    /// Wrap an already-loaded store.
    pub fn from_store(store: EmbeddingStore) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Translation distance ‖h + r − t‖₂.
    fn distance(h: &[f64], r: &[f64], t: &[f64]) -> f64 {
        let mut sum = 0.0;
        for i in 0..h.len() {
            let diff = h[i] + r[i] - t[i];
            sum += diff * diff;
        }
        sum.sqrt()
    }
}

impl EmbeddingClient for TransE {
    fn score(&self, subject: usize, predicate: usize, object: usize) -> Result<f64> {
        let h = self.store.entity(subject)?;
        let r = self.store.relation(predicate)?;
        let t = self.store.entity(object)?;
        Ok(sigmoid(-Self::distance(h, r, t)))
    }

    fn fact_index(&self, predicate: usize) -> Result<&FactIndex> {
        self.store.fact_index(predicate)
    }

    fn embedding_dim(&self) -> usize {
        self.store.dim()
    }

    fn num_entities(&self) -> usize {
        self.store.n_entities()
    }

    fn num_relations(&self) -> usize {
        self.store.n_relations()
    }

    fn name(&self) -> &'static str {
        "TransE"
    }
}
