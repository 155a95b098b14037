//! HolE: Holographic Embeddings.
//!
//! HolE ([Nickel et al. 2016](https://arxiv.org/abs/1510.04935)) scores a
//! triple by circularly correlating the subject and object embeddings and
//! dotting the result with the relation embedding:
//!
//! ```text
//! score(s, p, o) = σ( r_p · (e_s ⋆ e_o) )
//! ```
//!
//! The correlation compresses all pairwise interactions of `e_s` and `e_o`
//! into one n-dimensional vector, which is what lets a single relation
//! vector pick up asymmetric patterns (⋆ is not commutative).
//!
//! # Why the FFT detour pays
//!
//! | Step | Cost per call |
//! |------|---------------|
//! | naive correlation | O(n²) |
//! | spectrum product + inverse transform | O(n log n) |
//! | spectrum of each entity | precomputed once at load |
//!
//! Rule mining scores millions of candidate triples against the same
//! entity tables, so the per-entity forward transforms are hoisted into
//! load time ([`SpectrumTable`]) and only the product and inverse remain
//! on the hot path. On small workspaces the correlation itself is also
//! memoized per (subject, object) pair, since it does not depend on the
//! predicate being scored.

use std::path::Path;
use std::sync::Arc;

use crate::cache::{CorrelationCache, CACHED_CORREL_THRESHOLD};
use crate::error::Result;
use crate::facts::FactIndex;
use crate::models::ModelKind;
use crate::scoring::{correlation_from_spectra, dot, sigmoid};
use crate::store::{EmbeddingStore, SpectrumTable};
use crate::EmbeddingClient;

/// Holographic embedding client.
///
/// Owns the loaded store, the precomputed entity spectra, and (on small
/// workspaces) the correlation cache. Immutable after construction apart
/// from cache fills; shared across scoring threads via `&self`.
#[derive(Debug)]
pub struct HolE {
    store: EmbeddingStore,
    spectra: SpectrumTable,
    cache: Option<CorrelationCache>,
}

impl HolE {
    /// Load from a workspace directory.
    ///
    /// The correlation cache is enabled automatically iff the entity count
    /// is at most [`CACHED_CORREL_THRESHOLD`].
    pub fn load(workspace: impl AsRef<Path>) -> Result<Self> {
        let store = EmbeddingStore::load(workspace, ModelKind::HolE.vector_file())?;
        let cached = store.n_entities() <= CACHED_CORREL_THRESHOLD;
        Ok(Self::from_store(store, cached))
    }

    /// Load with an explicit cache policy, overriding the entity-count
    /// heuristic.
    pub fn load_with_cache(workspace: impl AsRef<Path>, cached: bool) -> Result<Self> {
        let store = EmbeddingStore::load(workspace, ModelKind::HolE.vector_file())?;
        Ok(Self::from_store(store, cached))
    }

    /// Build from in-memory embeddings (cache policy per the same
    /// entity-count heuristic).
    pub fn from_embeddings(entities: Vec<Vec<f64>>, relations: Vec<Vec<f64>>) -> Result<Self> {
        let store = EmbeddingStore::from_embeddings(entities, relations)?;
        let cached = store.n_entities() <= CACHED_CORREL_THRESHOLD;
        Ok(Self::from_store(store, cached))
    }

    /// Wrap an already-loaded store, precomputing the entity spectra.
    pub fn from_store(store: EmbeddingStore, cached: bool) -> Self {
        let spectra = SpectrumTable::from_table(store.entities());
        Self {
            store,
            spectra,
            cache: cached.then(CorrelationCache::new),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Whether the correlation cache is active.
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of (subject, object) pairs currently cached.
    pub fn cached_pairs(&self) -> usize {
        self.cache.as_ref().map_or(0, CorrelationCache::len)
    }

    /// Correlation of a validated (subject, object) pair, through the
    /// cache when enabled.
    fn correlation(&self, subject: usize, object: usize) -> Arc<[f64]> {
        match &self.cache {
            Some(cache) => {
                cache.get_or_compute(subject, object, || self.correlate(subject, object))
            }
            None => self.correlate(subject, object).into(),
        }
    }

    fn correlate(&self, subject: usize, object: usize) -> Vec<f64> {
        let (s_re, s_im) = self.spectra.row(subject);
        let (o_re, o_im) = self.spectra.row(object);
        correlation_from_spectra(s_re, s_im, o_re, o_im)
    }
}

impl EmbeddingClient for HolE {
    fn score(&self, subject: usize, predicate: usize, object: usize) -> Result<f64> {
        self.store.entity(subject)?;
        self.store.entity(object)?;
        let relation = self.store.relation(predicate)?;
        let corr = self.correlation(subject, object);
        Ok(sigmoid(dot(&corr, relation)))
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
        "HolE"
    }
}
