//! Embedding-based fact scoring for knowledge graph rule mining.
//!
//! Knowledge graphs store facts as (subject, predicate, object) triples of
//! integer ids. A rule miner enumerates candidate logical rules over such a
//! graph and needs two cheap oracles per candidate triple:
//!
//! 1. **How plausible is it?** — answered by a pre-trained embedding model.
//! 2. **Is it already known?** — answered by a per-predicate fact index.
//!
//! This crate provides both, built around the HolE scoring engine: load
//! entity/relation vectors from a workspace, precompute the FFT spectrum
//! of every entity once, and score each triple via FFT-accelerated
//! circular correlation in O(n log n) instead of O(n²).
//!
//! ## Models
//!
//! | Model | Hypothesis | Score |
//! |-------|------------|-------|
//! | [`HolE`] | relation picks correlated subject/object patterns | σ(r · (s ⋆ o)) |
//! | [`TransE`] | relations are translations, h + r ≈ t | σ(−‖h + r − t‖₂) |
//!
//! Both implement [`EmbeddingClient`]; the variant is chosen at
//! construction time from configuration via [`ModelKind`], never by
//! downcasting.
//!
//! ## Workspace layout
//!
//! ```text
//! workspace/
//! ├── meta.txt     entity count, relation count, class count
//! ├── hole         big-endian f64: dimension, entity rows, relation rows
//! └── train.txt    known facts, one "s p o" id triple per record
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use holix::{EmbeddingClient, ModelKind};
//!
//! let model = ModelKind::HolE.load("../data/fb15k/")?;
//!
//! // Plausibility of triple (12, 3, 840) in (0, 1).
//! let score = model.score(12, 3, 840)?;
//!
//! // Was it in the training data?
//! let known = model.known_fact(12, 3, 840)?;
//! ```
//!
//! ## Concurrency
//!
//! Loading is a one-shot, fail-fast phase; everything it builds is
//! immutable afterward and shared by reference across scoring worker
//! threads. The only mutable structure is the correlation cache, which
//! publishes each cell at most once behind striped locks (see
//! [`cache::CorrelationCache`]).
//!
//! ## References
//!
//! - Nickel, Rosasco, Poggio (2016). "Holographic Embeddings of
//!   Knowledge Graphs." AAAI.
//! - Bordes et al. (2013). "Translating Embeddings for Modeling
//!   Multi-relational Data." NIPS.

pub mod cache;
pub mod error;
pub mod facts;
pub mod fft;
pub mod models;
pub mod scoring;
pub mod store;

pub use cache::{CorrelationCache, CACHED_CORREL_THRESHOLD};
pub use error::{Error, Result};
pub use facts::FactIndex;
pub use models::{HolE, ModelKind, TransE};
pub use store::{EmbeddingStore, EmbeddingTable, Metadata, SpectrumTable};

/// Capability interface consumed by the rule engine.
///
/// One instance per loaded workspace; all methods take `&self` and are
/// safe to call from many worker threads at once.
pub trait EmbeddingClient: Send + Sync {
    /// Plausibility of the triple (subject, predicate, object), strictly
    /// inside (0, 1).
    ///
    /// Ids outside the loaded tables are caller errors and fail loudly
    /// with [`Error::EntityOutOfBounds`] / [`Error::RelationOutOfBounds`].
    fn score(&self, subject: usize, predicate: usize, object: usize) -> Result<f64>;

    /// Known-fact index for one predicate.
    fn fact_index(&self, predicate: usize) -> Result<&FactIndex>;

    /// Embedding dimension.
    fn embedding_dim(&self) -> usize;

    /// Number of entities.
    fn num_entities(&self) -> usize;

    /// Number of relations.
    fn num_relations(&self) -> usize;

    /// Model name (e.g. "HolE", "TransE").
    fn name(&self) -> &'static str;

    /// Whether (subject, predicate, object) is already a known training
    /// fact.
    fn known_fact(&self, subject: usize, predicate: usize, object: usize) -> Result<bool> {
        Ok(self.fact_index(predicate)?.contains_fact(subject, object))
    }
}
