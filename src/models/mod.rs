//! Embedding model implementations.
//!
//! Each model implements the [`EmbeddingClient`](crate::EmbeddingClient)
//! capability: score an integer-id triple, expose the known-fact indexes,
//! report table sizes. The surrounding mining configuration names which
//! model a workspace holds; [`ModelKind`] turns that name into a client.
//!
//! # Available Models
//!
//! | Model | Geometry | Vector file |
//! |-------|----------|-------------|
//! | [`HolE`] | circular correlation ⋆, dotted with the relation | `hole` |
//! | [`TransE`] | translation distance ‖h + r − t‖ | `transe` |
//!
//! Both map their raw compatibility through the logistic function, so a
//! score is always a plausibility in (0, 1) regardless of the geometry.

mod hole;
mod transe;

pub use hole::HolE;
pub use transe::TransE;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::EmbeddingClient;

/// Which embedding model a workspace holds.
///
/// Deserializes from the configuration spellings `"hole"` and `"transe"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Holographic embeddings (Nickel et al. 2016).
    HolE,
    /// Translation embeddings (Bordes et al. 2013).
    TransE,
}

impl ModelKind {
    /// Name of the vector file this model reads inside a workspace.
    pub fn vector_file(&self) -> &'static str {
        match self {
            ModelKind::HolE => "hole",
            ModelKind::TransE => "transe",
        }
    }

    /// Load the model for `workspace` behind the capability interface.
    pub fn load(&self, workspace: impl AsRef<Path>) -> Result<Box<dyn EmbeddingClient>> {
        Ok(match self {
            ModelKind::HolE => Box::new(HolE::load(workspace)?),
            ModelKind::TransE => Box::new(TransE::load(workspace)?),
        })
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hole" => Ok(ModelKind::HolE),
            "transe" => Ok(ModelKind::TransE),
            other => Err(Error::UnknownModel(other.to_string())),
        }
    }
}
