//! Error types for holix.

use thiserror::Error;

/// Error type for embedding scoring operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading a workspace file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workspace file exists but does not match the expected layout.
    #[error("Malformed workspace: {0}")]
    Malformed(String),

    /// Entity id outside the loaded table.
    #[error("Entity id {id} out of bounds ({n} entities)")]
    EntityOutOfBounds {
        /// Offending id.
        id: usize,
        /// Loaded entity count.
        n: usize,
    },

    /// Relation id outside the loaded table.
    #[error("Relation id {id} out of bounds ({n} relations)")]
    RelationOutOfBounds {
        /// Offending id.
        id: usize,
        /// Loaded relation count.
        n: usize,
    },

    /// Embedding model name not recognized.
    #[error("Unknown embedding model: {0}")]
    UnknownModel(String),
}

/// Result type for embedding scoring operations.
pub type Result<T> = std::result::Result<T, Error>;
