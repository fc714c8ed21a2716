//! Schema generation error types.

use std::path::PathBuf;

use thiserror::Error;

/// A type reaches itself through its own fields.
///
/// `cycle` lists the type names along the loop, starting and ending with the
/// same name (e.g. `["A", "B", "A"]`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cyclic type: {}", .cycle.join(" -> "))]
pub struct CyclicTypeError {
    pub cycle: Vec<String>,
}

/// Errors from the generator's registration and encoding entry points.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Cycle(#[from] CyclicTypeError),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("failed to encode schema: {0}")]
    Encode(#[from] serde_json::Error),
}
