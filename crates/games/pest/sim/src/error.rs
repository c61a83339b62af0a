use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a placement request was refused. A refused placement changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("cell is outside the grid")]
    OutOfBounds,
    #[error("cell already holds an emplacement")]
    CellOccupied,
    #[error("not enough light")]
    InsufficientResource,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
