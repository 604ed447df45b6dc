//! Engine errors. All are raised before the first bar is processed, except in
//! incremental sessions where each pushed bar is checked as it arrives.

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::BarError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no bars to process")]
    EmptyInput,
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("malformed bar at index {index}: {reason}")]
    MalformedBar { index: usize, reason: BarError },
}
