//! Error types for load planning.

use thiserror::Error;

use crate::model::ValidationError;

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;

/// Precondition failures reported before any packing starts.
///
/// Once the inputs pass validation, planning always completes with a
/// best-effort result; overflow is reported through the unpacked list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The cargo list is empty.
    #[error("Cargo list is empty")]
    EmptyCargo,

    /// No container type is enabled.
    #[error("No enabled container type available")]
    NoEnabledContainers,

    /// A cargo entry failed validation.
    #[error("Invalid cargo '{id}': {source}")]
    InvalidCargo {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// A container entry failed validation.
    #[error("Invalid container '{id}': {source}")]
    InvalidContainer {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Two cargo entries share the same id.
    #[error("Duplicate cargo id: {0}")]
    DuplicateCargoId(String),
}

impl PlanError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::EmptyCargo => "empty_cargo",
            PlanError::NoEnabledContainers => "no_enabled_containers",
            PlanError::InvalidCargo { .. } => "invalid_cargo",
            PlanError::InvalidContainer { .. } => "invalid_container",
            PlanError::DuplicateCargoId(_) => "duplicate_cargo_id",
        }
    }
}
