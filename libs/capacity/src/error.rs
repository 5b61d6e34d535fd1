//! Error types for the capacity computation.

use thiserror::Error;

/// Errors that can occur when computing cluster capacity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapacityError {
    /// The idle-instance baseline reports zero for a divisor resource, so
    /// idle-host capacity is undefined.
    #[error("idle baseline has zero {resource}, idle-host capacity is undefined")]
    ZeroIdleBaseline { resource: &'static str },

    /// The configured per-container maximum for a resource is zero, so the
    /// normalized fractions are undefined.
    #[error("configured container max {resource} is zero")]
    ZeroContainerMax { resource: &'static str },
}
