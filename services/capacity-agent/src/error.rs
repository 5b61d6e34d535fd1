//! Error taxonomy for the capacity agent.

use capwatch_capacity::CapacityError;
use thiserror::Error;

/// Failures that abort an invocation.
///
/// None of these are retried internally; a failed invocation publishes no
/// further metrics and the platform decides whether to redeliver the event.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The trigger payload is missing required resource entries.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// The inventory collaborator failed, or pagination did not terminate.
    #[error("inventory fetch failed: {0}")]
    InventoryFetch(String),

    /// The metric sink rejected a publish call.
    #[error("metric publish failed: {0}")]
    MetricPublish(String),

    /// Capacity computation failed.
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// The trigger payload is not valid JSON.
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}
