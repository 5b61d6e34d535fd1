//! Capwatch capacity agent library.
//!
//! The agent runs once per container-instance state-change event: it reads
//! the trigger payload, fetches the cluster's active instances from the
//! orchestration backend (following pagination to exhaustion), computes
//! the cluster's spare capacity, and publishes `ContainerCapacity` and
//! `IdleHostCapacity` to the monitoring backend.
//!
//! ## Modules
//!
//! - `config`: environment configuration, read once at startup
//! - `resource`: the resource-entry wire shape shared by event and inventory
//! - `event`: trigger-event wire types and baseline extraction
//! - `inventory`: paginated orchestration-backend client
//! - `metrics`: metric-sink client
//! - `handler`: the per-invocation flow

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod inventory;
pub mod metrics;
pub mod resource;

// Re-export commonly used types
pub use config::Config;
pub use error::AgentError;
pub use event::InstanceStateChangeEvent;
pub use handler::handle_event;
pub use inventory::{HttpInventoryClient, InventoryApi, MockInventory};
pub use metrics::{HttpMetricSink, MetricDatum, MetricSink, RecordingSink};
