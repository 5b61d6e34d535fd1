//! # capwatch-capacity
//!
//! Cluster spare-capacity model and computation.
//!
//! Given a snapshot of every active instance's remaining resources (CPU
//! units, memory units, ports in use), this crate derives two scalar
//! metrics for a cluster:
//!
//! - **Container capacity**: how many more standard-size containers can be
//!   placed before the cluster is full. Scale-out signal (trigger when < 1).
//! - **Idle host capacity**: how many whole instances are effectively
//!   unused. Scale-in signal (trigger when > 1.0).
//!
//! Both metrics are bounded by the scarcest resource dimension: CPU,
//! memory, and every monitored TCP/UDP port.
//!
//! This crate is pure computation — no I/O, no wire formats. Fetching
//! instance inventories and publishing the metrics is the capacity agent's
//! job.

mod calc;
mod error;
mod types;

pub use calc::compute_capacity;
pub use error::CapacityError;
pub use types::{CapacityConfig, CapacityResult, ClusterRef, IdleBaseline, InstanceSnapshot};
