//! Domain types for the capacity computation.

use std::collections::HashSet;

/// Opaque cluster identifier, an ARN-like path.
///
/// Metrics are dimensioned by the short name — the final `/`-separated
/// segment of the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterRef(String);

impl ClusterRef {
    /// Creates a ClusterRef from the full identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The final path segment, used as the metric dimension value.
    pub fn short_name(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }

    /// The full identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClusterRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ClusterRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One active cluster member's remaining resources.
///
/// A read-only snapshot taken at invocation time; never mutated. The port
/// sets enumerate ports already committed on the instance (the
/// orchestrator's reporting convention), so a monitored port is occupied
/// on an instance iff it is a member of the set.
#[derive(Debug, Clone, Default)]
pub struct InstanceSnapshot {
    /// Opaque instance identifier.
    pub id: String,

    /// Unused CPU units.
    pub remaining_cpu: i64,

    /// Unused memory units.
    pub remaining_memory: i64,

    /// TCP ports currently in use.
    pub tcp_ports_in_use: HashSet<String>,

    /// UDP ports currently in use.
    pub udp_ports_in_use: HashSet<String>,
}

/// Process-wide capacity configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct CapacityConfig {
    /// CPU units a fully-sized container consumes.
    pub container_max_cpu: i64,

    /// Memory units a fully-sized container consumes.
    pub container_max_memory: i64,

    /// TCP ports to monitor for occupancy.
    pub tcp_ports: Vec<String>,

    /// UDP ports to monitor for occupancy.
    pub udp_ports: Vec<String>,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            container_max_cpu: 1024,
            container_max_memory: 993,
            tcp_ports: Vec::new(),
            udp_ports: Vec::new(),
        }
    }
}

/// The triggering instance's fully-idle resource baseline, taken from its
/// registered resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleBaseline {
    /// Registered CPU units of an idle instance.
    pub cpu: i64,

    /// Registered memory units of an idle instance.
    pub memory: i64,
}

/// Computed capacity for one cluster, valid for one invocation.
///
/// The intermediate CPU and memory sums are carried alongside the two
/// published metrics so callers can log them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityResult {
    /// How many max-sized containers fit in CPU terms, summed across
    /// instances.
    pub cpu_capacity: f64,

    /// How many max-sized containers fit in memory terms.
    pub memory_capacity: f64,

    /// Additional standard-size containers the cluster can accept.
    pub container_capacity: f64,

    /// Estimated count of whole idle instances.
    pub idle_host_capacity: f64,
}
