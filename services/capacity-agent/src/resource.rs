//! Resource-entry wire shape shared by the trigger event and the
//! inventory API.
//!
//! The orchestrator reports instance resources as a list of named entries:
//! integer-valued for CPU and memory, string-set-valued for ports. The
//! port sets enumerate ports already committed on the instance.

use std::collections::HashSet;

use capwatch_capacity::InstanceSnapshot;
use serde::{Deserialize, Serialize};

/// Resource names used by the orchestrator.
pub const RESOURCE_CPU: &str = "CPU";
pub const RESOURCE_MEMORY: &str = "MEMORY";
pub const RESOURCE_TCP_PORTS: &str = "PORTS";
pub const RESOURCE_UDP_PORTS: &str = "PORTS_UDP";

/// One named resource entry, integer- or string-set-valued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_set_value: Option<Vec<String>>,
}

/// Look up an integer-valued resource by name.
pub fn integer_resource(entries: &[ResourceEntry], name: &str) -> Option<i64> {
    entries
        .iter()
        .find(|e| e.name == name)
        .and_then(|e| e.integer_value)
}

/// Look up a string-set resource by name. Absent entries are empty sets.
pub fn string_set_resource(entries: &[ResourceEntry], name: &str) -> HashSet<String> {
    entries
        .iter()
        .find(|e| e.name == name)
        .and_then(|e| e.string_set_value.as_ref())
        .map(|v| v.iter().cloned().collect())
        .unwrap_or_default()
}

/// Build a snapshot from an instance's remaining resources.
///
/// Instances missing CPU or MEMORY entries contribute zero remaining
/// capacity; missing port sets are empty. Only the *event baseline* is
/// validated for required entries, not inventory rows.
pub fn snapshot_from_remaining(
    id: impl Into<String>,
    remaining: &[ResourceEntry],
) -> InstanceSnapshot {
    InstanceSnapshot {
        id: id.into(),
        remaining_cpu: integer_resource(remaining, RESOURCE_CPU).unwrap_or(0),
        remaining_memory: integer_resource(remaining, RESOURCE_MEMORY).unwrap_or(0),
        tcp_ports_in_use: string_set_resource(remaining, RESOURCE_TCP_PORTS),
        udp_ports_in_use: string_set_resource(remaining, RESOURCE_UDP_PORTS),
    }
}
