//! Spare-capacity computation.
//!
//! Aggregates per-instance resource remainders into the two cluster
//! metrics. Capacity can never exceed the scarcest dimension: the final
//! values are minimums over the CPU sum, the memory sum, and the free-slot
//! count of every monitored port.

use std::collections::HashSet;

use crate::error::CapacityError;
use crate::types::{CapacityConfig, CapacityResult, IdleBaseline, InstanceSnapshot};

/// Computes container capacity and idle-host capacity for a cluster.
///
/// An empty instance list is a valid input: every sum is zero and both
/// results are zero. A zero baseline CPU or memory is a data inconsistency
/// and fails the computation, since the idle-host divisor would be zero.
pub fn compute_capacity(
    instances: &[InstanceSnapshot],
    config: &CapacityConfig,
    baseline: &IdleBaseline,
) -> Result<CapacityResult, CapacityError> {
    if config.container_max_cpu == 0 {
        return Err(CapacityError::ZeroContainerMax { resource: "CPU" });
    }
    if config.container_max_memory == 0 {
        return Err(CapacityError::ZeroContainerMax { resource: "MEMORY" });
    }
    if baseline.cpu == 0 {
        return Err(CapacityError::ZeroIdleBaseline { resource: "CPU" });
    }
    if baseline.memory == 0 {
        return Err(CapacityError::ZeroIdleBaseline { resource: "MEMORY" });
    }

    let mut cpu_capacity = 0.0;
    let mut memory_capacity = 0.0;
    for instance in instances {
        cpu_capacity += instance.remaining_cpu as f64 / config.container_max_cpu as f64;
        memory_capacity += instance.remaining_memory as f64 / config.container_max_memory as f64;
    }

    let tcp_term = min_port_slots(instances, &config.tcp_ports, |i| &i.tcp_ports_in_use);
    let udp_term = min_port_slots(instances, &config.udp_ports, |i| &i.udp_ports_in_use);

    let container_capacity = cpu_capacity.min(memory_capacity).min(tcp_term).min(udp_term);

    // Idle hosts: how many whole registered-size instances the spare
    // capacity amounts to. The divisor is the baseline expressed in
    // container-sized fractions; downstream alarms are calibrated to this
    // exact arithmetic.
    let idle_cpu = cpu_capacity / (baseline.cpu as f64 / config.container_max_cpu as f64);
    let idle_memory =
        memory_capacity / (baseline.memory as f64 / config.container_max_memory as f64);
    let idle_host_capacity = idle_cpu.min(idle_memory).min(tcp_term).min(udp_term);

    Ok(CapacityResult {
        cpu_capacity,
        memory_capacity,
        container_capacity,
        idle_host_capacity,
    })
}

/// Free container slots in one port family: for each monitored port, the
/// count of instances not already using it; minimum over the family.
///
/// With nothing monitored the family does not constrain placement and the
/// term is the instance count, one slot per active instance. Occupancy is
/// counted per instance, so a term is never negative.
fn min_port_slots<'a>(
    instances: &'a [InstanceSnapshot],
    ports: &[String],
    in_use: impl Fn(&'a InstanceSnapshot) -> &'a HashSet<String>,
) -> f64 {
    if ports.is_empty() {
        return instances.len() as f64;
    }

    ports
        .iter()
        .map(|port| {
            let occupied = instances.iter().filter(|&i| in_use(i).contains(port)).count();
            (instances.len() - occupied) as f64
        })
        .fold(f64::INFINITY, f64::min)
}
