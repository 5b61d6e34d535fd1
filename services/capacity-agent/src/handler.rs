//! Invocation handler: one state-change event in, two capacity metrics out.
//!
//! The flow is sequential: validate the event baseline, fetch the cluster
//! inventory, compute capacity, publish. Any failure aborts the invocation
//! with no further publishes and no retries.

use capwatch_capacity::{compute_capacity, CapacityResult};
use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::error::AgentError;
use crate::event::InstanceStateChangeEvent;
use crate::inventory::InventoryApi;
use crate::metrics::{
    MetricDatum, MetricSink, METRIC_CONTAINER_CAPACITY, METRIC_IDLE_HOST_CAPACITY,
};

/// Handle one state-change event end to end.
pub async fn handle_event(
    event: &InstanceStateChangeEvent,
    config: &Config,
    inventory: &dyn InventoryApi,
    sink: &dyn MetricSink,
) -> Result<CapacityResult, AgentError> {
    let baseline = event.idle_baseline()?;
    let cluster = event.cluster();

    let instances = inventory
        .active_instances(&cluster)
        .await
        .map_err(|e| AgentError::InventoryFetch(e.to_string()))?;

    info!(
        cluster = %cluster.short_name(),
        instance_count = instances.len(),
        "Fetched active instances"
    );

    let capacity = compute_capacity(&instances, &config.capacity(), &baseline)?;

    info!(
        cluster = %cluster.short_name(),
        cpu_capacity = capacity.cpu_capacity,
        memory_capacity = capacity.memory_capacity,
        container_capacity = capacity.container_capacity,
        idle_host_capacity = capacity.idle_host_capacity,
        "Computed cluster capacity"
    );

    // Both metrics share one timestamp. The second publish can fail after
    // the first succeeded; the invocation then fails without retrying.
    let timestamp = Utc::now();
    for (name, value) in [
        (METRIC_CONTAINER_CAPACITY, capacity.container_capacity),
        (METRIC_IDLE_HOST_CAPACITY, capacity.idle_host_capacity),
    ] {
        let datum = MetricDatum::cluster_count(
            &config.metric_namespace,
            name,
            cluster.short_name(),
            timestamp,
            value,
        );
        sink.publish(&datum)
            .await
            .map_err(|e| AgentError::MetricPublish(e.to_string()))?;
    }

    Ok(capacity)
}
