//! Trigger event: a container-instance state change.
//!
//! The platform delivers one of these per invocation. The event itself is
//! only the trigger plus the idle-instance baseline; the cluster-wide
//! inventory is fetched separately.

use capwatch_capacity::{ClusterRef, IdleBaseline};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AgentError;
use crate::resource::{integer_resource, ResourceEntry, RESOURCE_CPU, RESOURCE_MEMORY};

/// A container-instance state-change event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStateChangeEvent {
    /// Identifier of the cluster the instance belongs to.
    pub cluster_arn: String,

    /// Identifier of the instance whose state changed.
    pub container_instance_arn: String,

    /// Instance status at event time.
    pub status: String,

    /// When the instance registered with the cluster.
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,

    /// The instance's fully-idle resource baseline.
    #[serde(default)]
    pub registered_resources: Vec<ResourceEntry>,

    /// The instance's unused resources at event time.
    #[serde(default)]
    pub remaining_resources: Vec<ResourceEntry>,
}

impl InstanceStateChangeEvent {
    /// Parse an event from a raw JSON payload.
    pub fn from_json(payload: &str) -> Result<Self, AgentError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// The cluster this event is scoped to.
    pub fn cluster(&self) -> ClusterRef {
        ClusterRef::new(self.cluster_arn.clone())
    }

    /// Extract the idle-instance baseline from the registered resources.
    ///
    /// CPU and MEMORY integer entries are required; a payload without them
    /// is malformed and the invocation aborts before any fetch or publish.
    pub fn idle_baseline(&self) -> Result<IdleBaseline, AgentError> {
        let cpu = integer_resource(&self.registered_resources, RESOURCE_CPU).ok_or_else(|| {
            AgentError::MalformedEvent("registeredResources has no CPU entry".to_string())
        })?;
        let memory =
            integer_resource(&self.registered_resources, RESOURCE_MEMORY).ok_or_else(|| {
                AgentError::MalformedEvent("registeredResources has no MEMORY entry".to_string())
            })?;

        Ok(IdleBaseline { cpu, memory })
    }
}
