//! Inventory collaborator: the cluster's active container instances.
//!
//! The HTTP implementation follows continuation tokens until the backend
//! reports no further page, accumulating every instance in memory before
//! the computation runs. The loop is bounded so a misbehaving backend
//! cannot spin the invocation forever.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use capwatch_capacity::{ClusterRef, InstanceSnapshot};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::resource::{snapshot_from_remaining, ResourceEntry};

/// Upper bound on pagination round-trips per fetch.
pub const MAX_INVENTORY_PAGES: usize = 100;

/// Query interface for the orchestration backend.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// List the cluster's ACTIVE instances, all pages concatenated.
    async fn active_instances(&self, cluster: &ClusterRef) -> Result<Vec<InstanceSnapshot>>;
}

/// One page of the inventory listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePage {
    #[serde(default)]
    pub container_instances: Vec<ContainerInstance>,

    #[serde(default)]
    pub next_token: Option<String>,
}

/// One container instance as reported by the orchestration backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInstance {
    pub container_instance_arn: String,

    pub status: String,

    #[serde(default)]
    pub remaining_resources: Vec<ResourceEntry>,
}

/// HTTP client for the orchestration backend.
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// Create a new inventory client.
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.inventory_api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn active_instances(&self, cluster: &ClusterRef) -> Result<Vec<InstanceSnapshot>> {
        let url = format!(
            "{}/v1/clusters/{}/container-instances",
            self.base_url,
            cluster.short_name()
        );

        let mut instances = Vec::new();
        let mut next_token: Option<String> = None;

        for page in 0..MAX_INVENTORY_PAGES {
            let mut request = self.client.get(&url).query(&[("status", "ACTIVE")]);
            if let Some(token) = &next_token {
                request = request.query(&[("nextToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("inventory query failed: {} - {}", status, body);
            }

            let body: InstancePage = response.json().await?;
            debug!(
                cluster = %cluster.short_name(),
                page,
                instance_count = body.container_instances.len(),
                "Fetched inventory page"
            );

            instances.extend(body.container_instances.iter().map(|instance| {
                snapshot_from_remaining(
                    instance.container_instance_arn.clone(),
                    &instance.remaining_resources,
                )
            }));

            match body.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(instances),
            }
        }

        anyhow::bail!(
            "inventory pagination did not terminate within {} pages",
            MAX_INVENTORY_PAGES
        )
    }
}

/// Mock inventory for testing and development.
pub struct MockInventory {
    instances: Vec<InstanceSnapshot>,
    fail: bool,
}

impl MockInventory {
    /// Create a mock serving a fixed instance list.
    pub fn new(instances: Vec<InstanceSnapshot>) -> Self {
        Self {
            instances,
            fail: false,
        }
    }

    /// Create a mock whose fetches always fail.
    pub fn failing() -> Self {
        Self {
            instances: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl InventoryApi for MockInventory {
    async fn active_instances(&self, _cluster: &ClusterRef) -> Result<Vec<InstanceSnapshot>> {
        if self.fail {
            anyhow::bail!("Mock inventory configured to fail");
        }
        Ok(self.instances.clone())
    }
}
