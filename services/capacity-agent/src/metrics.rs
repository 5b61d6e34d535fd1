//! Metric sink collaborator: publishes capacity metrics to the monitoring
//! backend.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;

/// Metric names published per invocation.
pub const METRIC_CONTAINER_CAPACITY: &str = "ContainerCapacity";
pub const METRIC_IDLE_HOST_CAPACITY: &str = "IdleHostCapacity";

/// One metric datum.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricDatum {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<MetricDimension>,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
}

/// One name/value dimension pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricDimension {
    pub name: String,
    pub value: String,
}

impl MetricDatum {
    /// A Count metric dimensioned by cluster short name.
    pub fn cluster_count(
        namespace: &str,
        metric_name: &str,
        cluster_name: &str,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions: vec![MetricDimension {
                name: "ClusterName".to_string(),
                value: cluster_name.to_string(),
            }],
            timestamp,
            value,
            unit: "Count".to_string(),
        }
    }
}

/// Publish interface for the monitoring backend.
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Publish one metric datum. Failures abort the invocation; an earlier
    /// datum may already be published (no cross-publish atomicity).
    async fn publish(&self, datum: &MetricDatum) -> Result<()>;
}

/// HTTP client for the monitoring backend.
pub struct HttpMetricSink {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMetricSink {
    /// Create a new metric sink client.
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.metrics_api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MetricSink for HttpMetricSink {
    async fn publish(&self, datum: &MetricDatum) -> Result<()> {
        let url = format!("{}/v1/metrics", self.base_url);

        let response = self.client.post(&url).json(datum).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("metric publish failed: {} - {}", status, body);
        }

        debug!(
            metric = %datum.metric_name,
            value = datum.value,
            "Published metric"
        );
        Ok(())
    }
}

/// Recording sink for tests: stores published data in memory.
pub struct RecordingSink {
    published: Mutex<Vec<MetricDatum>>,
    fail: bool,
}

impl RecordingSink {
    /// Create a recording sink.
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Create a recording sink whose publishes always fail.
    pub fn failing() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Everything published so far.
    pub fn published(&self) -> Vec<MetricDatum> {
        self.published
            .lock()
            .expect("recording sink lock poisoned")
            .clone()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn publish(&self, datum: &MetricDatum) -> Result<()> {
        if self.fail {
            anyhow::bail!("Recording sink configured to fail");
        }
        self.published
            .lock()
            .expect("recording sink lock poisoned")
            .push(datum.clone());
        Ok(())
    }
}
