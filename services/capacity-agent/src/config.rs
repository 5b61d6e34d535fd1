//! Configuration for the capacity agent.

use anyhow::Result;
use capwatch_capacity::CapacityConfig;

/// Capacity agent configuration, read from the environment once at startup
/// and passed by reference from there on.
#[derive(Debug, Clone)]
pub struct Config {
    /// CPU units a fully-sized container consumes.
    pub container_max_cpu: i64,

    /// Memory units a fully-sized container consumes.
    pub container_max_memory: i64,

    /// TCP ports to monitor for occupancy.
    pub tcp_ports: Vec<String>,

    /// UDP ports to monitor for occupancy.
    pub udp_ports: Vec<String>,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Orchestration backend base URL.
    pub inventory_api_url: String,

    /// Monitoring backend base URL.
    pub metrics_api_url: String,

    /// Namespace the capacity metrics are published under.
    pub metric_namespace: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let container_max_cpu = std::env::var("CONTAINER_MAX_CPU")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1024);

        let container_max_memory = std::env::var("CONTAINER_MAX_MEMORY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(993);

        let tcp_ports = parse_port_list(&std::env::var("TCP_PORT_RESOURCES").unwrap_or_default());
        let udp_ports = parse_port_list(&std::env::var("UDP_PORT_RESOURCES").unwrap_or_default());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let inventory_api_url = std::env::var("INVENTORY_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        let metrics_api_url = std::env::var("METRICS_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8081".to_string());

        let metric_namespace =
            std::env::var("METRIC_NAMESPACE").unwrap_or_else(|_| "ClusterCapacity".to_string());

        Ok(Self {
            container_max_cpu,
            container_max_memory,
            tcp_ports,
            udp_ports,
            log_level,
            inventory_api_url,
            metrics_api_url,
            metric_namespace,
        })
    }

    /// The capacity-computation view of this configuration.
    pub fn capacity(&self) -> CapacityConfig {
        CapacityConfig {
            container_max_cpu: self.container_max_cpu,
            container_max_memory: self.container_max_memory,
            tcp_ports: self.tcp_ports.clone(),
            udp_ports: self.udp_ports.clone(),
        }
    }
}

/// Split a comma-separated port list, dropping empty entries.
fn parse_port_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
