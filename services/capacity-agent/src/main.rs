//! Capwatch capacity agent.
//!
//! Invoked once per container-instance state-change event: the platform
//! delivers one payload (stdin, or `--event-file`), the agent fetches the
//! cluster's active instances, computes spare capacity, publishes the two
//! metrics, and exits. On any failure the invocation exits non-zero with
//! nothing further published; redelivery is the platform's call.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use capwatch_agent::{
    handle_event, Config, HttpInventoryClient, HttpMetricSink, InstanceStateChangeEvent,
};

#[derive(Debug, Parser)]
#[command(
    name = "capacity-agent",
    about = "Publishes cluster spare-capacity metrics for one state-change event"
)]
struct Cli {
    /// Read the trigger event from a file instead of stdin.
    #[arg(long)]
    event_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before tracing so LOG_LEVEL can seed the filter;
    // RUST_LOG still wins when set.
    let config = Config::from_env()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        inventory_api_url = %config.inventory_api_url,
        metrics_api_url = %config.metrics_api_url,
        metric_namespace = %config.metric_namespace,
        tcp_ports = ?config.tcp_ports,
        udp_ports = ?config.udp_ports,
        "Configuration loaded"
    );

    let payload = read_event_payload(&cli)?;
    debug!(payload = %payload, "Received event payload");

    let event = InstanceStateChangeEvent::from_json(&payload)?;

    let inventory = HttpInventoryClient::new(&config);
    let sink = HttpMetricSink::new(&config);

    match handle_event(&event, &config, &inventory, &sink).await {
        Ok(capacity) => {
            info!(
                cluster = %event.cluster().short_name(),
                container_capacity = capacity.container_capacity,
                idle_host_capacity = capacity.idle_host_capacity,
                "Capacity metrics published"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Invocation failed");
            Err(e.into())
        }
    }
}

fn read_event_payload(cli: &Cli) -> Result<String> {
    match &cli.event_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read event from stdin")?;
            Ok(buf)
        }
    }
}
