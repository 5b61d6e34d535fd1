//! End-to-end handler tests against mocked collaborator APIs.
//!
//! These drive the real HTTP path: the paginated inventory client and the
//! metric sink client, with both backends served by wiremock.

use capwatch_agent::{
    handle_event, AgentError, Config, HttpInventoryClient, HttpMetricSink,
    InstanceStateChangeEvent,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(inventory_url: &str, metrics_url: &str) -> Config {
    Config {
        container_max_cpu: 1024,
        container_max_memory: 993,
        tcp_ports: Vec::new(),
        udp_ports: Vec::new(),
        log_level: "info".to_string(),
        inventory_api_url: inventory_url.to_string(),
        metrics_api_url: metrics_url.to_string(),
        metric_namespace: "ClusterCapacity".to_string(),
    }
}

fn state_change_event(registered: serde_json::Value) -> InstanceStateChangeEvent {
    serde_json::from_value(json!({
        "clusterArn": "arn:cluster/acme-prod",
        "containerInstanceArn": "arn:container-instance/abc",
        "status": "ACTIVE",
        "registeredAt": "2026-07-01T12:00:00Z",
        "registeredResources": registered,
        "remainingResources": []
    }))
    .expect("event fixture is valid")
}

fn full_baseline() -> serde_json::Value {
    json!([
        {"name": "CPU", "type": "INTEGER", "integerValue": 2048},
        {"name": "MEMORY", "type": "INTEGER", "integerValue": 3955}
    ])
}

fn instance(arn: &str, cpu: i64, memory: i64) -> serde_json::Value {
    json!({
        "containerInstanceArn": arn,
        "status": "ACTIVE",
        "remainingResources": [
            {"name": "CPU", "type": "INTEGER", "integerValue": cpu},
            {"name": "MEMORY", "type": "INTEGER", "integerValue": memory}
        ]
    })
}

const INSTANCES_PATH: &str = "/v1/clusters/acme-prod/container-instances";

#[tokio::test]
async fn paginated_inventory_is_concatenated_and_both_metrics_published() {
    let inventory_server = MockServer::start().await;
    let metrics_server = MockServer::start().await;

    // Mount the continuation-page mock first: wiremock picks the first
    // matching mock in mount order, and the first-page mock below matches
    // any token.
    Mock::given(method("GET"))
        .and(path(INSTANCES_PATH))
        .and(query_param("status", "ACTIVE"))
        .and(query_param("nextToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "containerInstances": [instance("arn:container-instance/i-2", 224, 213)]
        })))
        .expect(1)
        .mount(&inventory_server)
        .await;

    Mock::given(method("GET"))
        .and(path(INSTANCES_PATH))
        .and(query_param("status", "ACTIVE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "containerInstances": [instance("arn:container-instance/i-1", 224, 213)],
            "nextToken": "page-2"
        })))
        .expect(1)
        .mount(&inventory_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/metrics"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&metrics_server)
        .await;

    let config = test_config(&inventory_server.uri(), &metrics_server.uri());
    let event = state_change_event(full_baseline());
    let inventory = HttpInventoryClient::new(&config);
    let sink = HttpMetricSink::new(&config);

    let capacity = handle_event(&event, &config, &inventory, &sink)
        .await
        .expect("handler succeeds");

    // Two instances' worth of remainders, concatenated across pages.
    assert!((capacity.cpu_capacity - 448.0 / 1024.0).abs() < 1e-9);
    assert!((capacity.memory_capacity - 426.0 / 993.0).abs() < 1e-9);
    assert!((capacity.container_capacity - 426.0 / 993.0).abs() < 1e-9);
    assert!((capacity.idle_host_capacity - 426.0 / 3955.0).abs() < 1e-9);

    let publishes = metrics_server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(publishes.len(), 2);

    let bodies: Vec<serde_json::Value> = publishes
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("publish body is JSON"))
        .collect();
    assert_eq!(bodies[0]["metricName"], "ContainerCapacity");
    assert_eq!(bodies[1]["metricName"], "IdleHostCapacity");
    assert_eq!(bodies[0]["namespace"], "ClusterCapacity");
    assert_eq!(bodies[0]["dimensions"][0]["name"], "ClusterName");
    assert_eq!(bodies[0]["dimensions"][0]["value"], "acme-prod");
    assert_eq!(bodies[0]["unit"], "Count");
}

#[tokio::test]
async fn malformed_event_publishes_no_metrics() {
    let inventory_server = MockServer::start().await;
    let metrics_server = MockServer::start().await;

    let config = test_config(&inventory_server.uri(), &metrics_server.uri());
    // Baseline missing the CPU entry.
    let event = state_change_event(json!([
        {"name": "MEMORY", "type": "INTEGER", "integerValue": 3955}
    ]));
    let inventory = HttpInventoryClient::new(&config);
    let sink = HttpMetricSink::new(&config);

    let err = handle_event(&event, &config, &inventory, &sink)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::MalformedEvent(_)));

    let inventory_calls = inventory_server.received_requests().await.unwrap();
    let publishes = metrics_server.received_requests().await.unwrap();
    assert!(inventory_calls.is_empty());
    assert!(publishes.is_empty());
}

#[tokio::test]
async fn inventory_server_error_aborts_without_publishing() {
    let inventory_server = MockServer::start().await;
    let metrics_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCES_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&inventory_server)
        .await;

    let config = test_config(&inventory_server.uri(), &metrics_server.uri());
    let event = state_change_event(full_baseline());
    let inventory = HttpInventoryClient::new(&config);
    let sink = HttpMetricSink::new(&config);

    let err = handle_event(&event, &config, &inventory, &sink)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::InventoryFetch(_)));
    assert!(err.to_string().contains("500"));

    let publishes = metrics_server.received_requests().await.unwrap();
    assert!(publishes.is_empty());
}

#[tokio::test]
async fn non_terminating_pagination_is_bounded() {
    let inventory_server = MockServer::start().await;
    let metrics_server = MockServer::start().await;

    // Every page points at another page.
    Mock::given(method("GET"))
        .and(path(INSTANCES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "containerInstances": [],
            "nextToken": "again"
        })))
        .mount(&inventory_server)
        .await;

    let config = test_config(&inventory_server.uri(), &metrics_server.uri());
    let event = state_change_event(full_baseline());
    let inventory = HttpInventoryClient::new(&config);
    let sink = HttpMetricSink::new(&config);

    let err = handle_event(&event, &config, &inventory, &sink)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::InventoryFetch(_)));
    assert!(err.to_string().contains("did not terminate"));

    let publishes = metrics_server.received_requests().await.unwrap();
    assert!(publishes.is_empty());
}
