//! HTTP front tested through a real listener.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};

use send_eth::blockchain::ChainClient;
use send_eth::config::ServiceConfig;
use send_eth::lifecycle::{self, Service, Shutdown};

mod common;
use common::{Failure, MockChainClient, MockNode, NodeScript, DEV_ADDRESS, DEV_KEY, OTHER_ADDRESS};

fn config(testnet: bool, node_url: &str) -> ServiceConfig {
    let mut config = ServiceConfig::new(testnet, node_url, node_url);
    config.service.bind_address = "127.0.0.1:0".to_string();
    config
}

async fn start(config: &ServiceConfig, client: Arc<dyn ChainClient>) -> (SocketAddr, Shutdown) {
    let service = Service::bind(config, client).await.unwrap();
    let addr = service.local_addr().unwrap();
    let shutdown = Shutdown::new();
    tokio::spawn(service.serve(shutdown.subscribe()));
    (addr, shutdown)
}

fn body(amount: Value) -> Value {
    json!({
        "source_address": DEV_ADDRESS,
        "target_address": OTHER_ADDRESS,
        "amount": amount,
        "private_key": DEV_KEY,
    })
}

async fn send(addr: SocketAddr, body: &Value) -> (u16, Value) {
    let res = reqwest::Client::new()
        .post(format!("http://{}/send_eth", addr))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn test_successful_transfer() {
    let client = Arc::new(MockChainClient::new(5));
    let (addr, shutdown) = start(&config(true, "ws://unused"), client.clone()).await;

    let (status, response) = send(addr, &body(json!("1.0"))).await;
    assert_eq!(status, 200);
    assert_eq!(response, json!({ "success": true }));
    assert_eq!(client.signed()[0].nonce, 5);

    shutdown.trigger();
}

#[tokio::test]
async fn test_numeric_amount_and_sum_alias() {
    let client = Arc::new(MockChainClient::new(0));
    let (addr, shutdown) = start(&config(true, "ws://unused"), client.clone()).await;

    let (_, response) = send(addr, &body(json!(0.5))).await;
    assert_eq!(response["success"], true);

    let aliased = json!({
        "source_address": DEV_ADDRESS,
        "target_address": OTHER_ADDRESS,
        "sum": "2",
        "private_key": DEV_KEY,
    });
    let (_, response) = send(addr, &aliased).await;
    assert_eq!(response["success"], true);

    let values: Vec<_> = client.signed().iter().map(|tx| tx.value.to::<u128>()).collect();
    assert_eq!(values, vec![500_000_000_000_000_000, 2_000_000_000_000_000_000]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_chain_failure_is_false_not_error() {
    let client = Arc::new(MockChainClient::new(0).failing(Failure::Submit));
    let (addr, shutdown) = start(&config(true, "ws://unused"), client).await;

    let (status, response) = send(addr, &body(json!("1"))).await;
    assert_eq!(status, 200);
    assert_eq!(response, json!({ "success": false }));

    // The service keeps serving after a failed request.
    let (status, _) = send(addr, &body(json!("1"))).await;
    assert_eq!(status, 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let client = Arc::new(MockChainClient::new(0));
    let (addr, shutdown) = start(&config(true, "ws://unused"), client.clone()).await;

    let incomplete = json!({ "source_address": DEV_ADDRESS, "amount": "1" });
    let (status, response) = send(addr, &incomplete).await;
    assert_eq!(status, 400);
    assert_eq!(response, json!({ "success": false }));
    assert!(client.calls().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_and_request_id() {
    let client = Arc::new(MockChainClient::new(0));
    let (addr, shutdown) = start(&config(false, "ws://unused"), client).await;

    let res = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
    let health: Value = res.json().await.unwrap();
    assert_eq!(health, json!({ "status": "ok", "network": "mainnet" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_full_stack_against_websocket_node() {
    let node = MockNode::start(NodeScript {
        nonce: 11,
        ..NodeScript::default()
    })
    .await;
    let config = config(false, &node.url());

    let client = lifecycle::connect(&config).await.unwrap();
    let (addr, shutdown) = start(&config, Arc::new(client)).await;

    let (status, response) = send(addr, &body(json!("0.01"))).await;
    assert_eq!(status, 200);
    assert_eq!(response, json!({ "success": true }));
    assert_eq!(node.raw_transactions().len(), 1);
    assert!(node.methods().contains(&"eth_feeHistory".to_string()));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_node_fails_startup() {
    let mut config = config(true, "ws://127.0.0.1:1");
    config.timeouts.connect_secs = 2;
    let err = lifecycle::connect(&config).await.unwrap_err();
    assert!(matches!(err, send_eth::StartupError::Connection(_)));
}
