//! End-to-end tests for the logs subscription channel over a real WebSocket.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use logstream_gateway::app_state::AppState;
use logstream_gateway::config::GatewayConfig;
use logstream_gateway::domain::LogBus;
use logstream_gateway::ws::{self, LogsChannel};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const ADMIN_TOKEN: &str = "test-admin-token";

/// Starts a gateway on an ephemeral port, returning its address, the bus
/// feeding it, and the logs channel for registry assertions.
async fn start_gateway() -> (SocketAddr, LogBus, Arc<LogsChannel>) {
    let Ok(listen_addr) = "127.0.0.1:0".parse::<SocketAddr>() else {
        panic!("loopback address must parse");
    };
    let config = Arc::new(GatewayConfig {
        listen_addr,
        log_bus_capacity: 64,
        admin_token: Some(ADMIN_TOKEN.to_string()),
    });

    let bus = LogBus::new(config.log_bus_capacity);
    let logs = Arc::new(LogsChannel::new());
    logs.spawn_fanout(&bus);

    let state = AppState {
        logs: Arc::clone(&logs),
        config,
    };
    let app = ws::build_router().with_state(state);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, bus, logs)
}

async fn connect(addr: SocketAddr, token: Option<&str>) -> WsClient {
    let url = match token {
        Some(token) => format!("ws://{addr}/ws?access_token={token}"),
        None => format!("ws://{addr}/ws"),
    };
    let Ok((ws, _)) = tokio_tungstenite::connect_async(url).await else {
        panic!("ws connect failed");
    };
    ws
}

async fn send_json(ws: &mut WsClient, value: &Value) {
    let Ok(text) = serde_json::to_string(value) else {
        panic!("request must serialize");
    };
    let Ok(()) = ws.send(Message::text(text)).await else {
        panic!("ws send failed");
    };
}

async fn recv_json(ws: &mut WsClient) -> Value {
    let frame = tokio::time::timeout(Duration::from_secs(2), ws.next()).await;
    let Ok(Some(Ok(message))) = frame else {
        panic!("expected a frame within 2s");
    };
    let Ok(text) = message.into_text() else {
        panic!("expected a text frame");
    };
    let Ok(value) = serde_json::from_str(text.as_str()) else {
        panic!("frame was not valid JSON");
    };
    value
}

async fn assert_silent(ws: &mut WsClient) {
    let frame = tokio::time::timeout(Duration::from_millis(300), ws.next()).await;
    assert!(frame.is_err(), "expected no further frames, got {frame:?}");
}

#[tokio::test]
async fn admin_subscribe_stream_unsubscribe_round_trip() {
    let (addr, bus, _logs) = start_gateway().await;
    let mut ws = connect(addr, Some(ADMIN_TOKEN)).await;

    send_json(&mut ws, &json!({"type": "subscribe_logs"})).await;
    let ack = recv_json(&mut ws).await;
    assert_eq!(ack, json!({"channel": "logs", "event": "subscribe_logs"}));

    bus.publish(json!({"level": "info", "msg": "x"}).into());
    let data = recv_json(&mut ws).await;
    assert_eq!(
        data,
        json!({"channel": "logs", "data": {"level": "info", "msg": "x"}})
    );

    send_json(&mut ws, &json!({"type": "unsubscribe_logs"})).await;
    let ack = recv_json(&mut ws).await;
    assert_eq!(ack, json!({"channel": "logs", "event": "unsubscribe_logs"}));

    bus.publish(json!({"level": "info", "msg": "y"}).into());
    assert_silent(&mut ws).await;
}

#[tokio::test]
async fn non_admin_is_forbidden_and_excluded_from_fanout() {
    let (addr, bus, _logs) = start_gateway().await;
    let mut admin = connect(addr, Some(ADMIN_TOKEN)).await;
    let mut intruder = connect(addr, Some("wrong-token")).await;

    send_json(&mut admin, &json!({"type": "subscribe_logs"})).await;
    let _ack = recv_json(&mut admin).await;

    send_json(&mut intruder, &json!({"type": "subscribe_logs"})).await;
    let refusal = recv_json(&mut intruder).await;
    assert_eq!(refusal["channel"], "logs");
    assert_eq!(refusal["error"]["code"], "FORBIDDEN");

    bus.publish(json!({"msg": "sensitive"}).into());
    let data = recv_json(&mut admin).await;
    assert_eq!(data["data"]["msg"], "sensitive");
    assert_silent(&mut intruder).await;
}

#[tokio::test]
async fn anonymous_connection_is_forbidden() {
    let (addr, _bus, _logs) = start_gateway().await;
    let mut ws = connect(addr, None).await;

    send_json(&mut ws, &json!({"type": "subscribe_logs"})).await;
    let refusal = recv_json(&mut ws).await;
    assert_eq!(refusal["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn closing_the_connection_drops_its_subscription() {
    let (addr, bus, logs) = start_gateway().await;
    let mut ws = connect(addr, Some(ADMIN_TOKEN)).await;

    send_json(&mut ws, &json!({"type": "subscribe_logs"})).await;
    let _ack = recv_json(&mut ws).await;
    assert_eq!(logs.registry().len().await, 1);

    let Ok(()) = ws.close(None).await else {
        panic!("ws close failed");
    };

    // Cleanup is asynchronous; wait for the lifecycle signal to land.
    let mut emptied = false;
    for _ in 0..50 {
        if logs.registry().is_empty().await {
            emptied = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(emptied, "close signal must remove the subscription");

    // A publish after cleanup reaches nobody and disturbs nothing.
    bus.publish(json!({"msg": "x"}).into());
}

#[tokio::test]
async fn unrelated_channel_traffic_is_ignored() {
    let (addr, bus, _logs) = start_gateway().await;
    let mut ws = connect(addr, Some(ADMIN_TOKEN)).await;

    // Another channel's message: silently discarded by the dispatch gate.
    send_json(&mut ws, &json!({"type": "subscribe", "collection": "items"})).await;
    assert_silent(&mut ws).await;

    // Still fully functional afterwards.
    send_json(&mut ws, &json!({"type": "subscribe_logs"})).await;
    let ack = recv_json(&mut ws).await;
    assert_eq!(ack["event"], "subscribe_logs");

    bus.publish(json!({"msg": "x"}).into());
    let data = recv_json(&mut ws).await;
    assert_eq!(data["data"]["msg"], "x");
}

#[tokio::test]
async fn untyped_garbage_gets_a_malformed_error() {
    let (addr, _bus, _logs) = start_gateway().await;
    let mut ws = connect(addr, Some(ADMIN_TOKEN)).await;

    let Ok(()) = ws.send(Message::text("not json at all")).await else {
        panic!("ws send failed");
    };
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["error"]["code"], "MALFORMED_REQUEST");
}
