#![allow(clippy::float_cmp)]

use std::time::Duration;

use futures_util::SinkExt;
use futures_util::stream::{self, BoxStream};
use stage::config::StageConfig;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use super::*;

const FRAME: &str = r#"{
    "head_rotation": {"x": 0, "y": 10, "z": 0},
    "iris": {"x": 0.2, "y": -0.1},
    "mouth": {"x": 0.1, "y": 0.3},
    "eye": {"left": 1, "right": 0.5}
}"#;

type Feed = BoxStream<'static, Result<Message, tungstenite::Error>>;

fn config(max_ticks: Option<u64>) -> RunnerConfig {
    RunnerConfig {
        url: String::new(),
        tick_interval: Duration::from_millis(1),
        width: 800.0,
        height: 600.0,
        stage: StageConfig::default(),
        max_ticks,
        log_every: 0,
    }
}

/// Yields `messages`, then stays open forever.
fn open_feed(messages: Vec<Message>) -> Feed {
    stream::iter(messages.into_iter().map(Ok)).chain(stream::pending()).boxed()
}

/// Yields `messages`, then ends.
fn closing_feed(messages: Vec<Message>) -> Feed {
    stream::iter(messages.into_iter().map(Ok)).boxed()
}

// =============================================================
// Feed handling
// =============================================================

#[tokio::test]
async fn stream_end_is_connection_loss() {
    let summary = drive(&config(None), closing_feed(vec![Message::text(FRAME)])).await;
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.outcome, Outcome::ConnectionLost("stream ended".to_owned()));
    assert!(summary.connection_lost());
    assert!(summary.last_frame.is_some());
}

#[tokio::test]
async fn close_frame_reason_is_reported() {
    let close = Message::Close(Some(CloseFrame { code: CloseCode::Away, reason: "tracker stopped".into() }));
    let summary = drive(&config(None), closing_feed(vec![close])).await;
    assert_eq!(summary.outcome, Outcome::ConnectionLost("closed by peer (1001): tracker stopped".to_owned()));
}

#[tokio::test]
async fn transport_error_is_connection_loss() {
    let feed = stream::iter(vec![Err(tungstenite::Error::ConnectionClosed)]).boxed();
    let summary = drive(&config(None), feed).await;
    assert!(summary.connection_lost());
    assert_eq!(summary.accepted, 0);
}

#[tokio::test]
async fn malformed_messages_are_counted_and_skipped() {
    let feed = closing_feed(vec![
        Message::text("not json"),
        Message::text(FRAME),
        Message::text(r#"{"head_rotation": 3}"#),
    ]);
    let summary = drive(&config(None), feed).await;
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.dropped, 2);
}

#[tokio::test]
async fn binary_frames_are_accepted() {
    let summary = drive(&config(None), closing_feed(vec![Message::binary(FRAME.as_bytes().to_vec())])).await;
    assert_eq!(summary.accepted, 1);
}

#[tokio::test]
async fn control_frames_are_ignored() {
    let feed = closing_feed(vec![Message::Ping(Vec::new().into()), Message::Pong(Vec::new().into())]);
    let summary = drive(&config(None), feed).await;
    assert_eq!(summary.accepted + summary.dropped, 0);
    assert_eq!(summary.outcome, Outcome::ConnectionLost("stream ended".to_owned()));
}

// =============================================================
// Ticks
// =============================================================

#[tokio::test]
async fn tick_limit_completes_the_run() {
    let summary = drive(&config(Some(3)), open_feed(Vec::new())).await;
    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.draws, 3);
    assert!(summary.params.is_empty());
}

#[tokio::test]
async fn ticks_pose_the_rig_from_the_latest_frame() {
    let summary = drive(&config(Some(5)), open_feed(vec![Message::text(FRAME)])).await;
    assert_eq!(summary.params.get("PARAM_ANGLE_X"), Some(&10.0));
    assert_eq!(summary.params.get("PARAM_ANGLE_Y"), Some(&180.0));
    assert_eq!(summary.params.len(), 12);
    assert_eq!(summary.position, (400.0, 300.0));
    assert_eq!(summary.scale, 0.4);
}

#[tokio::test]
async fn summary_serializes_outcome_with_reason() {
    let summary = drive(&config(None), closing_feed(Vec::new())).await;
    let json = serde_json::to_value(&summary).expect("serialize");
    assert_eq!(json["outcome"]["kind"], "connection_lost");
    assert_eq!(json["outcome"]["reason"], "stream ended");
    assert!(json.get("last_frame").is_none());
}

// =============================================================
// Live socket
// =============================================================

#[tokio::test]
async fn run_reads_from_a_live_socket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(tcp).await.expect("handshake");
        ws.send(Message::text(FRAME)).await.expect("send");
        tokio::time::sleep(Duration::from_millis(50)).await;
        ws.close(None).await.expect("close");
    });

    let mut cfg = config(None);
    cfg.url = format!("ws://{addr}");
    let summary = run(&cfg).await.expect("run");
    server.await.expect("server task");

    assert_eq!(summary.accepted, 1);
    assert!(summary.connection_lost());
    assert_eq!(summary.params.get("PARAM_ANGLE_X"), Some(&10.0));
}

#[tokio::test]
async fn unreachable_feed_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut cfg = config(Some(1));
    cfg.url = format!("ws://{addr}");
    let err = run(&cfg).await.expect_err("nothing listening");
    assert!(matches!(err, RunnerError::WsConnect(_)));
}
