//! End-to-end tests for the session ingest host.
//!
//! A real mock backend and the real worker app run on loopback ports; the
//! conversational runtime is played by a tokio-tungstenite client. The mock
//! backend counts every request, so profile-skip and no-retry behavior are
//! asserted from the server's point of view.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite, tungstenite::protocol::Message};
use viva_agent::{app, AppState};
use viva_backend::BackendClient;

#[derive(Clone)]
struct MockBackend {
    profile_hits: Arc<AtomicUsize>,
    submit_hits: Arc<AtomicUsize>,
    submissions: Arc<std::sync::Mutex<Vec<serde_json::Value>>>,
    profile_status: StatusCode,
}

async fn profile_route(
    State(mock): State<MockBackend>,
    _headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    mock.profile_hits.fetch_add(1, Ordering::SeqCst);
    (
        mock.profile_status,
        Json(json!({
            "skills": ["Rust", "SQL"],
            "projects": [],
            "education": [],
            "internships": []
        })),
    )
}

async fn scores_route(
    State(mock): State<MockBackend>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    mock.submit_hits.fetch_add(1, Ordering::SeqCst);
    mock.submissions.lock().unwrap().push(body);
    StatusCode::OK
}

/// Spawns the mock backend and the worker, returning the worker's address
/// and the mock's counters.
async fn setup_worker(profile_status: StatusCode) -> (SocketAddr, MockBackend) {
    let mock = MockBackend {
        profile_hits: Arc::new(AtomicUsize::new(0)),
        submit_hits: Arc::new(AtomicUsize::new(0)),
        submissions: Arc::new(std::sync::Mutex::new(Vec::new())),
        profile_status,
    };

    let backend_app = Router::new()
        .route("/students/profile", get(profile_route))
        .route("/interviews/scores", post(scores_route))
        .with_state(mock.clone());

    let backend_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let backend_addr = backend_listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(backend_listener, backend_app).await.unwrap();
    });

    let state = AppState {
        backend: Arc::new(BackendClient::new(format!("http://{}", backend_addr))),
    };
    let worker_app = app(state);

    let worker_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let worker_addr = worker_listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(worker_listener, worker_app).await.unwrap();
    });

    (worker_addr, mock)
}

async fn recv_json(
    ws: &mut (impl StreamExt<Item = Result<Message, tungstenite::Error>> + Unpin),
) -> serde_json::Value {
    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timeout waiting for frame")
        .expect("connection closed")
        .expect("frame error");
    match frame {
        Message::Text(text) => serde_json::from_str(&text).expect("frame is not JSON"),
        other => panic!("expected text frame, got: {:?}", other),
    }
}

const SCORE_UTTERANCE: &str = r#"Thank you for your time. The interview has now concluded. ###SCORES_JSON###{"fluency":8,"grammar":7,"communication":9,"confidence":6,"correctness":8,"overall":8,"feedback":"Good job."}###END_SCORES###"#;

#[tokio::test]
async fn full_session_delivers_scores_to_both_channels() {
    let (addr, mock) = setup_worker(StatusCode::OK).await;

    let url = format!("ws://{}/ws?room=interview-1700000000-stu42&token=tok", addr);
    let (mut ws, _) = connect_async(url).await.expect("failed to connect");

    let ready = recv_json(&mut ws).await;
    assert_eq!(ready["type"], "session_ready");
    let instructions = ready["instructions"].as_str().unwrap();
    assert!(instructions.contains("Rust, SQL"));
    assert!(instructions.contains("###SCORES_JSON###"));
    assert_eq!(mock.profile_hits.load(Ordering::SeqCst), 1);

    for text in ["Good morning. Please introduce yourself.", SCORE_UTTERANCE] {
        let frame = json!({"type": "utterance_committed", "text": text});
        ws.send(Message::Text(frame.to_string().into()))
            .await
            .unwrap();
    }
    ws.send(Message::Text(
        json!({"type": "session_ended"}).to_string().into(),
    ))
    .await
    .unwrap();

    let scores = recv_json(&mut ws).await;
    assert_eq!(scores["type"], "interview_scores");
    assert_eq!(scores["scores"]["fluency"], 8);
    assert_eq!(scores["scores"]["confidence"], 6);
    assert_eq!(scores["scores"]["feedback"], "Good job.");

    assert_eq!(mock.submit_hits.load(Ordering::SeqCst), 1);
    let submissions = mock.submissions.lock().unwrap();
    assert_eq!(submissions[0]["roomName"], "interview-1700000000-stu42");
    assert_eq!(submissions[0]["fluencyScore"], 8);
    assert_eq!(submissions[0]["overallScore"], 8);
}

#[tokio::test]
async fn missing_room_is_rejected_before_upgrade() {
    let (addr, _mock) = setup_worker(StatusCode::OK).await;

    let err = connect_async(format!("ws://{}/ws", addr))
        .await
        .expect_err("connect should fail");
    match err {
        tungstenite::Error::Http(response) => {
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        other => panic!("expected HTTP error, got: {:?}", other),
    }
}

#[tokio::test]
async fn session_without_token_skips_profile_fetch() {
    let (addr, mock) = setup_worker(StatusCode::OK).await;

    let url = format!("ws://{}/ws?room=interview-1-stu7", addr);
    let (mut ws, _) = connect_async(url).await.expect("failed to connect");

    let ready = recv_json(&mut ws).await;
    assert_eq!(ready["type"], "session_ready");
    assert!(ready["instructions"]
        .as_str()
        .unwrap()
        .contains("not specified"));
    assert_eq!(mock.profile_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_profile_fetch_degrades_to_empty_prompt() {
    let (addr, mock) = setup_worker(StatusCode::INTERNAL_SERVER_ERROR).await;

    let url = format!("ws://{}/ws?room=interview-1-stu7&token=tok", addr);
    let (mut ws, _) = connect_async(url).await.expect("failed to connect");

    let ready = recv_json(&mut ws).await;
    assert_eq!(ready["type"], "session_ready");
    let instructions = ready["instructions"].as_str().unwrap();
    assert!(instructions.contains("not specified"));
    assert!(instructions.contains("No projects listed"));
    assert_eq!(mock.profile_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn disconnect_without_session_ended_still_submits_scores() {
    let (addr, mock) = setup_worker(StatusCode::OK).await;

    let url = format!("ws://{}/ws?room=interview-1-stu9", addr);
    let (mut ws, _) = connect_async(url).await.expect("failed to connect");
    let _ready = recv_json(&mut ws).await;

    let frame = json!({"type": "utterance_committed", "text": SCORE_UTTERANCE});
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
    ws.close(None).await.unwrap();
    drop(ws);

    // The worker finishes the session in the background; poll the mock until
    // the submission lands.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while mock.submit_hits.load(Ordering::SeqCst) == 0 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "submission never arrived"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let submissions = mock.submissions.lock().unwrap();
    assert_eq!(submissions[0]["roomName"], "interview-1-stu9");
    assert_eq!(submissions[0]["overallScore"], 8);
}

#[tokio::test]
async fn malformed_frame_gets_error_and_session_continues() {
    let (addr, mock) = setup_worker(StatusCode::OK).await;

    let url = format!("ws://{}/ws?room=interview-1-stu3", addr);
    let (mut ws, _) = connect_async(url).await.expect("failed to connect");
    let _ready = recv_json(&mut ws).await;

    ws.send(Message::Text("{not json".to_string().into()))
        .await
        .unwrap();
    let error = recv_json(&mut ws).await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["message"], "invalid message format");

    // The session is still alive and completes normally.
    let frame = json!({"type": "utterance_committed", "text": SCORE_UTTERANCE});
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
    ws.send(Message::Text(
        json!({"type": "session_ended"}).to_string().into(),
    ))
    .await
    .unwrap();

    let scores = recv_json(&mut ws).await;
    assert_eq!(scores["type"], "interview_scores");
    assert_eq!(scores["scores"]["overall"], 8);
    assert_eq!(mock.submit_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_without_score_block_closes_without_broadcast() {
    let (addr, mock) = setup_worker(StatusCode::OK).await;

    let url = format!("ws://{}/ws?room=interview-1-stu5", addr);
    let (mut ws, _) = connect_async(url).await.expect("failed to connect");
    let _ready = recv_json(&mut ws).await;

    let frame = json!({"type": "utterance_committed", "text": "Goodbye."});
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
    ws.send(Message::Text(
        json!({"type": "session_ended"}).to_string().into(),
    ))
    .await
    .unwrap();

    // No score frame: the next thing on the socket is the close.
    let next = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timeout waiting for close");
    match next {
        None | Some(Ok(Message::Close(_))) => {}
        other => panic!("expected close, got: {:?}", other),
    }
    assert_eq!(mock.submit_hits.load(Ordering::SeqCst), 0);
}
