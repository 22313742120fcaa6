//! Integration tests for the game API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt`
//! without starting a TCP server, with all collaborators stubbed --
//! handler logic and routing are what is under test.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use advent_engine::{Backends, GameConfig, GameSession};
use advent_server::router::build_router;
use advent_server::state::AppState;
use advent_types::PlayerRole;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

fn temp_save_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("advent-api-{name}-{}.json", std::process::id()))
}

fn make_state(save_name: &str) -> Arc<AppState> {
    let session = GameSession::new(
        "テスト",
        PlayerRole::Hero,
        GameConfig::default(),
        Backends::stubbed(),
    )
    .unwrap();
    AppState::new(session, temp_save_path(save_name))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn status_reports_day_one() {
    let router = build_router(make_state("status"));
    let response = router.oneshot(get("/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["day"], 1);
    assert_eq!(json["max_days"], 30);
    assert_eq!(json["game_over"], false);
    assert_eq!(json["state"]["player_role"], "hero");
}

#[tokio::test]
async fn command_returns_a_full_turn_and_advances_the_day() {
    let state = make_state("command");
    let router = build_router(Arc::clone(&state));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/command",
            &serde_json::json!({"command": "村の様子を見て回る"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let turn = body_json(response).await;
    assert_eq!(turn["day"], 1);
    assert!(turn["narrative"].as_str().unwrap().contains("村の様子を見て回る"));
    assert!(turn["choices"].as_array().unwrap().len() >= 3);
    assert_eq!(turn["game_over"], false);

    let status = body_json(router.oneshot(get("/api/status")).await.unwrap()).await;
    assert_eq!(status["day"], 2);
}

#[tokio::test]
async fn empty_command_is_rejected_without_mutation() {
    let state = make_state("empty-command");
    let router = build_router(Arc::clone(&state));

    let response = router
        .clone()
        .oneshot(post_json("/api/command", &serde_json::json!({"command": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let status = body_json(router.oneshot(get("/api/status")).await.unwrap()).await;
    assert_eq!(status["day"], 1);
}

#[tokio::test]
async fn commands_after_game_over_conflict() {
    let state = make_state("game-over");
    let router = build_router(Arc::clone(&state));

    // Drive the session to the final day through the save/load path.
    {
        let mut session = state.session.write().await;
        let mut game_state = session.state().clone();
        game_state.current_day = 30;
        session.restore(advent_types::GameSave {
            day: 30,
            state: game_state,
            saved_at: chrono::Utc::now(),
        });
    }

    let response = router
        .oneshot(post_json(
            "/api/command",
            &serde_json::json!({"command": "あがく"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn new_game_with_empty_name_is_rejected() {
    let state = make_state("new-game-invalid");
    let router = build_router(Arc::clone(&state));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/new-game",
            &serde_json::json!({"player_name": "", "role": "sage"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The boot session is untouched.
    let status = body_json(router.oneshot(get("/api/status")).await.unwrap()).await;
    assert_eq!(status["state"]["player_role"], "hero");
}

#[tokio::test]
async fn new_game_replaces_the_session_state() {
    let router = build_router(make_state("new-game"));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/new-game",
            &serde_json::json!({"player_name": "ミラ", "role": "merchant"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["day"], 1);
    assert_eq!(json["state"]["player_role"], "merchant");
    assert_eq!(json["state"]["player_name"], "ミラ");
    assert_eq!(json["state"]["stats"]["wealth"], 300);
}

#[tokio::test]
async fn save_then_load_round_trips_the_state() {
    let state = make_state("roundtrip");
    let router = build_router(Arc::clone(&state));

    // Play a turn so the state is no longer pristine.
    router
        .clone()
        .oneshot(post_json(
            "/api/command",
            &serde_json::json!({"command": "訓練を積む"}),
        ))
        .await
        .unwrap();

    let saved_status = body_json(router.clone().oneshot(get("/api/status")).await.unwrap()).await;
    let response = router.clone().oneshot(post_empty("/api/save")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Play further, then load: the state must match the save exactly.
    router
        .clone()
        .oneshot(post_json(
            "/api/command",
            &serde_json::json!({"command": "休息を取る"}),
        ))
        .await
        .unwrap();

    let response = router.clone().oneshot(post_empty("/api/load")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let loaded_status = body_json(router.oneshot(get("/api/status")).await.unwrap()).await;
    assert_eq!(loaded_status["day"], saved_status["day"]);
    assert_eq!(loaded_status["state"], saved_status["state"]);

    std::fs::remove_file(temp_save_path("roundtrip")).ok();
}

#[tokio::test]
async fn load_without_a_save_file_is_an_error() {
    let router = build_router(make_state("no-save-file"));
    let response = router.oneshot(post_empty("/api/load")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn index_serves_the_status_page() {
    let router = build_router(make_state("index"));
    let response = router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("30日後の魔王襲来"));
}
