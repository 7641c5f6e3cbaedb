//! HTTP-level tests driving the router end to end.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rps_game_core::{compute_commitment, GameId, Move, Salt};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::ServerConfig;
use crate::handlers::PLAYER_HEADER;
use crate::router;
use crate::state::AppState;

const STEP: u64 = 60;
const DEPOSIT: u64 = 100;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    player: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(player) = player {
        builder = builder.header(PLAYER_HEADER, player);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/players", None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn secret() -> Salt {
    Salt::from_passphrase("hunter2").unwrap()
}

fn secret_hex() -> String {
    hex::encode(secret().as_bytes())
}

struct Match {
    app: Router,
    state: AppState,
    alice: String,
    bob: String,
    id: u64,
}

/// Two players with a joined game
async fn joined_match() -> Match {
    let state = AppState::new(&ServerConfig::default());
    let app = router(state.clone());
    let alice = register(&app).await;
    let bob = register(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/games",
        Some(&alice),
        Some(json!({"step_duration": STEP, "deposit": DEPOSIT})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["game_id"].as_u64().unwrap();

    let uri = format!("/api/games/{}/join", id);
    let (status, _) = send(&app, "POST", &uri, Some(&bob), Some(json!({"deposit": DEPOSIT}))).await;
    assert_eq!(status, StatusCode::OK);

    Match {
        app,
        state,
        alice,
        bob,
        id,
    }
}

async fn commit_rock(m: &Match) {
    let commitment = compute_commitment(GameId::new(m.id), Move::Rock.value(), &secret());
    let uri = format!("/api/games/{}/move1", m.id);
    let (status, _) = send(
        &m.app,
        "POST",
        &uri,
        Some(&m.alice),
        Some(json!({"commitment": commitment.to_string()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = router(AppState::new(&ServerConfig::default()));
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_player_funds_wallet() {
    let app = router(AppState::new(&ServerConfig::default()));
    let id = register(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/players/{}", id), None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wallet_balance"], 10_000);
    assert_eq!(body["ledger_balance"], 0);
}

#[tokio::test]
async fn test_full_game_over_http() {
    let m = joined_match().await;
    commit_rock(&m).await;

    let uri = format!("/api/games/{}/move2", m.id);
    let (status, body) = send(&m.app, "POST", &uri, Some(&m.bob), Some(json!({"move": 3}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["event"], "second_moved");

    let uri = format!("/api/games/{}/reveal", m.id);
    let (status, body) = send(
        &m.app,
        "POST",
        &uri,
        Some(&m.alice),
        Some(json!({"move": 1, "secret": secret_hex()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "player1_wins");
    assert_eq!(body["game"]["state"], "finished");

    let (_, player) = send(&m.app, "GET", &format!("/api/players/{}", m.alice), None, None).await;
    assert_eq!(player["ledger_balance"], 2 * DEPOSIT);

    let (status, body) = send(&m.app, "POST", "/api/withdraw", Some(&m.alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 2 * DEPOSIT);
    assert_eq!(body["wallet_balance"], 10_000 + DEPOSIT);
}

#[tokio::test]
async fn test_missing_player_header_is_unauthorized() {
    let app = router(AppState::new(&ServerConfig::default()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/games",
        None,
        Some(json!({"step_duration": STEP, "deposit": DEPOSIT})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "missing_player");
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let app = router(AppState::new(&ServerConfig::default()));
    let alice = register(&app).await;

    let (status, body) = send(&app, "POST", "/api/games/7/decline", Some(&alice), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let m = joined_match().await;

    let uri = format!("/api/games/{}/move2", m.id);
    let (status, body) = send(&m.app, "POST", &uri, Some(&m.alice), Some(json!({"move": 1}))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "unauthorized");
}

#[tokio::test]
async fn test_wrong_secret_is_commitment_mismatch() {
    let m = joined_match().await;
    commit_rock(&m).await;
    let uri = format!("/api/games/{}/move2", m.id);
    send(&m.app, "POST", &uri, Some(&m.bob), Some(json!({"move": 2}))).await;

    let uri = format!("/api/games/{}/reveal", m.id);
    let (status, body) = send(
        &m.app,
        "POST",
        &uri,
        Some(&m.alice),
        Some(json!({"move": 2, "secret": secret_hex()})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "commitment_mismatch");
}

#[tokio::test]
async fn test_claim_before_and_after_deadline() {
    let m = joined_match().await;
    let uri = format!("/api/games/{}/claim", m.id);

    let (status, body) = send(&m.app, "POST", &uri, Some(&m.bob), None).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["kind"], "deadline_not_yet_reached");

    let (status, _) = send(
        &m.app,
        "POST",
        "/api/system/tick",
        None,
        Some(json!({"seconds": STEP + 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&m.app, "POST", &uri, Some(&m.bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "player2_wins");
    assert_eq!(m.state.engine().balance_of(m.bob.parse().unwrap()), 2 * DEPOSIT);
}

#[tokio::test]
async fn test_late_move_is_gone() {
    let m = joined_match().await;
    m.state.advance_time(STEP + 1).unwrap();

    let commitment = compute_commitment(GameId::new(m.id), Move::Rock.value(), &secret());
    let uri = format!("/api/games/{}/move1", m.id);
    let (status, body) = send(
        &m.app,
        "POST",
        &uri,
        Some(&m.alice),
        Some(json!({"commitment": commitment.to_string()})),
    )
    .await;

    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["kind"], "deadline_exceeded");
}

#[tokio::test]
async fn test_join_twice_is_conflict() {
    let m = joined_match().await;
    let carol = register(&m.app).await;

    let uri = format!("/api/games/{}/join", m.id);
    let (status, body) = send(
        &m.app,
        "POST",
        &uri,
        Some(&carol),
        Some(json!({"deposit": DEPOSIT})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_state");
}

#[tokio::test]
async fn test_list_open_games_and_decline() {
    let state = AppState::new(&ServerConfig::default());
    let app = router(state);
    let alice = register(&app).await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/games",
        Some(&alice),
        Some(json!({"step_duration": STEP, "deposit": DEPOSIT})),
    )
    .await;
    let id = body["game_id"].as_u64().unwrap();

    let (_, list) = send(&app, "GET", "/api/games", None, None).await;
    assert_eq!(list["games"].as_array().unwrap().len(), 1);

    let uri = format!("/api/games/{}/decline", id);
    let (status, body) = send(&app, "POST", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["event"], "declined");

    let (_, list) = send(&app, "GET", "/api/games", None, None).await;
    assert!(list["games"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_commitment_helper_matches_engine_hash() {
    let app = router(AppState::new(&ServerConfig::default()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/commitment",
        None,
        Some(json!({"game_id": 3, "move": 2, "secret": secret_hex()})),
    )
    .await;

    let expected = compute_commitment(GameId::new(3), Move::Paper.value(), &secret());
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["commitment"], expected.to_string());
}

#[tokio::test]
async fn test_withdraw_with_empty_ledger_is_bad_request() {
    let app = router(AppState::new(&ServerConfig::default()));
    let alice = register(&app).await;

    let (status, body) = send(&app, "POST", "/api/withdraw", Some(&alice), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");
}

async fn tick(app: &Router, seconds: Value) -> (StatusCode, Value) {
    send(app, "POST", "/api/system/tick", None, Some(json!({ "seconds": seconds }))).await
}

#[tokio::test]
async fn test_huge_tick_is_rejected_and_service_survives() {
    let m = joined_match().await;

    let (status, body) = tick(&m.app, json!(i64::MAX)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");

    let (status, body) = tick(&m.app, json!(u64::MAX)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");

    // The step window is still open, so the game carries on
    commit_rock(&m).await;
    let (status, _) = tick(&m.app, json!(1)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_negative_tick_cannot_reopen_a_step() {
    let m = joined_match().await;
    let (status, _) = tick(&m.app, json!(STEP)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = tick(&m.app, json!(-(STEP as i64))).await;
    assert!(status.is_client_error());

    let commitment = compute_commitment(GameId::new(m.id), Move::Rock.value(), &secret());
    let uri = format!("/api/games/{}/move1", m.id);
    let (status, _) = send(
        &m.app,
        "POST",
        &uri,
        Some(&m.alice),
        Some(json!({"commitment": commitment.to_string()})),
    )
    .await;
    assert_eq!(status, StatusCode::GONE);

    let uri = format!("/api/games/{}/claim", m.id);
    let (status, body) = send(&m.app, "POST", &uri, Some(&m.bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "player2_wins");
}
