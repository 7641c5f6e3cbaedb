//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rps_game_core::{
    compute_commitment, GameEngine, GameError, GameId, GameState, Outcome, PlayerId,
};
use uuid::Uuid;

use crate::models::*;
use crate::state::AppState;

/// Header carrying the caller's identity, as authenticated upstream
pub const PLAYER_HEADER: &str = "X-Player-Id";

// ============ Errors ============

pub enum AppError {
    MissingPlayer,
    Game(GameError),
}

impl From<GameError> for AppError {
    fn from(e: GameError) -> Self {
        AppError::Game(e)
    }
}

fn error_kind(e: &GameError) -> (StatusCode, &'static str) {
    match e {
        GameError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        GameError::Unauthorized(_) => (StatusCode::FORBIDDEN, "unauthorized"),
        GameError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
        GameError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
        GameError::DeadlineExceeded { .. } => (StatusCode::GONE, "deadline_exceeded"),
        GameError::DeadlineNotYetReached { .. } => {
            (StatusCode::PRECONDITION_FAILED, "deadline_not_yet_reached")
        }
        GameError::CommitmentMismatch => {
            (StatusCode::UNPROCESSABLE_ENTITY, "commitment_mismatch")
        }
        GameError::ArithmeticOverflow => {
            (StatusCode::INTERNAL_SERVER_ERROR, "arithmetic_overflow")
        }
        GameError::Host(_) => (StatusCode::PAYMENT_REQUIRED, "host_error"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::MissingPlayer => (
                StatusCode::UNAUTHORIZED,
                "missing_player",
                format!("Missing or malformed {} header", PLAYER_HEADER),
            ),
            AppError::Game(e) => {
                let (status, kind) = error_kind(&e);
                (status, kind, e.to_string())
            }
        };
        tracing::debug!("Rejected request ({}): {}", kind, message);
        (
            status,
            Json(serde_json::json!({"error": message, "kind": kind})),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, AppError>;

// ============ Helpers ============

fn caller_id(headers: &HeaderMap) -> Result<PlayerId, AppError> {
    headers
        .get(PLAYER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or(AppError::MissingPlayer)
}

fn action_response(
    engine: &mut GameEngine,
    id: GameId,
    outcome: Option<Outcome>,
) -> ApiResult<ActionResponse> {
    Ok(Json(ActionResponse {
        game: engine.game(id)?,
        outcome,
        events: engine.take_events(),
    }))
}

// ============ Player handlers ============

pub async fn register_player(State(state): State<AppState>) -> impl IntoResponse {
    let id = state.register_player();
    (
        StatusCode::CREATED,
        Json(PlayerResponse {
            id,
            ledger_balance: 0,
            wallet_balance: state.host().wallet_balance(id),
        }),
    )
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<PlayerResponse> {
    let id = PlayerId::from_uuid(id);
    let ledger_balance = state.engine().balance_of(id);
    Json(PlayerResponse {
        id,
        ledger_balance,
        wallet_balance: state.host().wallet_balance(id),
    })
}

pub async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<WithdrawResponse> {
    let caller = caller_id(&headers)?;
    let amount = state.engine().withdraw(caller)?;
    Ok(Json(WithdrawResponse {
        amount,
        wallet_balance: state.host().wallet_balance(caller),
    }))
}

// ============ Game handlers ============

pub async fn start_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<StartGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller = caller_id(&headers)?;
    let mut engine = state.engine();
    let game_id = engine.start(caller, req.step_duration, req.deposit)?;
    Ok((
        StatusCode::CREATED,
        Json(StartGameResponse {
            game_id,
            events: engine.take_events(),
        }),
    ))
}

pub async fn list_open_games(State(state): State<AppState>) -> Json<GameListResponse> {
    let games = state
        .engine()
        .games_in_state(GameState::WaitingForOpponent)
        .cloned()
        .collect();
    Json(GameListResponse { games })
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<rps_game_core::Game> {
    let game = state.engine().game(GameId::new(id))?;
    Ok(Json(game))
}

pub async fn decline_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<ActionResponse> {
    let caller = caller_id(&headers)?;
    let id = GameId::new(id);
    let mut engine = state.engine();
    engine.decline(caller, id)?;
    action_response(&mut engine, id, None)
}

pub async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<JoinGameRequest>,
) -> ApiResult<ActionResponse> {
    let caller = caller_id(&headers)?;
    let id = GameId::new(id);
    let mut engine = state.engine();
    engine.join(caller, id, req.deposit)?;
    action_response(&mut engine, id, None)
}

pub async fn first_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<FirstMoveRequest>,
) -> ApiResult<ActionResponse> {
    let caller = caller_id(&headers)?;
    let id = GameId::new(id);
    let mut engine = state.engine();
    engine.move1(caller, id, req.commitment)?;
    action_response(&mut engine, id, None)
}

pub async fn second_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<SecondMoveRequest>,
) -> ApiResult<ActionResponse> {
    let caller = caller_id(&headers)?;
    let id = GameId::new(id);
    let mut engine = state.engine();
    engine.move2(caller, id, req.move_value)?;
    action_response(&mut engine, id, None)
}

pub async fn reveal_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<RevealRequest>,
) -> ApiResult<ActionResponse> {
    let caller = caller_id(&headers)?;
    let id = GameId::new(id);
    let mut engine = state.engine();
    let outcome = engine.reveal(caller, id, req.move_value, &req.secret)?;
    action_response(&mut engine, id, Some(outcome))
}

pub async fn claim_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<ActionResponse> {
    let caller = caller_id(&headers)?;
    let id = GameId::new(id);
    let mut engine = state.engine();
    let outcome = engine.claim(caller, id)?;
    action_response(&mut engine, id, Some(outcome))
}

/// Off-path helper so player1 can build a commitment before `move1`
pub async fn commitment(Json(req): Json<CommitmentRequest>) -> Json<CommitmentResponse> {
    Json(CommitmentResponse {
        commitment: compute_commitment(req.game_id, req.move_value, &req.secret),
    })
}

// ============ System handlers ============

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> ApiResult<TickResponse> {
    state.advance_time(req.seconds).ok_or_else(|| {
        GameError::InvalidArgument(format!("cannot advance time by {} seconds", req.seconds))
    })?;
    Ok(Json(TickResponse { now: state.now() }))
}

pub async fn health() -> &'static str {
    "ok"
}
