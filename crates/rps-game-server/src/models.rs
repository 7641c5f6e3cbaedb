//! Request and response bodies for the HTTP API.

use rps_game_core::{Commitment, Game, GameEvent, GameId, Outcome, PlayerId, Salt};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct PlayerResponse {
    pub id: PlayerId,
    /// Winnings held by the game ledger, withdrawable
    pub ledger_balance: u64,
    /// Funds in the player's (mock) wallet
    pub wallet_balance: u64,
}

#[derive(Deserialize)]
pub struct StartGameRequest {
    pub step_duration: u64,
    pub deposit: u64,
}

#[derive(Serialize)]
pub struct StartGameResponse {
    pub game_id: GameId,
    pub events: Vec<GameEvent>,
}

#[derive(Deserialize)]
pub struct JoinGameRequest {
    pub deposit: u64,
}

#[derive(Deserialize)]
pub struct FirstMoveRequest {
    pub commitment: Commitment,
}

#[derive(Deserialize)]
pub struct SecondMoveRequest {
    #[serde(rename = "move")]
    pub move_value: u8,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    #[serde(rename = "move")]
    pub move_value: u8,
    pub secret: Salt,
}

#[derive(Deserialize)]
pub struct CommitmentRequest {
    pub game_id: GameId,
    #[serde(rename = "move")]
    pub move_value: u8,
    pub secret: Salt,
}

#[derive(Serialize)]
pub struct CommitmentResponse {
    pub commitment: Commitment,
}

/// Response for every state-changing game operation
#[derive(Serialize)]
pub struct ActionResponse {
    pub game: Game,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub events: Vec<GameEvent>,
}

#[derive(Serialize)]
pub struct GameListResponse {
    pub games: Vec<Game>,
}

#[derive(Serialize)]
pub struct WithdrawResponse {
    pub amount: u64,
    pub wallet_balance: u64,
}

#[derive(Deserialize)]
pub struct TickRequest {
    /// Time only moves forward
    pub seconds: u64,
}

#[derive(Serialize)]
pub struct TickResponse {
    pub now: u64,
}
