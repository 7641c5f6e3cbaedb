//! The game engine: owns every game, enforces the state machine and its
//! deadlines, and settles stakes into the ledger.
//!
//! Each operation reads the clock once, runs every check (including the
//! host deposit and ledger overflow) before its first write, and only then
//! mutates. A rejected call leaves games, ledger and event log untouched.

mod config;
mod game;

pub use config::EngineConfig;
pub use game::{Game, GameState};

use crate::clock::Clock;
use crate::crypto::{compute_commitment, Commitment, Salt};
use crate::games::{judge, Move};
use crate::host::EscrowHost;
use crate::ledger::Ledger;
use crate::protocol::{GameEvent, GameId, Outcome, PlayerId};
use crate::{GameError, Result};
use game::deadline_after;
use std::sync::Arc;
use tracing::{info, warn};

pub struct GameEngine {
    config: EngineConfig,
    /// Arena indexed by game id; entries are never removed
    games: Vec<Game>,
    ledger: Ledger,
    host: Arc<dyn EscrowHost>,
    clock: Arc<dyn Clock>,
    events: Vec<GameEvent>,
}

fn lookup(games: &[Game], id: GameId) -> Result<&Game> {
    usize::try_from(id.as_u64())
        .ok()
        .and_then(|index| games.get(index))
        .ok_or(GameError::NotFound(id))
}

fn lookup_mut(games: &mut [Game], id: GameId) -> Result<&mut Game> {
    usize::try_from(id.as_u64())
        .ok()
        .and_then(|index| games.get_mut(index))
        .ok_or(GameError::NotFound(id))
}

fn parse_move(value: u8) -> Result<Move> {
    Move::try_from(value).map_err(|e| GameError::InvalidArgument(e.to_string()))
}

impl GameEngine {
    pub fn new(config: EngineConfig, host: Arc<dyn EscrowHost>, clock: Arc<dyn Clock>) -> Self {
        info!("Game engine created (deploy_flag={})", config.deploy_flag);
        Self {
            config,
            games: Vec::new(),
            ledger: Ledger::new(),
            host,
            clock,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn deploy_flag(&self) -> bool {
        self.config.deploy_flag
    }

    /// Open a game and escrow the caller's deposit
    pub fn start(&mut self, caller: PlayerId, step_duration: u64, deposit: u64) -> Result<GameId> {
        let now = self.clock.now();

        if step_duration == 0 {
            return Err(GameError::InvalidArgument(
                "step duration must be positive".to_string(),
            ));
        }
        let next_deadline = deadline_after(now, step_duration)?;
        let id = GameId::new(self.games.len() as u64);

        self.take_deposit(caller, deposit)?;

        self.games
            .push(Game::open(id, caller, deposit, step_duration, next_deadline));
        info!(
            "Game {} started by {} with stake {} (deadline {})",
            id, caller, deposit, next_deadline
        );
        self.events.push(GameEvent::Started {
            id,
            owner: caller,
            stake: deposit,
        });
        Ok(id)
    }

    /// Cancel an unjoined game and refund player1
    pub fn decline(&mut self, caller: PlayerId, id: GameId) -> Result<()> {
        let game = lookup_mut(&mut self.games, id)?;
        game.require_player1(caller)?;
        game.require_state(GameState::WaitingForOpponent)?;

        self.ledger.credit(game.player1, game.stake)?;
        game.state = GameState::Finished;

        info!("Game {} declined, {} refunded {}", id, caller, game.stake);
        self.events.push(GameEvent::Declined { owner: caller, id });
        Ok(())
    }

    /// Match the stake and become player2
    pub fn join(&mut self, caller: PlayerId, id: GameId, deposit: u64) -> Result<()> {
        let now = self.clock.now();
        let game = lookup(&self.games, id)?;

        if caller == game.player1 {
            return Err(GameError::Unauthorized("player1 cannot join their own game"));
        }
        game.require_state(GameState::WaitingForOpponent)?;
        game.require_open_step(now)?;
        if deposit != game.stake {
            return Err(GameError::InvalidArgument(format!(
                "deposit {} does not match stake {}",
                deposit, game.stake
            )));
        }
        let stake = game
            .stake
            .checked_add(deposit)
            .ok_or(GameError::ArithmeticOverflow)?;
        let next_deadline = game.deadline_from(now)?;

        self.take_deposit(caller, deposit)?;

        let game = lookup_mut(&mut self.games, id)?;
        game.player2 = Some(caller);
        game.stake = stake;
        game.state = GameState::Active;
        game.next_deadline = next_deadline;

        info!("Game {} joined by {}, stake now {}", id, caller, stake);
        self.events.push(GameEvent::Joined { player: caller, id });
        Ok(())
    }

    /// Player1 commits blindly to their move
    pub fn move1(&mut self, caller: PlayerId, id: GameId, commitment: Commitment) -> Result<()> {
        let now = self.clock.now();
        let game = lookup_mut(&mut self.games, id)?;
        game.require_player1(caller)?;
        game.require_state(GameState::Active)?;
        if game.commitment1.is_some() {
            return Err(GameError::InvalidState("first move already committed"));
        }
        if commitment.is_empty() {
            return Err(GameError::InvalidArgument(
                "commitment must not be empty".to_string(),
            ));
        }
        game.require_open_step(now)?;
        let next_deadline = game.deadline_from(now)?;

        game.commitment1 = Some(commitment);
        game.next_deadline = next_deadline;

        info!("Game {}: {} committed first move", id, caller);
        self.events.push(GameEvent::FirstMoved {
            player: caller,
            id,
            commitment,
        });
        Ok(())
    }

    /// Player2 answers in the clear
    pub fn move2(&mut self, caller: PlayerId, id: GameId, move_value: u8) -> Result<()> {
        let now = self.clock.now();
        let game = lookup_mut(&mut self.games, id)?;
        game.require_player2(caller)?;
        game.require_state(GameState::Active)?;
        if game.commitment1.is_none() {
            return Err(GameError::InvalidState("first move not committed yet"));
        }
        if game.move2.is_some() {
            return Err(GameError::InvalidState("second move already made"));
        }
        let second_move = parse_move(move_value)?;
        game.require_open_step(now)?;
        let next_deadline = game.deadline_from(now)?;

        game.move2 = Some(second_move);
        game.next_deadline = next_deadline;

        info!("Game {}: {} played {}", id, caller, second_move);
        self.events.push(GameEvent::SecondMoved {
            player: caller,
            id,
            second_move,
        });
        Ok(())
    }

    /// Player1 opens their commitment; the game is judged and settled
    pub fn reveal(
        &mut self,
        caller: PlayerId,
        id: GameId,
        move_value: u8,
        salt: &Salt,
    ) -> Result<Outcome> {
        let now = self.clock.now();
        let game = lookup_mut(&mut self.games, id)?;
        game.require_player1(caller)?;
        game.require_state(GameState::Active)?;
        let second_move = game
            .move2
            .ok_or(GameError::InvalidState("second move not made yet"))?;
        let first_move = parse_move(move_value)?;
        game.require_open_step(now)?;
        if game.commitment1 != Some(compute_commitment(id, move_value, salt)) {
            warn!("Game {}: reveal by {} does not match commitment", id, caller);
            return Err(GameError::CommitmentMismatch);
        }

        let outcome = judge(first_move, second_move);
        let payouts = game.payouts(outcome)?;
        self.ledger.credit_all(&payouts)?;
        game.move1_revealed = Some(first_move);
        game.outcome = Some(outcome);
        game.state = GameState::Finished;

        info!(
            "Game {}: {} revealed {}, {} (stake {})",
            id, caller, first_move, outcome, game.stake
        );
        self.events.push(GameEvent::Revealed {
            player: caller,
            id,
            first_move,
        });
        self.events.push(GameEvent::Outcome {
            id,
            outcome,
            stake: game.stake,
        });
        Ok(outcome)
    }

    /// Resolve a game whose current actor missed their deadline
    pub fn claim(&mut self, caller: PlayerId, id: GameId) -> Result<Outcome> {
        let now = self.clock.now();
        let game = lookup_mut(&mut self.games, id)?;
        game.require_state(GameState::Active)?;
        game.require_missed_step(now)?;

        let defaulter = game.missed_step();
        let outcome = Outcome::win_for(defaulter.opponent());
        let payouts = game.payouts(outcome)?;
        self.ledger.credit_all(&payouts)?;
        game.outcome = Some(outcome);
        game.state = GameState::Finished;

        info!(
            "Game {} claimed by {}: {:?} missed their step, {} (stake {})",
            id, caller, defaulter, outcome, game.stake
        );
        self.events.push(GameEvent::Claimed {
            id,
            outcome,
            stake: game.stake,
        });
        Ok(outcome)
    }

    /// Pay the caller's whole ledger balance out through the host
    pub fn withdraw(&mut self, caller: PlayerId) -> Result<u64> {
        self.ledger.withdraw(caller, self.host.as_ref())
    }

    pub fn balance_of(&self, who: PlayerId) -> u64 {
        self.ledger.balance_of(who)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Snapshot of one game
    pub fn game(&self, id: GameId) -> Result<Game> {
        lookup(&self.games, id).cloned()
    }

    pub fn game_count(&self) -> u64 {
        self.games.len() as u64
    }

    pub fn games_in_state(&self, state: GameState) -> impl Iterator<Item = &Game> + '_ {
        self.games.iter().filter(move |g| g.state == state)
    }

    /// Drain notifications emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn take_deposit(&self, from: PlayerId, amount: u64) -> Result<()> {
        self.host.take_deposit(from, amount).map_err(|e| {
            warn!("Deposit of {} from {} rejected: {}", amount, from, e);
            GameError::from(e)
        })
    }
}
