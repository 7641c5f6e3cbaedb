//! Application state management.

use chrono::{DateTime, Duration, Utc};
use rps_game_core::{Clock, EngineConfig, GameEngine, MockEscrowHost, PlayerId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::ServerConfig;

/// Wall clock shifted forward by a simulated offset (for timeout testing).
///
/// The offset only grows, so the clock never runs backwards.
#[derive(Clone, Default)]
pub struct ServiceClock {
    offset_secs: Arc<AtomicU64>,
}

fn shifted(offset_secs: u64) -> Option<DateTime<Utc>> {
    let offset = Duration::try_seconds(i64::try_from(offset_secs).ok()?)?;
    Utc::now().checked_add_signed(offset)
}

impl ServiceClock {
    /// Advance simulated time by seconds.
    ///
    /// Returns `None`, leaving the clock untouched, when the shifted time
    /// would leave chrono's representable range.
    pub fn advance(&self, seconds: u64) -> Option<u64> {
        self.offset_secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |offset| {
                let next = offset.checked_add(seconds)?;
                shifted(next).map(|_| next)
            })
            .ok()
            .map(|previous| previous + seconds)
    }
}

impl Clock for ServiceClock {
    fn now(&self) -> u64 {
        shifted(self.offset_secs.load(Ordering::SeqCst))
            .map(|now| u64::try_from(now.timestamp()).unwrap_or(0))
            .unwrap_or(u64::MAX)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<GameEngine>>,
    host: MockEscrowHost,
    clock: ServiceClock,
    wallet_funding: u64,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let host = MockEscrowHost::new();
        let clock = ServiceClock::default();
        let engine = GameEngine::new(
            EngineConfig::new(config.deploy_flag),
            Arc::new(host.clone()),
            Arc::new(clock.clone()),
        );

        Self {
            engine: Arc::new(Mutex::new(engine)),
            host,
            clock,
            wallet_funding: config.wallet_funding,
        }
    }

    /// Exclusive access to the engine; one operation runs at a time
    pub fn engine(&self) -> MutexGuard<'_, GameEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn host(&self) -> &MockEscrowHost {
        &self.host
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Move simulated time forward; `None` if the offset is out of range
    pub fn advance_time(&self, seconds: u64) -> Option<u64> {
        let offset = self.clock.advance(seconds)?;
        tracing::info!("Simulated time advanced by {}s (offset {}s)", seconds, offset);
        Some(offset)
    }

    /// Open a funded mock wallet for a new player
    pub fn register_player(&self) -> PlayerId {
        let player = PlayerId::new();
        self.host.fund(player, self.wallet_funding);
        tracing::info!("Registered player {} with {}", player, self.wallet_funding);
        player
    }
}
