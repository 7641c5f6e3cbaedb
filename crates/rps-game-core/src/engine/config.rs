use serde::{Deserialize, Serialize};

/// Construction-time engine options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deployment mode switch fixed for the engine's lifetime. Recorded and
    /// reported; no game rule reads it.
    pub deploy_flag: bool,
}

impl EngineConfig {
    pub fn new(deploy_flag: bool) -> Self {
        Self { deploy_flag }
    }
}
