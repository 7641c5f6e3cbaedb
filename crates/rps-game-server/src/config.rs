//! Service configuration from environment variables.

/// Runtime settings read at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Forwarded to the engine as its construction-time mode switch
    pub deploy_flag: bool,
    /// Mock wallet funding for each newly registered player
    pub wallet_funding: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            deploy_flag: false,
            wallet_funding: 10_000,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `RPS_DEPLOY_FLAG` and `RPS_WALLET_FUNDING`, falling back
    /// to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            deploy_flag: lookup("RPS_DEPLOY_FLAG")
                .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.deploy_flag),
            wallet_funding: lookup("RPS_WALLET_FUNDING")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.wallet_funding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config_from(&[]), ServerConfig::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("RPS_DEPLOY_FLAG", "TRUE"),
            ("RPS_WALLET_FUNDING", "42"),
        ]);

        assert_eq!(config.port, 8080);
        assert!(config.deploy_flag);
        assert_eq!(config.wallet_funding, 42);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("RPS_DEPLOY_FLAG", "0")]);

        assert_eq!(config.port, 3000);
        assert!(!config.deploy_flag);
    }
}
