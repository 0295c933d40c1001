//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::{RecmatchError, Result, constants};

/// Policy knobs for a `MatchingEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reject `post_bid` when the caller is not the bidder.
    pub require_self_post: bool,
    /// Let a liquidity provider match a bid they posted themselves.
    pub allow_self_match: bool,
    /// Upper bound on `expiration - now` at post time, in seconds.
    pub max_bid_lifetime_secs: Option<u64>,
    /// Width of one ledger slot for wall-clock sequence derivation.
    pub sequence_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            require_self_post: constants::DEFAULT_REQUIRE_SELF_POST,
            allow_self_match: constants::DEFAULT_ALLOW_SELF_MATCH,
            max_bid_lifetime_secs: None,
            sequence_interval_ms: constants::DEFAULT_SEQUENCE_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    /// Permissive settings: anyone may post for anyone.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            require_self_post: false,
            allow_self_match: true,
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sequence_interval_ms == 0 {
            return Err(RecmatchError::Configuration(
                "sequence_interval_ms must be > 0".into(),
            ));
        }
        if self.max_bid_lifetime_secs == Some(0) {
            return Err(RecmatchError::Configuration(
                "max_bid_lifetime_secs must be > 0 when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert!(cfg.require_self_post);
        assert!(!cfg.allow_self_match);
        assert_eq!(cfg.max_bid_lifetime_secs, None);
        assert_eq!(cfg.sequence_interval_ms, 1000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{"require_self_post": false}"#).unwrap();
        assert!(!cfg.require_self_post);
        assert_eq!(cfg.sequence_interval_ms, 1000);
    }

    #[test]
    fn zero_interval_rejected() {
        let err = EngineConfig::from_json_str(r#"{"sequence_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(err, RecmatchError::Configuration(_)));
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(format!("{err}").starts_with("RM_ERR_901"));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = EngineConfig {
            max_bid_lifetime_secs: Some(86_400),
            ..EngineConfig::permissive()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
