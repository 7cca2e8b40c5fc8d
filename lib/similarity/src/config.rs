use crate::error::MatchError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_N: usize = 5;

/// Tunables for a matching run
///
/// Scoring weights and feedback factors are fixed constants and are not
/// part of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Matches kept per user
    pub top_n: usize,
    /// Extract users on the rayon pool
    pub parallel_extraction: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            parallel_extraction: true,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.top_n == 0 {
            return Err(MatchError::InvalidConfig("top_n must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.top_n, 5);
        assert!(config.parallel_extraction);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = MatchConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MatchConfig = serde_json::from_str(r#"{"top_n": 3}"#).unwrap();
        assert_eq!(config.top_n, 3);
        assert!(config.parallel_extraction);
    }
}
