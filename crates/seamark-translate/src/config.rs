//! Translator configuration.
//!
//! The host's schema loader hands over an ordered list of rule records
//! under the `pgns` key. Schema-level constraints (types, required
//! keys) are the loader's responsibility; this module only checks the
//! structural facts the pipeline depends on.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranslateError};
use crate::rule::RuleSet;

/// The configuration document for the translator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Rules in evaluation order.
    #[serde(default)]
    pub pgns: RuleSet,
}

impl TranslatorConfig {
    /// Deserialize and validate a configuration value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| TranslateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation: every rule needs a non-blank base path.
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.pgns.iter().enumerate() {
            if rule.base_path.trim().is_empty() {
                return Err(TranslateError::Config(format!(
                    "rule {index} (pgn {}) has an empty base path",
                    rule.pgn
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rule_list() {
        let config = TranslatorConfig::from_value(serde_json::json!({
            "pgns": [
                {"pgn": 127508, "basePath": "electrical.batteries.{Battery Instance}"},
                {"pgn": 130824, "basePath": "proprietary", "manufacturer": "Simrad", "fields": "A,B"}
            ]
        }))
        .unwrap();
        assert_eq!(config.pgns.len(), 2);
    }

    #[test]
    fn missing_pgns_key_is_an_empty_rule_set() {
        let config = TranslatorConfig::from_value(serde_json::json!({})).unwrap();
        assert!(config.pgns.is_empty());
    }

    #[test]
    fn blank_base_path_is_rejected() {
        let err = TranslatorConfig::from_value(serde_json::json!({
            "pgns": [{"pgn": 127508, "basePath": "  "}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("empty base path"));
    }

    #[test]
    fn missing_required_key_is_a_config_error() {
        assert!(TranslatorConfig::from_value(serde_json::json!({
            "pgns": [{"basePath": "p"}]
        }))
        .is_err());
    }
}
