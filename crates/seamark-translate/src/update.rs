//! Structured update records handed to the host ingestion boundary.

use serde::{Deserialize, Serialize};

use seamark_core::Scalar;

/// One hierarchical path and the value to record under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    pub path: String,
    pub value: Scalar,
}

impl PathValue {
    pub fn new(path: impl Into<String>, value: Scalar) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}

/// The ordered value list derived from one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub values: Vec<PathValue>,
}

/// The envelope submitted to the host: one update per processed
/// message, never partially emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub updates: Vec<Update>,
}

impl Delta {
    /// A delta carrying a single update, the only shape the pipeline
    /// produces.
    pub fn single(update: Update) -> Self {
        Self {
            updates: vec![update],
        }
    }

    /// True when no update carries any value.
    pub fn is_empty(&self) -> bool {
        self.updates.iter().all(|update| update.values.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_host_envelope_shape() {
        let delta = Delta::single(Update {
            values: vec![PathValue::new("a.b", Scalar::Integer(1))],
        });
        let json = serde_json::to_value(&delta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"updates": [{"values": [{"path": "a.b", "value": 1}]}]})
        );
    }

    #[test]
    fn emptiness_checks_values_not_updates() {
        assert!(Delta::default().is_empty());
        assert!(Delta::single(Update::default()).is_empty());
        assert!(!Delta::single(Update {
            values: vec![PathValue::new("a", Scalar::Null)],
        })
        .is_empty());
    }
}
