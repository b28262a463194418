//! The translation pipeline.
//!
//! One synchronous pass per message: rule resolution, instance
//! resolution, template expansion, field flattening. The translator
//! holds only the immutable rule set; the registry snapshot arrives per
//! call and nothing is retained across messages, so identical inputs
//! always produce identical output.

use tracing::debug;

use seamark_core::DecodedMessage;

use crate::flatten;
use crate::instance::resolve_instance;
use crate::registry::DeviceLookup;
use crate::rule::RuleSet;
use crate::template::{self, PlaceholderFailure};
use crate::update::Delta;

/// Output of one pipeline run: the delta plus any placeholder
/// diagnostics gathered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub delta: Delta,
    pub failures: Vec<PlaceholderFailure>,
}

/// Rule-driven message translator.
pub struct Translator {
    rules: RuleSet,
}

impl Translator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Translate one decoded message.
    ///
    /// Returns `None` when no rule applies; that is a silent no-op, not
    /// an error.
    pub fn translate(
        &self,
        registry: &dyn DeviceLookup,
        message: &DecodedMessage,
    ) -> Option<Translation> {
        let rule = self.rules.resolve(message)?;
        debug!(pgn = message.pgn, source = message.source, base_path = %rule.base_path, "rule matched");

        let instance = resolve_instance(&message.fields, message.source, registry);
        let resolved =
            template::resolve(&rule.base_path, &message.fields, instance, message.source, registry);

        let labels = rule.selected_labels(&message.fields);
        let update = flatten::build_update(&resolved.path, &labels, &message.fields);

        Some(Translation {
            delta: Delta::single(update),
            failures: resolved.failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NullRegistry;
    use crate::rule::TransformRule;
    use seamark_core::Scalar;

    #[test]
    fn no_rule_match_is_none() {
        let translator = Translator::new(RuleSet::new(vec![TransformRule::new(127508, "p")]));
        let msg = DecodedMessage::new(127505, 5);
        assert!(translator.translate(&NullRegistry, &msg).is_none());
    }

    #[test]
    fn empty_rule_set_never_translates() {
        let translator = Translator::new(RuleSet::default());
        let msg = DecodedMessage::new(127508, 5);
        assert!(translator.translate(&NullRegistry, &msg).is_none());
    }

    #[test]
    fn translation_is_pure() {
        let translator = Translator::new(RuleSet::new(vec![TransformRule::new(
            127508,
            "electrical.batteries.{Battery Instance}",
        )]));
        let msg = DecodedMessage::new(127508, 5)
            .with_field("Battery Instance", Scalar::Integer(1))
            .with_field("Voltage", Scalar::Float(12.8));

        let first = translator.translate(&NullRegistry, &msg).unwrap();
        let second = translator.translate(&NullRegistry, &msg).unwrap();
        assert_eq!(
            serde_json::to_string(&first.delta).unwrap(),
            serde_json::to_string(&second.delta).unwrap()
        );
    }
}
