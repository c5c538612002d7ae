//! Signal Dispatch
//!
//! Routes incoming signals to the rules that apply to them: error
//! occurrences feed the pattern rules, aggregate quality stats feed the
//! quality rules. Also owns the fingerprint occurrence table the
//! new-pattern predicate reads.

use crate::engine::{AlertEngine, AlertEvent};
use crate::rules::{AlertRule, RuleContext};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Derive a fingerprint grouping recurring errors by shape.
///
/// The message is lowercased and digit runs are collapsed, so "error at
/// line 42" and "error at line 7" share a fingerprint.
pub fn fingerprint(message: &str) -> String {
    let mut normalized = String::with_capacity(message.len());
    let mut in_digits = false;
    for c in message.to_lowercase().chars() {
        if c.is_ascii_digit() {
            if !in_digits {
                normalized.push('#');
                in_digits = true;
            }
        } else {
            normalized.push(c);
            in_digits = false;
        }
    }

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

/// Dispatcher feeding the alert engine
pub struct SignalDispatcher {
    engine: Arc<AlertEngine>,
    occurrences: RwLock<HashMap<String, u64>>,
}

impl SignalDispatcher {
    /// Create a dispatcher over the given engine
    pub fn new(engine: Arc<AlertEngine>) -> Self {
        Self {
            engine,
            occurrences: RwLock::new(HashMap::new()),
        }
    }

    /// Record an error occurrence and run the error-shaped rules
    pub fn observe_error(&self, message: &str) -> Vec<AlertEvent> {
        self.observe_error_at(message, Utc::now())
    }

    /// Clock-explicit `observe_error`.
    ///
    /// The context carries the occurrence count prior to this observation
    /// (absent for a never-seen fingerprint), which is what the new-pattern
    /// predicate keys on.
    pub fn observe_error_at(&self, message: &str, now: DateTime<Utc>) -> Vec<AlertEvent> {
        let fp = fingerprint(message);

        let prior = {
            let mut occurrences = self.occurrences.write();
            let prior = occurrences.get(&fp).copied();
            occurrences.insert(fp.clone(), prior.unwrap_or(0) + 1);
            prior
        };

        let ctx = RuleContext::Error {
            fingerprint: fp.clone(),
            message: message.to_string(),
            occurrences: prior,
        };
        let details = json!({
            "fingerprint": fp,
            "message": message,
            "occurrences": prior,
        });

        [AlertRule::NewErrorPattern, AlertRule::CriticalErrorPattern]
            .into_iter()
            .filter_map(|rule| self.engine.send_alert_at(rule, &ctx, details.clone(), now))
            .collect()
    }

    /// Run the quality-shaped rules against an aggregate score
    pub fn observe_quality(&self, score: f64) -> Vec<AlertEvent> {
        self.observe_quality_at(score, Utc::now())
    }

    /// Clock-explicit `observe_quality`
    pub fn observe_quality_at(&self, score: f64, now: DateTime<Utc>) -> Vec<AlertEvent> {
        let ctx = RuleContext::Quality { score };
        let details = json!({ "score": score });

        [AlertRule::FixQualityDrop, AlertRule::ErrorRateSpike]
            .into_iter()
            .filter_map(|rule| self.engine.send_alert_at(rule, &ctx, details.clone(), now))
            .collect()
    }

    /// Recorded occurrences for a fingerprint
    pub fn occurrence_count(&self, fp: &str) -> u64 {
        self.occurrences.read().get(fp).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn setup() -> (Arc<AlertEngine>, SignalDispatcher) {
        let engine = Arc::new(AlertEngine::new());
        let dispatcher = SignalDispatcher::new(engine.clone());
        (engine, dispatcher)
    }

    #[test]
    fn test_fingerprint_groups_by_shape() {
        assert_eq!(
            fingerprint("error at line 42"),
            fingerprint("ERROR at line 7131")
        );
        assert_ne!(fingerprint("error at line 42"), fingerprint("panic at line 42"));
    }

    #[test]
    fn test_new_pattern_fires_on_first_and_second_observation() {
        let (_engine, dispatcher) = setup();
        let t0 = Utc::now();
        let step = Duration::seconds(301);

        let first = dispatcher.observe_error_at("timeout in parser", t0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].rule, "new-error-pattern");

        // second observation: one historical occurrence, still fires
        let second = dispatcher.observe_error_at("timeout in parser", t0 + step);
        assert_eq!(second.len(), 1);

        // third observation: the pattern is established, silent
        let third = dispatcher.observe_error_at("timeout in parser", t0 + step * 2);
        assert!(third.is_empty());

        let fp = fingerprint("timeout in parser");
        assert_eq!(dispatcher.occurrence_count(&fp), 3);
    }

    #[test]
    fn test_critical_error_fires_both_rules() {
        let (_engine, dispatcher) = setup();

        let events = dispatcher.observe_error_at("data corruption detected", Utc::now());
        let rules: Vec<_> = events.iter().map(|e| e.rule.as_str()).collect();

        assert!(rules.contains(&"new-error-pattern"));
        assert!(rules.contains(&"critical-error-pattern"));
    }

    #[test]
    fn test_quality_signal() {
        let (engine, dispatcher) = setup();

        assert!(dispatcher.observe_quality_at(0.9, Utc::now()).is_empty());

        let events = dispatcher.observe_quality_at(0.42, Utc::now());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].rule, "fix-quality-drop");

        // the spike hook stays inert no matter the score
        assert_eq!(engine.by_severity(crate::rules::Severity::High).len(), 1);
    }

    #[test]
    fn test_error_signal_never_touches_quality_rules() {
        let (_engine, dispatcher) = setup();

        let events = dispatcher.observe_error_at("low quality crash", Utc::now());
        assert!(events.iter().all(|e| e.rule != "fix-quality-drop"));
    }
}
