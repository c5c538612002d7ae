//! Alert Engine
//!
//! Per-rule armed/cooling-down state machine over a bounded event history.

use crate::rules::{AlertRule, RuleContext, Severity};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// Minimum seconds between successive alerts from the same rule
const COOLDOWN_SECS: i64 = 300;

/// Most recent events retained; the oldest is evicted past this
const HISTORY_CAP: usize = 1000;

/// A generated alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Unique event id
    pub id: Uuid,
    /// Rule that fired
    pub rule: String,
    /// Severity inherited from the rule
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Arbitrary detail payload from the signal path
    pub details: serde_json::Value,
    /// Emission time
    pub timestamp: DateTime<Utc>,
}

struct EngineInner {
    /// Rule id → cooldown start; a present entry younger than the window
    /// means the rule is cooling down
    cooldowns: HashMap<&'static str, DateTime<Utc>>,
    history: VecDeque<AlertEvent>,
}

impl EngineInner {
    fn cooling_down(&self, rule: AlertRule, now: DateTime<Utc>) -> bool {
        self.cooldowns
            .get(rule.id())
            .is_some_and(|started| now - *started < Duration::seconds(COOLDOWN_SECS))
    }
}

/// Alert engine
///
/// Invoked synchronously from whatever signal path triggers it; there is no
/// background loop. All operations are non-blocking lookups and arithmetic.
pub struct AlertEngine {
    inner: RwLock<EngineInner>,
}

impl AlertEngine {
    /// Create an engine with every rule armed
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(EngineInner {
                cooldowns: HashMap::new(),
                history: VecDeque::new(),
            }),
        }
    }

    /// Whether the rule would fire for this context right now
    pub fn should_alert(&self, rule: AlertRule, ctx: &RuleContext) -> bool {
        self.should_alert_at(rule, ctx, Utc::now())
    }

    /// Clock-explicit `should_alert`.
    ///
    /// Returns false while the rule is cooling down, regardless of the
    /// predicate; a true predicate during cooldown is dropped, not deferred.
    pub fn should_alert_at(&self, rule: AlertRule, ctx: &RuleContext, now: DateTime<Utc>) -> bool {
        if self.inner.read().cooling_down(rule, now) {
            return false;
        }
        rule.evaluate(ctx)
    }

    /// Fire the rule if it should fire, recording and emitting the event
    pub fn send_alert(
        &self,
        rule: AlertRule,
        ctx: &RuleContext,
        details: serde_json::Value,
    ) -> Option<AlertEvent> {
        self.send_alert_at(rule, ctx, details, Utc::now())
    }

    /// Clock-explicit `send_alert`.
    ///
    /// Re-checks the cooldown and predicate under the write lock (guard
    /// against double-invocation), then appends to history, starts the
    /// rule's cooldown, and emits to the log sink.
    pub fn send_alert_at(
        &self,
        rule: AlertRule,
        ctx: &RuleContext,
        details: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Option<AlertEvent> {
        let mut inner = self.inner.write();

        if inner.cooling_down(rule, now) || !rule.evaluate(ctx) {
            return None;
        }

        let event = AlertEvent {
            id: Uuid::new_v4(),
            rule: rule.id().to_string(),
            severity: rule.severity(),
            message: rule.message().to_string(),
            details,
            timestamp: now,
        };

        inner.history.push_back(event.clone());
        if inner.history.len() > HISTORY_CAP {
            inner.history.pop_front();
        }
        inner.cooldowns.insert(rule.id(), now);
        drop(inner);

        match event.severity {
            Severity::Critical | Severity::High => {
                tracing::error!(rule = %event.rule, message = %event.message, "alert fired")
            }
            Severity::Medium | Severity::Low => {
                tracing::warn!(rule = %event.rule, message = %event.message, "alert fired")
            }
        }

        Some(event)
    }

    /// The `n` most recent alerts, newest first
    pub fn recent(&self, n: usize) -> Vec<AlertEvent> {
        self.inner.read().history.iter().rev().take(n).cloned().collect()
    }

    /// Stored alerts of the given severity, newest first
    pub fn by_severity(&self, severity: Severity) -> Vec<AlertEvent> {
        self.inner
            .read()
            .history
            .iter()
            .rev()
            .filter(|e| e.severity == severity)
            .cloned()
            .collect()
    }

    /// Number of alerts currently retained
    pub fn history_len(&self) -> usize {
        self.inner.read().history.len()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn critical_ctx(message: &str) -> RuleContext {
        RuleContext::Error {
            fingerprint: "fp".into(),
            message: message.into(),
            occurrences: Some(7),
        }
    }

    #[test]
    fn test_cooldown_suppresses_then_rearms() {
        let engine = AlertEngine::new();
        let t0 = Utc::now();
        let rule = AlertRule::CriticalErrorPattern;

        let first = engine
            .send_alert_at(rule, &critical_ctx("data corruption detected"), json!({}), t0)
            .unwrap();
        assert_eq!(first.severity, Severity::Critical);

        // different message, same rule, inside the window: suppressed
        let inside = t0 + Duration::seconds(30);
        assert!(!engine.should_alert_at(rule, &critical_ctx("kernel crash"), inside));
        assert!(engine
            .send_alert_at(rule, &critical_ctx("kernel crash"), json!({}), inside)
            .is_none());

        // after the 5-minute window elapses the rule is armed again
        let after = t0 + Duration::seconds(COOLDOWN_SECS + 1);
        assert!(engine.should_alert_at(rule, &critical_ctx("kernel crash"), after));
        assert!(engine
            .send_alert_at(rule, &critical_ctx("kernel crash"), json!({}), after)
            .is_some());
        assert_eq!(engine.history_len(), 2);
    }

    #[test]
    fn test_false_predicate_never_fires() {
        let engine = AlertEngine::new();

        assert!(!engine.should_alert(AlertRule::FixQualityDrop, &RuleContext::Quality { score: 0.8 }));
        assert!(engine
            .send_alert(AlertRule::FixQualityDrop, &RuleContext::Quality { score: 0.8 }, json!({}))
            .is_none());
        assert_eq!(engine.history_len(), 0);
    }

    #[test]
    fn test_history_fifo_eviction() {
        let engine = AlertEngine::new();
        let t0 = Utc::now();
        let ctx = RuleContext::Quality { score: 0.1 };

        // spaced past the cooldown window so every send fires
        let mut first_id = None;
        for i in 0..(HISTORY_CAP as i64 + 1) {
            let now = t0 + Duration::seconds(i * (COOLDOWN_SECS + 1));
            let event = engine
                .send_alert_at(AlertRule::FixQualityDrop, &ctx, json!({"n": i}), now)
                .unwrap();
            first_id.get_or_insert(event.id);
        }

        assert_eq!(engine.history_len(), HISTORY_CAP);
        // the oldest entry (the very first) was evicted, newest retained
        let oldest = engine.recent(HISTORY_CAP).pop().unwrap();
        assert_ne!(oldest.id, first_id.unwrap());
        assert_eq!(oldest.details, json!({"n": 1}));
    }

    #[test]
    fn test_recent_is_reverse_chronological() {
        let engine = AlertEngine::new();
        let t0 = Utc::now();

        engine.send_alert_at(
            AlertRule::FixQualityDrop,
            &RuleContext::Quality { score: 0.2 },
            json!({}),
            t0,
        );
        engine.send_alert_at(
            AlertRule::CriticalErrorPattern,
            &critical_ctx("security violation"),
            json!({}),
            t0 + Duration::seconds(1),
        );

        let recent = engine.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].rule, "critical-error-pattern");
        assert_eq!(recent[1].rule, "fix-quality-drop");

        assert_eq!(engine.recent(1).len(), 1);
    }

    #[test]
    fn test_by_severity_filter() {
        let engine = AlertEngine::new();
        let t0 = Utc::now();

        engine.send_alert_at(
            AlertRule::FixQualityDrop,
            &RuleContext::Quality { score: 0.2 },
            json!({}),
            t0,
        );
        engine.send_alert_at(
            AlertRule::CriticalErrorPattern,
            &critical_ctx("data loss imminent"),
            json!({}),
            t0,
        );

        assert_eq!(engine.by_severity(Severity::Critical).len(), 1);
        assert_eq!(engine.by_severity(Severity::High).len(), 1);
        assert!(engine.by_severity(Severity::Low).is_empty());
    }

    #[test]
    fn test_rules_cool_down_independently() {
        let engine = AlertEngine::new();
        let t0 = Utc::now();

        engine
            .send_alert_at(AlertRule::CriticalErrorPattern, &critical_ctx("crash"), json!({}), t0)
            .unwrap();

        // a different rule is unaffected by the first rule's cooldown
        assert!(engine
            .send_alert_at(
                AlertRule::FixQualityDrop,
                &RuleContext::Quality { score: 0.3 },
                json!({}),
                t0 + Duration::seconds(1),
            )
            .is_some());
    }
}
