//! Alert Rules
//!
//! The rule set is a closed enum: one variant per named rule, dispatched
//! through a single evaluator. Rules are evaluated against heterogeneous
//! context shapes; the signal dispatcher decides which rules see which
//! incoming signal.

use serde::{Deserialize, Serialize};

/// Keywords that mark an error message as critical
const CRITICAL_KEYWORDS: [&str; 4] = ["corruption", "crash", "data loss", "security"];

/// Alert severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Immediate attention
    Critical,
    /// Urgent
    High,
    /// Notable
    Medium,
    /// Informational
    Low,
}

/// Signal context a rule predicate runs against
#[derive(Debug, Clone)]
pub enum RuleContext {
    /// A single error occurrence
    Error {
        /// Derived identifier grouping recurring errors by shape
        fingerprint: String,
        /// Raw error message
        message: String,
        /// Historical occurrence count for this fingerprint, prior to the
        /// current observation; absent the first time a pattern is seen
        occurrences: Option<u64>,
    },
    /// Aggregate fix-quality statistics
    Quality {
        /// Mean quality score over the reporting window, 0.0..=1.0
        score: f64,
    },
}

/// The fixed rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertRule {
    /// An error fingerprint seen for the first or second time
    NewErrorPattern,
    /// An error message containing a critical keyword
    CriticalErrorPattern,
    /// Aggregate fix quality dropped below threshold
    FixQualityDrop,
    /// Declared but intentionally inert; extension point for a future
    /// windowed error-rate signal. The predicate never fires.
    ErrorRateSpike,
}

impl AlertRule {
    /// Every rule, in evaluation order
    pub const ALL: [AlertRule; 4] = [
        AlertRule::NewErrorPattern,
        AlertRule::CriticalErrorPattern,
        AlertRule::FixQualityDrop,
        AlertRule::ErrorRateSpike,
    ];

    /// Stable rule identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::NewErrorPattern => "new-error-pattern",
            Self::CriticalErrorPattern => "critical-error-pattern",
            Self::FixQualityDrop => "fix-quality-drop",
            Self::ErrorRateSpike => "error-rate-spike",
        }
    }

    /// Severity of alerts this rule emits
    pub fn severity(&self) -> Severity {
        match self {
            Self::NewErrorPattern => Severity::Medium,
            Self::CriticalErrorPattern => Severity::Critical,
            Self::FixQualityDrop => Severity::High,
            Self::ErrorRateSpike => Severity::High,
        }
    }

    /// Human-readable alert message
    pub fn message(&self) -> &'static str {
        match self {
            Self::NewErrorPattern => "new error pattern observed",
            Self::CriticalErrorPattern => "critical error pattern detected",
            Self::FixQualityDrop => "fix quality dropped below threshold",
            Self::ErrorRateSpike => "error rate spike detected",
        }
    }

    /// Evaluate the rule predicate against a context.
    ///
    /// A rule given a context shape it does not understand returns false.
    pub fn evaluate(&self, ctx: &RuleContext) -> bool {
        match (self, ctx) {
            (Self::NewErrorPattern, RuleContext::Error { occurrences, .. }) => {
                // Fires when the fingerprint has at most one historical
                // occurrence: the very first observation (count absent) or
                // the first repetition (count == 1).
                occurrences.map_or(true, |n| n == 1)
            }
            (Self::CriticalErrorPattern, RuleContext::Error { message, .. }) => {
                let lower = message.to_lowercase();
                CRITICAL_KEYWORDS.iter().any(|k| lower.contains(k))
            }
            (Self::FixQualityDrop, RuleContext::Quality { score }) => *score < 0.5,
            // Inert hook: wire a real predicate here once a windowed error
            // rate is tracked.
            (Self::ErrorRateSpike, _) => false,
            _ => false,
        }
    }
}
