//! Operational Alerting
//!
//! Evaluates a fixed rule set against error and quality signals and emits
//! deduplicated alerts. Each rule runs its own armed → cooling-down state
//! machine (5-minute window); a true predicate during cooldown is dropped,
//! not queued. Alert history is bounded at 1000 events with FIFO eviction.
//!
//! This engine owns its rule table, cooldown table, and history buffer; it
//! shares no mutable state with the metering subsystem and never raises
//! request-visible errors.

#![warn(missing_docs)]

pub mod engine;
pub mod rules;
pub mod signal;

pub use engine::{AlertEngine, AlertEvent};
pub use rules::{AlertRule, RuleContext, Severity};
pub use signal::SignalDispatcher;
