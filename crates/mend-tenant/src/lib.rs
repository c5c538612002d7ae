//! Multi-Tenant Account Gating
//!
//! Principals, subscription tiers, credential resolution, and quota
//! enforcement for the CodeMend API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       REQUEST GATE                              │
//! │                                                                 │
//! │   inbound request                                               │
//! │        │                                                        │
//! │        ▼                                                        │
//! │  ┌───────────┐     ┌─────────────────┐                          │
//! │  │ Auth Gate │────▶│ Principal Store │◀── api-key / email index │
//! │  └─────┬─────┘     └─────────────────┘                          │
//! │        │ principal                                              │
//! │        ▼                                                        │
//! │  ┌─────────────┐   ┌──────────────┐                             │
//! │  │ Usage Meter │──▶│ Tier Catalog │                             │
//! │  └─────┬───────┘   └──────────────┘                             │
//! │        │ allow + {tier, used, limit}   │ deny 402/429           │
//! │        ▼                                                        │
//! │   downstream handler                                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod identity;
pub mod metering;
pub mod model;
pub mod store;

pub use catalog::{TierCatalog, TierDefinition, TierLimits, UNLIMITED};
pub use identity::Authenticator;
pub use metering::{MeterDecision, UsageMeter};
pub use model::{Principal, PrincipalId, Role, Usage};
pub use store::{InMemoryPrincipalStore, PrincipalStore};
