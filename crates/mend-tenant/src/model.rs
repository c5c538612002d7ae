//! Principal Data Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Principal ID
pub type PrincipalId = Uuid;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Unique principal ID
    pub id: PrincipalId,
    /// Contact identifier; at most one principal per email
    pub email: String,
    /// Organization label
    pub company: Option<String>,
    /// Assigned tier id (resolved against the tier catalog)
    pub tier: String,
    /// Long-lived opaque credential, sent directly in the `x-api-key` header
    pub api_key: String,
    /// SHA-256 hex digest of the password
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// Running usage counters for the current billing period
    pub usage: Usage,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Create a new principal on the given tier
    pub fn new(
        email: &str,
        password_hash: &str,
        company: Option<String>,
        tier: &str,
        api_key: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            company,
            tier: tier.to_string(),
            api_key: api_key.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::User,
            usage: Usage::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this principal may access admin-only routes
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    User,
    /// Platform operator
    Admin,
}

/// Per-period usage counters
///
/// Counters are monotonically non-decreasing within a billing period; only
/// an explicit rollover resets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Metered requests this period
    pub requests: u64,
    /// Stored bytes attributed to this principal
    pub storage_bytes: u64,
    /// Start of the current billing period
    pub period_started: DateTime<Utc>,
}

impl Usage {
    /// Fresh counters starting now
    pub fn new() -> Self {
        Self {
            requests: 0,
            storage_bytes: 0,
            period_started: Utc::now(),
        }
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::new()
    }
}
