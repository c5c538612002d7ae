//! Wire models

use chrono::{DateTime, Utc};
use mend_tenant::{Principal, Role, TierDefinition, Usage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Contact identifier; unique across principals
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Organization label
    pub company: Option<String>,
    /// Tier id; defaults to the lowest paid tier
    pub tier: Option<String>,
}

/// Registration response; the API key is only shown once
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// New principal id
    pub user_id: Uuid,
    /// Long-lived credential for the `x-api-key` header
    pub api_key: String,
    /// Assigned tier id
    pub tier: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Contact identifier
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session credential, valid 24 hours
    pub token: String,
    /// The authenticated account
    pub user: UserView,
}

/// Account details response
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    /// The authenticated account
    pub user: UserView,
    /// Full definition of the account's tier
    pub tier: TierDefinition,
}

/// Principal as exposed over the wire; credentials stay server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    /// Principal id
    pub id: Uuid,
    /// Contact identifier
    pub email: String,
    /// Organization label
    pub company: Option<String>,
    /// Assigned tier id
    pub tier: String,
    /// Account role
    pub role: Role,
    /// Usage counters for the current period
    pub usage: Usage,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Principal> for UserView {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            email: p.email,
            company: p.company,
            tier: p.tier,
            role: p.role,
            usage: p.usage,
            created_at: p.created_at,
        }
    }
}

/// Platform snapshot for operators
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStats {
    /// Registered principals
    pub principals: usize,
    /// Alerts currently retained in history
    pub alerts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_view_omits_credentials() {
        let principal = Principal::new("a@x.com", "hash", None, "starter", "cm_live_secret");
        let view: UserView = principal.into();

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("cm_live_secret"));
        assert!(!json.contains("hash"));
        assert!(json.contains("a@x.com"));
    }
}
