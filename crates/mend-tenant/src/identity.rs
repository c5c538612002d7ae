//! Credential Resolution
//!
//! The auth gate: resolves an inbound API key or signed session token to a
//! registered principal. Resolution never mutates principal state.

use crate::model::{Principal, Role};
use crate::store::PrincipalStore;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mend_common::{GateError, GateResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

const DEV_SECRET: &str = "codemend-dev-secret-change-in-production";

/// Session token lifetime
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in a session credential
///
/// Stateless: validity is signature plus expiry, there is no server-side
/// session table.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id
    pub sub: Uuid,
    /// Contact identifier
    pub email: String,
    /// Account role at issuance
    pub role: Role,
    /// Expiry (unix seconds)
    pub exp: usize,
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a fresh opaque API key
pub fn generate_api_key() -> String {
    format!("cm_live_{}", Uuid::new_v4().to_string().replace('-', ""))
}

/// Auth gate
pub struct Authenticator {
    store: Arc<dyn PrincipalStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Authenticator {
    /// Create an authenticator signing with the given secret
    pub fn new(store: Arc<dyn PrincipalStore>, secret: &str) -> Self {
        Self {
            store,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create an authenticator with the secret from `CODEMEND_JWT_SECRET`
    pub fn from_env(store: Arc<dyn PrincipalStore>) -> Self {
        let secret = std::env::var("CODEMEND_JWT_SECRET").unwrap_or_else(|_| DEV_SECRET.into());
        Self::new(store, &secret)
    }

    /// Issue a session credential for a principal
    pub fn create_token(&self, principal: &Principal) -> GateResult<String> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: principal.id,
            email: principal.email.clone(),
            role: principal.role,
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| GateError::Internal(format!("token encoding: {e}")))
    }

    /// Verify a session credential's signature and expiry
    pub fn verify_token(&self, token: &str) -> GateResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| GateError::Unauthenticated("invalid or expired token".into()))
    }

    /// Resolve an inbound request's credentials to a principal.
    ///
    /// An API key is tried first (exact match through the store index); if
    /// absent or unmatched, the bearer token is tried. Any remaining failure
    /// is `Unauthenticated` and the request never reaches a handler.
    pub fn resolve(&self, api_key: Option<&str>, bearer: Option<&str>) -> GateResult<Principal> {
        if let Some(key) = api_key {
            if let Some(principal) = self.store.find_by_api_key(key) {
                return Ok(principal);
            }
        }

        if let Some(token) = bearer {
            let claims = self.verify_token(token)?;
            return self
                .store
                .get(&claims.sub)
                .ok_or_else(|| GateError::Unauthenticated("unknown principal".into()));
        }

        Err(GateError::Unauthenticated("missing credentials".into()))
    }

    /// Check a login attempt and issue a session credential
    pub fn login(&self, email: &str, password: &str) -> GateResult<(String, Principal)> {
        let principal = self
            .store
            .find_by_email(email)
            .ok_or_else(|| GateError::Unauthenticated("invalid email or password".into()))?;

        if principal.password_hash != hash_password(password) {
            return Err(GateError::Unauthenticated("invalid email or password".into()));
        }

        let token = self.create_token(&principal)?;
        Ok((token, principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPrincipalStore;

    fn setup() -> (Arc<InMemoryPrincipalStore>, Authenticator, Principal) {
        let store = Arc::new(InMemoryPrincipalStore::new());
        let auth = Authenticator::new(store.clone(), "test-secret");
        let principal = Principal::new(
            "dev@acme.com",
            &hash_password("hunter2"),
            None,
            "starter",
            &generate_api_key(),
        );
        store.insert(principal.clone()).unwrap();
        (store, auth, principal)
    }

    #[test]
    fn test_api_key_resolution() {
        let (_store, auth, principal) = setup();

        let resolved = auth.resolve(Some(&principal.api_key), None).unwrap();
        assert_eq!(resolved.id, principal.id);
    }

    #[test]
    fn test_unmatched_key_falls_through_to_bearer() {
        let (_store, auth, principal) = setup();
        let token = auth.create_token(&principal).unwrap();

        let resolved = auth.resolve(Some("cm_live_bogus"), Some(&token)).unwrap();
        assert_eq!(resolved.id, principal.id);
    }

    #[test]
    fn test_missing_credentials() {
        let (_store, auth, _principal) = setup();

        let err = auth.resolve(None, None).unwrap_err();
        assert!(matches!(err, GateError::Unauthenticated(_)));
    }

    #[test]
    fn test_token_roundtrip() {
        let (_store, auth, principal) = setup();

        let token = auth.create_token(&principal).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, principal.id);
        assert_eq!(claims.email, principal.email);
    }

    #[test]
    fn test_forged_token_rejected() {
        let (store, auth, principal) = setup();
        let other = Authenticator::new(store, "different-secret");

        let forged = other.create_token(&principal).unwrap();
        assert!(auth.verify_token(&forged).is_err());
        assert!(auth.resolve(None, Some(&forged)).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let (_store, auth, principal) = setup();

        let expired = Claims {
            sub: principal.id,
            email: principal.email.clone(),
            role: principal.role,
            exp: (chrono::Utc::now().timestamp() - 7200) as usize,
        };
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = auth.resolve(None, Some(&token)).unwrap_err();
        assert!(matches!(err, GateError::Unauthenticated(_)));
    }

    #[test]
    fn test_token_for_deleted_principal() {
        let store = Arc::new(InMemoryPrincipalStore::new());
        let auth = Authenticator::new(store, "test-secret");
        let ghost = Principal::new("ghost@x.com", "h", None, "starter", "cm_live_g");

        let token = auth.create_token(&ghost).unwrap();
        let err = auth.resolve(None, Some(&token)).unwrap_err();
        assert!(matches!(err, GateError::Unauthenticated(_)));
    }

    #[test]
    fn test_login() {
        let (_store, auth, principal) = setup();

        let (token, user) = auth.login("dev@acme.com", "hunter2").unwrap();
        assert_eq!(user.id, principal.id);
        assert!(auth.verify_token(&token).is_ok());

        let err = auth.login("dev@acme.com", "wrong").unwrap_err();
        assert!(matches!(err, GateError::Unauthenticated(_)));

        let err = auth.login("nobody@acme.com", "hunter2").unwrap_err();
        assert!(matches!(err, GateError::Unauthenticated(_)));
    }

    #[test]
    fn test_api_key_format() {
        let key = generate_api_key();
        assert!(key.starts_with("cm_live_"));
        assert_eq!(key.len(), "cm_live_".len() + 32);
    }
}
