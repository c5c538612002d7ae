//! Principal Store
//!
//! Process-wide registry of principals behind an explicit store interface so
//! the backing can be swapped (in-memory here, transactional elsewhere)
//! without touching the gate contracts.

use crate::model::{Principal, PrincipalId};
use chrono::Utc;
use mend_common::{GateError, GateResult};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Store interface for principals
///
/// `record_request` performs the increment inside a single critical section
/// and reports the post-increment count; callers never read-then-write.
pub trait PrincipalStore: Send + Sync {
    /// Register a principal; fails if the email is already taken
    fn insert(&self, principal: Principal) -> GateResult<()>;

    /// Look up by id
    fn get(&self, id: &PrincipalId) -> Option<Principal>;

    /// Look up by API key (indexed, first/only match)
    fn find_by_api_key(&self, key: &str) -> Option<Principal>;

    /// Look up by contact identifier (indexed)
    fn find_by_email(&self, email: &str) -> Option<Principal>;

    /// Atomically increment the request counter, returning the new count
    fn record_request(&self, id: &PrincipalId) -> GateResult<u64>;

    /// Reset usage counters for a new billing period
    fn rollover_usage(&self, id: &PrincipalId) -> GateResult<()>;

    /// Number of registered principals
    fn count(&self) -> usize;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<PrincipalId, Principal>,
    key_index: HashMap<String, PrincipalId>,
    email_index: HashMap<String, PrincipalId>,
}

/// In-memory principal store
///
/// API keys and emails are secondary indexes over the primary map, so
/// credential resolution is O(1) rather than a table scan.
pub struct InMemoryPrincipalStore {
    inner: RwLock<Inner>,
}

impl InMemoryPrincipalStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for InMemoryPrincipalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrincipalStore for InMemoryPrincipalStore {
    fn insert(&self, principal: Principal) -> GateResult<()> {
        let mut inner = self.inner.write();

        if inner.email_index.contains_key(&principal.email) {
            return Err(GateError::Conflict(format!(
                "account already exists for {}",
                principal.email
            )));
        }

        inner.email_index.insert(principal.email.clone(), principal.id);
        inner.key_index.insert(principal.api_key.clone(), principal.id);
        inner.by_id.insert(principal.id, principal);
        Ok(())
    }

    fn get(&self, id: &PrincipalId) -> Option<Principal> {
        self.inner.read().by_id.get(id).cloned()
    }

    fn find_by_api_key(&self, key: &str) -> Option<Principal> {
        let inner = self.inner.read();
        let id = inner.key_index.get(key)?;
        inner.by_id.get(id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Principal> {
        let inner = self.inner.read();
        let id = inner.email_index.get(email)?;
        inner.by_id.get(id).cloned()
    }

    fn record_request(&self, id: &PrincipalId) -> GateResult<u64> {
        let mut inner = self.inner.write();
        let principal = inner
            .by_id
            .get_mut(id)
            .ok_or_else(|| GateError::Internal(format!("unknown principal {id}")))?;

        principal.usage.requests += 1;
        Ok(principal.usage.requests)
    }

    fn rollover_usage(&self, id: &PrincipalId) -> GateResult<()> {
        let mut inner = self.inner.write();
        let principal = inner
            .by_id
            .get_mut(id)
            .ok_or_else(|| GateError::Internal(format!("unknown principal {id}")))?;

        principal.usage.requests = 0;
        principal.usage.storage_bytes = 0;
        principal.usage.period_started = Utc::now();
        Ok(())
    }

    fn count(&self) -> usize {
        self.inner.read().by_id.len()
    }
}
