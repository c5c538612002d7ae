//! Usage Metering and Quota Enforcement

use crate::catalog::{TierCatalog, UNLIMITED};
use crate::model::Principal;
use crate::store::PrincipalStore;
use mend_common::{GateError, GateResult};
use std::sync::Arc;

/// Outcome of an admitted request, attached to the outbound response
#[derive(Debug, Clone)]
pub struct MeterDecision {
    /// Tier id the request was metered against
    pub tier: String,
    /// Requests used this period, including this one
    pub used: u64,
    /// Configured request limit (`-1` for unlimited)
    pub limit: i64,
}

/// Usage meter
///
/// Decides whether to admit an authenticated request and updates the
/// principal's counters. The increment happens before the limit check, so
/// the request that crosses the limit is itself counted and rejected, and
/// nothing is ever refunded on rejection.
pub struct UsageMeter {
    store: Arc<dyn PrincipalStore>,
    catalog: Arc<TierCatalog>,
}

impl UsageMeter {
    /// Create a meter over the given store and catalog
    pub fn new(store: Arc<dyn PrincipalStore>, catalog: Arc<TierCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Meter one request for the principal.
    ///
    /// Tier resolution runs first: an unresolvable tier fails with
    /// `InvalidSubscription` before any counter mutation. Otherwise the
    /// counter is incremented unconditionally and the check is
    /// `count > limit`, so with limit L the L-th request is admitted and
    /// the (L+1)-th is the first rejected one.
    pub fn admit(&self, principal: &Principal) -> GateResult<MeterDecision> {
        let tier = self
            .catalog
            .get(&principal.tier)
            .ok_or_else(|| GateError::InvalidSubscription(principal.tier.clone()))?;

        let used = self.store.record_request(&principal.id)?;

        let limit = tier.limits.requests;
        if limit != UNLIMITED && used as i64 > limit {
            return Err(GateError::QuotaExceeded { limit });
        }

        Ok(MeterDecision {
            tier: tier.id.clone(),
            used,
            limit,
        })
    }
}
