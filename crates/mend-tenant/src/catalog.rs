//! Subscription Tier Catalog
//!
//! Static, immutable mapping from tier id to quota limits and display
//! metadata. Tier changes are administrative and happen outside this core.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel limit value meaning "no limit"
pub const UNLIMITED: i64 = -1;

/// A subscription tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierDefinition {
    /// Catalog key
    pub id: String,
    /// Display name
    pub name: String,
    /// Monthly price in cents
    pub price_cents: u64,
    /// ISO currency code
    pub currency: String,
    /// Billing interval
    pub interval: String,
    /// Quota limits
    pub limits: TierLimits,
}

/// Quota limits for a tier; `-1` disables the corresponding check
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierLimits {
    /// Metered requests per billing period
    pub requests: i64,
    /// Storage quota in GB
    pub storage_gb: i64,
    /// Seats
    pub users: i64,
}

/// Tier catalog
pub struct TierCatalog {
    tiers: HashMap<String, TierDefinition>,
}

impl TierCatalog {
    /// Build the canonical catalog
    pub fn new() -> Self {
        let mut tiers = HashMap::new();

        tiers.insert("starter".into(), TierDefinition {
            id: "starter".into(),
            name: "Starter".into(),
            price_cents: 2900,
            currency: "USD".into(),
            interval: "month".into(),
            limits: TierLimits { requests: 1000, storage_gb: 1, users: 1 },
        });

        tiers.insert("professional".into(), TierDefinition {
            id: "professional".into(),
            name: "Professional".into(),
            price_cents: 9900,
            currency: "USD".into(),
            interval: "month".into(),
            limits: TierLimits { requests: 50_000, storage_gb: 50, users: 10 },
        });

        tiers.insert("enterprise".into(), TierDefinition {
            id: "enterprise".into(),
            name: "Enterprise".into(),
            price_cents: 49_900,
            currency: "USD".into(),
            interval: "month".into(),
            limits: TierLimits { requests: UNLIMITED, storage_gb: 500, users: UNLIMITED },
        });

        Self { tiers }
    }

    /// Default tier for new registrations (lowest paid tier)
    pub fn default_tier() -> &'static str {
        "starter"
    }

    /// Resolve a tier by id
    pub fn get(&self, id: &str) -> Option<&TierDefinition> {
        self.tiers.get(id)
    }

    /// Whether the id resolves in the catalog
    pub fn contains(&self, id: &str) -> bool {
        self.tiers.contains_key(id)
    }

    /// All tiers, cheapest first
    pub fn list(&self) -> Vec<&TierDefinition> {
        let mut all: Vec<_> = self.tiers.values().collect();
        all.sort_by_key(|t| t.price_cents);
        all
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::new()
    }
}
