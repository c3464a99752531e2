//! CLI command implementations.

use ga_core::Tier;

pub mod awards;
pub mod catalog;

pub(crate) const ALL_TIERS: [Tier; 4] = [Tier::Week, Tier::Month, Tier::Quarter, Tier::Year];

/// Expands an optional tier filter into the tiers to render, in order.
pub(crate) fn selected_tiers(filter: Option<Tier>) -> Vec<Tier> {
    filter.map_or_else(|| ALL_TIERS.to_vec(), |tier| vec![tier])
}
