//! Tier orchestration: week → month → quarter → year.
//!
//! Each tier's build is independently callable and takes the prior tier's
//! winners as a plain slice; no tier reads another tier's intermediate
//! state. [`build_awards`] sequences all four for a reference date,
//! threading winners upward.

use chrono::{Datelike, Duration, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::PeriodSlice;
use crate::category::{
    CategoryDefinition, CategoryKind, SelectionMode, WinnerRecord, build_category,
};
use crate::model::Item;
use crate::period::{Period, PeriodError};

/// The four award tiers, nested smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Week,
    Month,
    Quarter,
    Year,
}

const WEEK_KINDS: &[CategoryKind] = &[
    CategoryKind::Showcase,
    CategoryKind::BestSession,
    CategoryKind::Comeback,
];

const MONTH_KINDS: &[CategoryKind] = &[
    CategoryKind::Showcase,
    CategoryKind::BestSession,
    CategoryKind::Comeback,
    CategoryKind::BestValue,
    CategoryKind::Grower,
    CategoryKind::Consistent,
    CategoryKind::Discovery,
];

const QUARTER_KINDS: &[CategoryKind] = &[
    CategoryKind::Showcase,
    CategoryKind::BestSession,
    CategoryKind::Comeback,
    CategoryKind::BestValue,
    CategoryKind::Grower,
    CategoryKind::Consistent,
    CategoryKind::Discovery,
    CategoryKind::Grind,
];

const YEAR_KINDS: &[CategoryKind] = &[
    CategoryKind::Showcase,
    CategoryKind::Soulmate,
    CategoryKind::Surprise,
    CategoryKind::Endurance,
    CategoryKind::Stalled,
    CategoryKind::BestValue,
    CategoryKind::Discovery,
    CategoryKind::Grind,
    CategoryKind::GenrePioneer,
];

impl Tier {
    /// Lower-case noun for ids and reason lines.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Title-case noun for labels.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Quarter => "Quarter",
            Self::Year => "Year",
        }
    }

    /// Maximum nominees per category at this tier.
    #[must_use]
    pub const fn nominee_limit(self) -> usize {
        match self {
            Self::Week | Self::Month => 4,
            Self::Quarter => 5,
            Self::Year => 6,
        }
    }

    /// The fixed, ordered category catalog for this tier.
    #[must_use]
    pub const fn category_kinds(self) -> &'static [CategoryKind] {
        match self {
            Self::Week => WEEK_KINDS,
            Self::Month => MONTH_KINDS,
            Self::Quarter => QUARTER_KINDS,
            Self::Year => YEAR_KINDS,
        }
    }
}

/// Builds every category of one tier for an already-constructed window.
///
/// Categories are independent given the slice and the winner list, so they
/// are built in parallel; collect preserves catalog order.
pub fn build_tier(
    tier: Tier,
    items: &[Item],
    period: Period,
    winners: &[WinnerRecord],
) -> Vec<CategoryDefinition> {
    let slice = PeriodSlice::new(items, period);
    tracing::debug!(
        tier = tier.noun(),
        active = slice.active.len(),
        "building tier categories"
    );
    tier.category_kinds()
        .par_iter()
        .map(|&kind| build_category(kind, tier, &slice, winners))
        .collect()
}

/// Week-tier categories for caller-supplied week bounds.
pub fn build_week_categories(
    items: &[Item],
    start: NaiveDate,
    end: NaiveDate,
    winners: &[WinnerRecord],
) -> Result<Vec<CategoryDefinition>, PeriodError> {
    Ok(build_tier(Tier::Week, items, Period::week(start, end)?, winners))
}

/// Month-tier categories, consuming the week's winners.
pub fn build_month_categories(
    items: &[Item],
    year: i32,
    month: u32,
    winners: &[WinnerRecord],
) -> Result<Vec<CategoryDefinition>, PeriodError> {
    Ok(build_tier(Tier::Month, items, Period::month(year, month)?, winners))
}

/// Quarter-tier categories, consuming the month's winners.
pub fn build_quarter_categories(
    items: &[Item],
    year: i32,
    quarter: u32,
    winners: &[WinnerRecord],
) -> Result<Vec<CategoryDefinition>, PeriodError> {
    Ok(build_tier(
        Tier::Quarter,
        items,
        Period::quarter(year, quarter)?,
        winners,
    ))
}

/// Year-tier categories, consuming the quarter's winners.
pub fn build_year_categories(
    items: &[Item],
    year: i32,
    winners: &[WinnerRecord],
) -> Vec<CategoryDefinition> {
    build_tier(Tier::Year, items, Period::year(year), winners)
}

/// Projects a tier's winners for the tier above: the first nominee of
/// each non-deferred category.
pub fn winners_of(categories: &[CategoryDefinition]) -> Vec<WinnerRecord> {
    categories
        .iter()
        .filter(|c| c.selection == SelectionMode::Ranked)
        .filter_map(|c| {
            c.nominees.first().map(|n| WinnerRecord {
                item_id: Some(n.item_id.clone()),
                name: n.name.clone(),
                label: c.label.clone(),
                icon: c.icon.clone(),
            })
        })
        .collect()
}

/// One tier's built awards.
#[derive(Debug, Clone, Serialize)]
pub struct TierAwards {
    pub tier: Tier,
    pub period: Period,
    pub categories: Vec<CategoryDefinition>,
}

/// All four tiers for one reference date.
#[derive(Debug, Clone, Serialize)]
pub struct AwardsReport {
    pub reference_date: NaiveDate,
    pub week: TierAwards,
    pub month: TierAwards,
    pub quarter: TierAwards,
    pub year: TierAwards,
}

impl AwardsReport {
    /// The built awards for one tier.
    #[must_use]
    pub const fn tier(&self, tier: Tier) -> &TierAwards {
        match tier {
            Tier::Week => &self.week,
            Tier::Month => &self.month,
            Tier::Quarter => &self.quarter,
            Tier::Year => &self.year,
        }
    }
}

/// Builds all four tiers for a reference date, threading each tier's
/// winners into the next tier's highlight computation.
///
/// The week window is the trailing seven days ending on the reference
/// date; month, quarter, and year are the civil periods containing it.
pub fn build_awards(items: &[Item], reference: NaiveDate) -> AwardsReport {
    let year = reference.year();
    let month = reference.month();
    let quarter = (month - 1) / 3 + 1;

    // Bounds are derived from the reference date, so constructors cannot
    // fail here.
    let week_period = Period::week(reference - Duration::days(6), reference).unwrap();
    let month_period = Period::month(year, month).unwrap();
    let quarter_period = Period::quarter(year, quarter).unwrap();

    let week = build_tier(Tier::Week, items, week_period, &[]);
    let week_winners = winners_of(&week);

    let month_cats = build_tier(Tier::Month, items, month_period, &week_winners);
    let month_winners = winners_of(&month_cats);

    let quarter_cats = build_tier(Tier::Quarter, items, quarter_period, &month_winners);
    let quarter_winners = winners_of(&quarter_cats);

    let year_cats = build_year_categories(items, year, &quarter_winners);

    AwardsReport {
        reference_date: reference,
        week: TierAwards {
            tier: Tier::Week,
            period: week_period,
            categories: week,
        },
        month: TierAwards {
            tier: Tier::Month,
            period: month_period,
            categories: month_cats,
        },
        quarter: TierAwards {
            tier: Tier::Quarter,
            period: quarter_period,
            categories: quarter_cats,
        },
        year: TierAwards {
            tier: Tier::Year,
            period: Period::year(year),
            categories: year_cats,
        },
    }
}
