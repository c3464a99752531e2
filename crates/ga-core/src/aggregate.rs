//! In-window aggregation of play history.
//!
//! Pure functions over caller-supplied item slices: nothing here mutates
//! input or holds state past the call. A [`PeriodSlice`] bundles one
//! window's aggregates and is the input every classifier consumes.

use chrono::NaiveDate;

use crate::model::{HistoryEntry, Item};
use crate::period::Period;

/// One item's aggregated in-window activity.
#[derive(Debug, Clone, Copy)]
pub struct ItemActivity<'a> {
    pub item: &'a Item,
    /// Sum of in-window entry hours.
    pub total_hours: f64,
    /// Count of in-window entries.
    pub session_count: usize,
}

/// Aggregates items into per-item in-window totals.
///
/// Only items with at least one entry inside the window appear in the
/// result; input order is preserved, which makes later stable sorts keep
/// the caller's ordering on ties.
pub fn aggregate<'a>(items: &'a [Item], period: &Period) -> Vec<ItemActivity<'a>> {
    items
        .iter()
        .filter_map(|item| {
            let mut total_hours = 0.0;
            let mut session_count = 0;
            for entry in &item.history {
                if period.contains(entry.date) {
                    total_hours += entry.hours;
                    session_count += 1;
                }
            }
            (session_count > 0).then_some(ItemActivity {
                item,
                total_hours,
                session_count,
            })
        })
        .collect()
}

/// In-window entries sorted ascending by date.
///
/// The sort is stable, so same-day entries keep their insertion order.
pub fn entries_in_window(item: &Item, period: &Period) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = item
        .history
        .iter()
        .filter(|e| period.contains(e.date))
        .copied()
        .collect();
    entries.sort_by_key(|e| e.date);
    entries
}

/// Longest single in-window session, 0.0 if the item has none.
pub fn best_single_session(item: &Item, period: &Period) -> f64 {
    item.history
        .iter()
        .filter(|e| period.contains(e.date))
        .map(|e| e.hours)
        .fold(0.0, f64::max)
}

/// Total hours across the item's entire history.
pub fn lifetime_hours(item: &Item) -> f64 {
    item.history.iter().map(|e| e.hours).sum()
}

/// Date of the item's first-ever play log, across all history.
pub fn first_play_date(item: &Item) -> Option<NaiveDate> {
    item.history.iter().map(|e| e.date).min()
}

/// One window's aggregated view of the library.
#[derive(Debug, Clone)]
pub struct PeriodSlice<'a> {
    pub period: Period,
    /// The full library, including items with no in-window activity.
    pub items: &'a [Item],
    /// Items with in-window activity, in library order.
    pub active: Vec<ItemActivity<'a>>,
}

impl<'a> PeriodSlice<'a> {
    /// Aggregates the library for one window.
    pub fn new(items: &'a [Item], period: Period) -> Self {
        let active = aggregate(items, &period);
        Self {
            period,
            items,
            active,
        }
    }
}
