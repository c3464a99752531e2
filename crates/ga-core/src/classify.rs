//! Award classifiers.
//!
//! Each classifier consumes one window's [`PeriodSlice`] and returns a
//! ranked subset of the active items. Sorts are stable, so ties keep the
//! aggregator's (library) order. All heuristic thresholds are named
//! constants so tests can assert on the exact policy values.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::aggregate::{
    ItemActivity, PeriodSlice, best_single_session, entries_in_window, first_play_date,
    lifetime_hours,
};
use crate::model::{Item, ItemStatus};
use crate::period::Period;

/// Minimum day gap between two consecutive sessions for "The Comeback".
pub const COMEBACK_GAP_DAYS: i64 = 7;

/// Minimum in-window sessions before trend detection applies.
pub const GROWTH_MIN_SESSIONS: usize = 3;

/// Second-half average hours must exceed this multiple of the first half.
pub const GROWTH_RATIO: f64 = 1.2;

/// Minimum in-window sessions before consistency detection applies.
pub const CONSISTENCY_MIN_SESSIONS: usize = 3;

/// Gap standard deviation must stay below this fraction of the mean gap.
pub const CONSISTENCY_STDDEV_RATIO: f64 = 0.6;

/// Mean gap must stay below this many days.
pub const CONSISTENCY_MAX_MEAN_GAP_DAYS: f64 = 15.0;

/// Upper rating bound (inclusive) for "The Grind".
pub const GRIND_MAX_RATING: f64 = 7.0;

/// Minimum in-window hours for "The Grind".
pub const GRIND_MIN_HOURS: f64 = 5.0;

/// Minimum rating for "Soulmate".
pub const SOULMATE_MIN_RATING: f64 = 7.0;

/// Minimum in-window hours for "Soulmate".
pub const SOULMATE_MIN_HOURS: f64 = 10.0;

/// Minimum rating for "Surprise".
pub const SURPRISE_MIN_RATING: f64 = 7.0;

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Active items ranked by in-window hours, descending.
pub fn top_by_hours<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let mut ranked = slice.active.clone();
    ranked.sort_by(|a, b| desc(a.total_hours, b.total_hours));
    ranked
}

/// Active items ranked by their longest single in-window session.
pub fn best_session<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let mut ranked = slice.active.clone();
    ranked.sort_by(|a, b| {
        desc(
            best_single_session(a.item, &slice.period),
            best_single_session(b.item, &slice.period),
        )
    });
    ranked
}

/// Longest gap in days between consecutive in-window sessions, 0 with
/// fewer than two sessions.
pub fn longest_gap_days(item: &Item, period: &Period) -> i64 {
    entries_in_window(item, period)
        .windows(2)
        .map(|pair| (pair[1].date - pair[0].date).num_days())
        .max()
        .unwrap_or(0)
}

/// Items that came back after a break: at least two in-window sessions
/// with a gap of [`COMEBACK_GAP_DAYS`] or more between some consecutive
/// pair. Unordered boolean filter; library order is kept.
pub fn comeback<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    slice
        .active
        .iter()
        .filter(|a| a.session_count >= 2 && longest_gap_days(a.item, &slice.period) >= COMEBACK_GAP_DAYS)
        .copied()
        .collect()
}

/// Lifetime cost per hour, `None` when the item is free or unplayed.
///
/// Excluding rather than assigning a sentinel keeps infinities and NaN out
/// of the ranking entirely.
pub fn cost_per_hour(item: &Item) -> Option<f64> {
    let hours = lifetime_hours(item);
    if item.price > 0.0 && hours > 0.0 {
        Some(item.price / hours)
    } else {
        None
    }
}

/// Paid items ranked by lifetime cost per hour, ascending (cheapest first).
pub fn best_value<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let mut ranked: Vec<(ItemActivity<'a>, f64)> = slice
        .active
        .iter()
        .filter_map(|a| cost_per_hour(a.item).map(|cph| (*a, cph)))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| asc(*a, *b));
    ranked.into_iter().map(|(a, _)| a).collect()
}

/// Average hours of the first and second half of the in-window sessions,
/// split at the floor-divide midpoint. `None` with fewer than two
/// sessions.
pub fn half_averages(item: &Item, period: &Period) -> Option<(f64, f64)> {
    let entries = entries_in_window(item, period);
    if entries.len() < 2 {
        return None;
    }
    let mid = entries.len() / 2;
    let avg = |chunk: &[crate::model::HistoryEntry]| {
        chunk.iter().map(|e| e.hours).sum::<f64>() / chunk.len() as f64
    };
    Some((avg(&entries[..mid]), avg(&entries[mid..])))
}

/// Items whose engagement is escalating: at least
/// [`GROWTH_MIN_SESSIONS`] sessions, and the second half of the session
/// list averages more than [`GROWTH_RATIO`] times the first half.
pub fn grower<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    slice
        .active
        .iter()
        .filter(|a| {
            a.session_count >= GROWTH_MIN_SESSIONS
                && half_averages(a.item, &slice.period)
                    .is_some_and(|(first, second)| second > GROWTH_RATIO * first)
        })
        .copied()
        .collect()
}

/// Mean and population standard deviation of the day gaps between
/// consecutive in-window sessions. `None` with fewer than two sessions.
pub fn gap_stats(item: &Item, period: &Period) -> Option<(f64, f64)> {
    let entries = entries_in_window(item, period);
    if entries.len() < 2 {
        return None;
    }
    let gaps: Vec<f64> = entries
        .windows(2)
        .map(|pair| (pair[1].date - pair[0].date).num_days() as f64)
        .collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
    Some((mean, variance.sqrt()))
}

/// Items played on a steady cadence: at least
/// [`CONSISTENCY_MIN_SESSIONS`] sessions, gap standard deviation below
/// [`CONSISTENCY_STDDEV_RATIO`] of the mean gap, and a mean gap under
/// [`CONSISTENCY_MAX_MEAN_GAP_DAYS`].
pub fn consistent<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    slice
        .active
        .iter()
        .filter(|a| {
            a.session_count >= CONSISTENCY_MIN_SESSIONS
                && gap_stats(a.item, &slice.period).is_some_and(|(mean, stddev)| {
                    stddev < CONSISTENCY_STDDEV_RATIO * mean
                        && mean < CONSISTENCY_MAX_MEAN_GAP_DAYS
                })
        })
        .copied()
        .collect()
}

/// Items whose first-ever play log (across all history, not just the
/// window) falls on or after the window start.
pub fn discovery<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let start = slice.period.start_date();
    slice
        .active
        .iter()
        .filter(|a| first_play_date(a.item).is_some_and(|d| d >= start))
        .copied()
        .collect()
}

/// High effort despite a mediocre rating: rating in `(0, 7]` and at least
/// [`GRIND_MIN_HOURS`] in-window hours, ranked by hours descending.
pub fn grind<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let mut ranked: Vec<ItemActivity<'a>> = slice
        .active
        .iter()
        .filter(|a| {
            let rating = a.item.rating.value();
            rating > 0.0 && rating <= GRIND_MAX_RATING && a.total_hours >= GRIND_MIN_HOURS
        })
        .copied()
        .collect();
    ranked.sort_by(|a, b| desc(a.total_hours, b.total_hours));
    ranked
}

fn same_genre(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Whether any activity signal for the item (play log or declared start
/// date) predates the window start.
fn active_before(item: &Item, start: NaiveDate) -> bool {
    item.history.iter().any(|e| e.date < start)
        || item.started_at.is_some_and(|d| d < start)
}

/// Items opening a new genre: a non-empty genre that no other item in the
/// library touched strictly before the window start.
pub fn genre_pioneer<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let start = slice.period.start_date();
    slice
        .active
        .iter()
        .filter(|a| {
            a.item.genre().is_some_and(|genre| {
                !slice.items.iter().any(|other| {
                    other.id != a.item.id
                        && other.genre().is_some_and(|g| same_genre(g, genre))
                        && active_before(other, start)
                })
            })
        })
        .copied()
        .collect()
}

/// Sustained, loved engagement: rating at least [`SOULMATE_MIN_RATING`]
/// and at least [`SOULMATE_MIN_HOURS`] in-window hours, ranked by the
/// hours-times-rating product descending.
pub fn soulmate<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let mut ranked: Vec<ItemActivity<'a>> = slice
        .active
        .iter()
        .filter(|a| {
            a.item.rating.value() >= SOULMATE_MIN_RATING && a.total_hours >= SOULMATE_MIN_HOURS
        })
        .copied()
        .collect();
    ranked.sort_by(|a, b| {
        desc(
            a.total_hours * a.item.rating.value(),
            b.total_hours * b.item.rating.value(),
        )
    });
    ranked
}

/// Highly rated items ranked by in-window hours descending.
pub fn surprise<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let mut ranked: Vec<ItemActivity<'a>> = slice
        .active
        .iter()
        .filter(|a| a.item.rating.value() >= SURPRISE_MIN_RATING)
        .copied()
        .collect();
    ranked.sort_by(|a, b| desc(a.total_hours, b.total_hours));
    ranked
}

/// Raw in-window hours, descending. Same ranking as [`top_by_hours`] but a
/// distinct category in the year tier.
pub fn endurance<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    top_by_hours(slice)
}

/// Stalled or dropped items: abandoned outright, or in progress with
/// lifetime history but no in-window activity. Ranked by lifetime hours
/// descending. Scans the whole library, not just active items.
pub fn stalled<'a>(slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    let in_window = |item: &'a Item| {
        slice
            .active
            .iter()
            .find(|a| a.item.id == item.id)
            .copied()
            .unwrap_or(ItemActivity {
                item,
                total_hours: 0.0,
                session_count: 0,
            })
    };

    let mut ranked: Vec<ItemActivity<'a>> = slice
        .items
        .iter()
        .map(in_window)
        .filter(|a| {
            a.item.status == ItemStatus::Abandoned
                || (a.item.status == ItemStatus::InProgress
                    && a.session_count == 0
                    && !a.item.history.is_empty())
        })
        .collect();
    ranked.sort_by(|a, b| desc(lifetime_hours(a.item), lifetime_hours(b.item)));
    ranked
}
