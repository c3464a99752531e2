//! Core engine for play-history award nominations.
//!
//! This crate contains the fundamental types and logic for:
//! - Period windows: calendar boundaries for week/month/quarter/year tiers
//! - Aggregation: in-window per-item totals from dated play logs
//! - Classifiers: the heuristics that nominate items for award categories
//! - Category building and tier orchestration with winner propagation
//!
//! The engine is a pure, synchronous computation: given an immutable item
//! snapshot and a reference date, every build function returns a
//! deterministic result with no I/O and no shared mutable state.

pub mod aggregate;
pub mod category;
pub mod classify;
pub mod model;
pub mod period;
pub mod tier;

pub use aggregate::{ItemActivity, PeriodSlice, aggregate};
pub use category::{CategoryDefinition, CategoryKind, Nominee, SelectionMode, WinnerRecord};
pub use model::{HistoryEntry, Item, ItemId, ItemStatus, Rating, ValidationError};
pub use period::{Granularity, Period, PeriodError, window_for};
pub use tier::{
    AwardsReport, Tier, TierAwards, build_awards, build_month_categories,
    build_quarter_categories, build_week_categories, build_year_categories, winners_of,
};
