//! Lenient loading of the game library from JSON.
//!
//! Library files come from exports and hand edits, so the loader repairs
//! what it can (missing IDs, out-of-range ratings, negative prices) and
//! skips what it cannot (nameless entries, unparseable dates), logging
//! each repair or skip at warn level.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ga_core::{HistoryEntry, Item, ItemId, ItemStatus, Rating};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RawLibrary {
    #[serde(default)]
    items: Vec<RawItem>,
}

/// Untrusted library entry. Every field is optional so one bad entry
/// cannot fail the whole file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItem {
    id: Option<String>,
    name: Option<String>,
    genre: Option<String>,
    price: Option<f64>,
    rating: Option<f64>,
    status: Option<String>,
    started_at: Option<String>,
    finished_at: Option<String>,
    history: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    date: Option<String>,
    hours: Option<f64>,
}

/// Loads and sanitizes a library file.
pub fn load_library(path: &Path) -> Result<Vec<Item>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read library file {}", path.display()))?;
    parse_library(&contents)
}

/// Parses library JSON, keeping every entry that can be repaired.
pub fn parse_library(json: &str) -> Result<Vec<Item>> {
    let raw: RawLibrary = serde_json::from_str(json).context("library file is not valid JSON")?;
    let total = raw.items.len();
    let items: Vec<Item> = raw.items.into_iter().filter_map(convert_item).collect();
    if items.len() < total {
        warn!(
            kept = items.len(),
            total, "skipped unusable library entries during load"
        );
    }
    Ok(items)
}

fn convert_item(raw: RawItem) -> Option<Item> {
    let Some(name) = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    else {
        warn!(
            id = raw.id.as_deref().unwrap_or("<none>"),
            "skipping entry without a name"
        );
        return None;
    };

    // Missing IDs get a fresh UUID; the engine only needs uniqueness.
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let id = ItemId::new(id).ok()?;

    let price = match raw.price {
        None => 0.0,
        Some(p) if p.is_finite() && p >= 0.0 => p,
        Some(p) => {
            warn!(name, price = p, "clamping invalid price to 0");
            0.0
        }
    };

    let status = match raw.status.as_deref() {
        None => ItemStatus::default(),
        Some(s) => s.parse().unwrap_or_else(|_| {
            warn!(name, status = s, "unknown status, treating as not_started");
            ItemStatus::default()
        }),
    };

    let mut history = Vec::with_capacity(raw.history.len());
    for entry in &raw.history {
        match convert_entry(entry) {
            Some(converted) => history.push(converted),
            None => warn!(name, ?entry, "skipping malformed play log"),
        }
    }

    Some(Item {
        id,
        name: name.to_string(),
        genre: raw.genre,
        price,
        rating: Rating::clamped(raw.rating.unwrap_or(0.0)),
        status,
        started_at: parse_date(raw.started_at.as_deref(), name, "started_at"),
        finished_at: parse_date(raw.finished_at.as_deref(), name, "finished_at"),
        history,
    })
}

fn convert_entry(raw: &RawEntry) -> Option<HistoryEntry> {
    let date: NaiveDate = raw.date.as_deref()?.parse().ok()?;
    HistoryEntry::new(date, raw.hours.unwrap_or(0.0)).ok()
}

fn parse_date(value: Option<&str>, name: &str, field: &str) -> Option<NaiveDate> {
    let raw = value?;
    match raw.parse() {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(name, field, value = raw, "ignoring unparseable date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_entry() {
        let json = r#"{
            "items": [{
                "id": "game-1",
                "name": "Hades",
                "genre": "Roguelike",
                "price": 24.99,
                "rating": 9.0,
                "status": "completed",
                "started_at": "2024-01-02",
                "finished_at": "2024-02-10",
                "history": [
                    {"date": "2024-01-02", "hours": 2.5},
                    {"date": "2024-01-03", "hours": 1.0}
                ]
            }]
        }"#;
        let items = parse_library(json).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id.as_str(), "game-1");
        assert_eq!(item.name, "Hades");
        assert_eq!(item.status, ItemStatus::Completed);
        assert_eq!(item.history.len(), 2);
        assert_eq!(
            item.started_at,
            Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
    }

    #[test]
    fn skips_entries_without_a_name() {
        let json = r#"{"items": [{"id": "game-1"}, {"name": "Celeste"}]}"#;
        let items = parse_library(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Celeste");
    }

    #[test]
    fn backfills_missing_ids() {
        let json = r#"{"items": [{"name": "Celeste"}, {"id": "", "name": "Hades"}]}"#;
        let items = parse_library(json).unwrap();
        assert_eq!(items.len(), 2);
        assert!(!items[0].id.as_str().is_empty());
        assert!(!items[1].id.as_str().is_empty());
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn skips_malformed_play_logs_but_keeps_the_item() {
        let json = r#"{
            "items": [{
                "name": "Celeste",
                "history": [
                    {"date": "not-a-date", "hours": 2.0},
                    {"date": "2024-03-05", "hours": -1.0},
                    {"date": "2024-03-06", "hours": 1.5}
                ]
            }]
        }"#;
        let items = parse_library(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].history.len(), 1);
        assert_eq!(
            items[0].history[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact equality intended after clamping")]
    fn repairs_out_of_range_numbers() {
        let json = r#"{"items": [{"name": "Celeste", "price": -5.0, "rating": 12.0}]}"#;
        let items = parse_library(json).unwrap();
        assert_eq!(items[0].price, 0.0);
        assert_eq!(items[0].rating.value(), 10.0);
    }

    #[test]
    fn unknown_status_defaults_to_not_started() {
        let json = r#"{"items": [{"name": "Celeste", "status": "playing"}]}"#;
        let items = parse_library(json).unwrap();
        assert_eq!(items[0].status, ItemStatus::NotStarted);
    }

    #[test]
    fn unparseable_declared_dates_become_none() {
        let json = r#"{"items": [{"name": "Celeste", "started_at": "March 5th"}]}"#;
        let items = parse_library(json).unwrap();
        assert_eq!(items[0].started_at, None);
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_library("not json").is_err());
    }
}
