//! Core domain types with validation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The rating value was out of range.
    #[error("rating must be between 0.0 and 10.0, got {value}")]
    RatingOutOfRange { value: f64 },

    /// A numeric field that must be non-negative was negative.
    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// Invalid item status value.
    #[error("invalid item status: {value}")]
    InvalidStatus { value: String },
}

/// A validated item identifier.
///
/// Item IDs must be non-empty strings. They are assigned by whatever layer
/// loads the library (storage, sync, or the CLI) and are treated as opaque
/// here; the engine only compares them for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "item ID" });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A user rating on the 0–10 scale. 0 means unrated.
///
/// Values are clamped during deserialization to be lenient with external
/// data; `new` rejects out-of-range and NaN values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    /// The maximum rating (10.0).
    pub const MAX: Self = Self(10.0);

    /// The unrated sentinel (0.0).
    pub const UNRATED: Self = Self(0.0);

    /// Creates a new rating after validation.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_nan() || !(0.0..=10.0).contains(&value) {
            return Err(ValidationError::RatingOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Creates a rating, clamping to \[0.0, 10.0\]. NaN becomes 0.0.
    #[must_use]
    pub const fn clamped(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            Self(0.0)
        } else if value > 10.0 {
            Self(10.0)
        } else {
            Self(value)
        }
    }

    /// Returns the inner f64 value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether the user has rated the item at all.
    #[must_use]
    pub fn is_rated(self) -> bool {
        self.0 > 0.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::UNRATED
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "8/10" for whole ratings, "8.5/10" otherwise
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}

impl TryFrom<f64> for Rating {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(r: Rating) -> Self {
        r.0
    }
}

impl Serialize for Rating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        // Clamp on deserialization to be lenient with external data
        Ok(Self::clamped(value))
    }
}

/// Lifecycle status of a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// On the wishlist, not owned yet.
    Wishlist,
    /// Owned but never started.
    #[default]
    NotStarted,
    /// Actively being played.
    InProgress,
    /// Finished.
    Completed,
    /// Dropped without finishing.
    Abandoned,
}

impl ItemStatus {
    /// String representation for storage and display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wishlist => "wishlist",
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wishlist" => Ok(Self::Wishlist),
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(ValidationError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// A single dated play log.
///
/// Day granularity only; multiple entries per day are permitted and are not
/// deduplicated. Owned exclusively by its [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Calendar date of the session.
    pub date: NaiveDate,
    /// Hours played. Always non-negative.
    pub hours: f64,
}

impl HistoryEntry {
    /// Creates an entry after validating that hours are non-negative.
    pub fn new(date: NaiveDate, hours: f64) -> Result<Self, ValidationError> {
        if hours.is_nan() || hours < 0.0 {
            return Err(ValidationError::Negative {
                field: "hours",
                value: hours,
            });
        }
        Ok(Self { date, hours })
    }
}

/// A tracked game with its play history.
///
/// The engine never mutates items; it reads snapshots supplied by the
/// caller and computes award data from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity, opaque to the engine.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Genre, if the user assigned one.
    #[serde(default)]
    pub genre: Option<String>,
    /// Acquisition price. Non-negative; 0 means free.
    #[serde(default)]
    pub price: f64,
    /// User rating, 0 = unrated.
    #[serde(default)]
    pub rating: Rating,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ItemStatus,
    /// Declared start date, if any.
    #[serde(default)]
    pub started_at: Option<NaiveDate>,
    /// Declared finish date, if any.
    #[serde(default)]
    pub finished_at: Option<NaiveDate>,
    /// Play logs in insertion order.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Item {
    /// Creates an item with the given identity and name and empty history.
    pub fn new(id: ItemId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "item name" });
        }
        Ok(Self {
            id,
            name,
            genre: None,
            price: 0.0,
            rating: Rating::UNRATED,
            status: ItemStatus::NotStarted,
            started_at: None,
            finished_at: None,
            history: Vec::new(),
        })
    }

    /// The trimmed genre, if one is set and non-empty.
    pub fn genre(&self) -> Option<&str> {
        self.genre
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}
