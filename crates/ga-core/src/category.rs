//! Award categories and the nominee builder.
//!
//! The category catalog is a closed, hand-authored list: every category is
//! a [`CategoryKind`] variant, so adding one forces every match in the
//! builder to be revisited at compile time. Categories whose final choice
//! is deferred to an external capability are marked
//! [`SelectionMode::Deferred`] and still receive a fully computed pool.

use serde::Serialize;

use crate::aggregate::{ItemActivity, PeriodSlice, best_single_session, lifetime_hours};
use crate::classify;
use crate::model::{Item, ItemId};
use crate::tier::Tier;

/// How a category's single winner is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// The first nominee is the winner.
    Ranked,
    /// An external generative capability picks from the pool; until it
    /// does, the category stands with its full nominee list.
    Deferred,
}

/// The closed set of award category kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKind {
    /// "Game of the {tier}", the deferred headline category.
    Showcase,
    BestSession,
    Comeback,
    BestValue,
    Grower,
    Consistent,
    Discovery,
    Grind,
    GenrePioneer,
    Soulmate,
    Surprise,
    Endurance,
    Stalled,
}

impl CategoryKind {
    /// Selection mode; only the headline category is deferred.
    #[must_use]
    pub const fn selection(self) -> SelectionMode {
        match self {
            Self::Showcase => SelectionMode::Deferred,
            _ => SelectionMode::Ranked,
        }
    }

    /// Icon token for the presentation layer.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Showcase => "🏆",
            Self::BestSession => "⏳",
            Self::Comeback => "🔄",
            Self::BestValue => "💰",
            Self::Grower => "📈",
            Self::Consistent => "📅",
            Self::Discovery => "🔭",
            Self::Grind => "⛏️",
            Self::GenrePioneer => "🧭",
            Self::Soulmate => "❤️",
            Self::Surprise => "🎁",
            Self::Endurance => "🏔️",
            Self::Stalled => "🎣",
        }
    }

    /// Stable category identifier.
    #[must_use]
    pub fn id(self, tier: Tier) -> String {
        match self {
            Self::Showcase => format!("game-of-the-{}", tier.noun()),
            Self::BestSession => "best-session".to_string(),
            Self::Comeback => "comeback".to_string(),
            Self::BestValue => "best-value".to_string(),
            Self::Grower => "grower".to_string(),
            Self::Consistent => "consistent".to_string(),
            Self::Discovery => "discovery".to_string(),
            Self::Grind => "grind".to_string(),
            Self::GenrePioneer => "genre-pioneer".to_string(),
            Self::Soulmate => "soulmate".to_string(),
            Self::Surprise => "surprise".to_string(),
            Self::Endurance => "endurance".to_string(),
            Self::Stalled => "one-that-got-away".to_string(),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self, tier: Tier) -> String {
        match self {
            Self::Showcase => format!("Game of the {}", tier.title()),
            Self::BestSession => "Marathon Session".to_string(),
            Self::Comeback => "The Comeback".to_string(),
            Self::BestValue => match tier {
                Tier::Week | Tier::Month => "Best Value".to_string(),
                Tier::Quarter | Tier::Year => "Best Investment".to_string(),
            },
            Self::Grower => "Rising Star".to_string(),
            Self::Consistent => "Steady Hands".to_string(),
            Self::Discovery => "Best Discovery".to_string(),
            Self::Grind => "The Grind".to_string(),
            Self::GenrePioneer => "Genre Pioneer".to_string(),
            Self::Soulmate => "Soulmate".to_string(),
            Self::Surprise => "The Surprise".to_string(),
            Self::Endurance => "Longest Haul".to_string(),
            Self::Stalled => "The One That Got Away".to_string(),
        }
    }

    /// One-line description for the presentation layer.
    #[must_use]
    pub fn description(self, tier: Tier) -> String {
        let noun = tier.noun();
        match self {
            Self::Showcase => format!("The standout game of the {noun}"),
            Self::BestSession => "The longest single sitting".to_string(),
            Self::Comeback => "Picked back up after a long break".to_string(),
            Self::BestValue => "The most hours per dollar, lifetime".to_string(),
            Self::Grower => "Sessions that kept getting longer".to_string(),
            Self::Consistent => "Played on a steady cadence".to_string(),
            Self::Discovery => format!("New to the library this {noun}"),
            Self::Grind => "High effort despite a mediocre rating".to_string(),
            Self::GenrePioneer => "First steps into an untouched genre".to_string(),
            Self::Soulmate => "Loved and played in equal measure".to_string(),
            Self::Surprise => "Highly rated against the odds".to_string(),
            Self::Endurance => "The most hours, pure and simple".to_string(),
            Self::Stalled => format!("Real hours sunk, but none this {noun}"),
        }
    }
}

/// One nominated item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nominee {
    pub item_id: ItemId,
    pub name: String,
    /// Why it was nominated; always includes a concrete number.
    pub reason: String,
    /// Set when the item already won in the tier below.
    pub highlight: bool,
}

/// The minimal winner projection passed upward between tiers.
///
/// Carries item identity when available; highlight matching falls back to
/// display-name equality only when it is not, so duplicate-named items are
/// not conflated across tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerRecord {
    pub item_id: Option<ItemId>,
    pub name: String,
    pub label: String,
    pub icon: String,
}

/// A fully built award category for one tier.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDefinition {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub description: String,
    pub kind: CategoryKind,
    pub selection: SelectionMode,
    /// Ranking order is significant: the first nominee is the presumptive
    /// winner (for ranked categories).
    pub nominees: Vec<Nominee>,
}

/// Truncates a ranked classifier result to the tier's nominee limit,
/// substituting the top items by raw in-window hours when the primary
/// result is empty.
///
/// Shared by every category so the fallback rule cannot drift per tier.
pub fn rank_with_fallback<'a>(
    primary: Vec<ItemActivity<'a>>,
    slice: &PeriodSlice<'a>,
    limit: usize,
) -> Vec<ItemActivity<'a>> {
    let mut pool = if primary.is_empty() {
        classify::top_by_hours(slice)
    } else {
        primary
    };
    pool.truncate(limit);
    pool
}

/// Builds one category: classifier dispatch, fallback, reason lines, and
/// highlight flags from the incoming winner list.
pub fn build_category<'a>(
    kind: CategoryKind,
    tier: Tier,
    slice: &PeriodSlice<'a>,
    winners: &[WinnerRecord],
) -> CategoryDefinition {
    let primary = nominee_pool(kind, slice);
    let fell_back = primary.is_empty();
    let pool = rank_with_fallback(primary, slice, tier.nominee_limit());

    let nominees = pool
        .iter()
        .map(|activity| Nominee {
            item_id: activity.item.id.clone(),
            name: activity.item.name.clone(),
            reason: if fell_back {
                hours_reason(activity, tier)
            } else {
                reason_for(kind, tier, activity, slice)
            },
            highlight: is_prior_winner(activity.item, winners),
        })
        .collect();

    CategoryDefinition {
        id: kind.id(tier),
        label: kind.label(tier),
        icon: kind.icon().to_string(),
        description: kind.description(tier),
        kind,
        selection: kind.selection(),
        nominees,
    }
}

/// The primary classifier result for a category kind.
fn nominee_pool<'a>(kind: CategoryKind, slice: &PeriodSlice<'a>) -> Vec<ItemActivity<'a>> {
    match kind {
        // Deferred categories get the plain hours ranking as their pool
        CategoryKind::Showcase => classify::top_by_hours(slice),
        CategoryKind::BestSession => classify::best_session(slice),
        CategoryKind::Comeback => classify::comeback(slice),
        CategoryKind::BestValue => classify::best_value(slice),
        CategoryKind::Grower => classify::grower(slice),
        CategoryKind::Consistent => classify::consistent(slice),
        CategoryKind::Discovery => classify::discovery(slice),
        CategoryKind::Grind => classify::grind(slice),
        CategoryKind::GenrePioneer => classify::genre_pioneer(slice),
        CategoryKind::Soulmate => classify::soulmate(slice),
        CategoryKind::Surprise => classify::surprise(slice),
        CategoryKind::Endurance => classify::endurance(slice),
        CategoryKind::Stalled => classify::stalled(slice),
    }
}

fn is_prior_winner(item: &Item, winners: &[WinnerRecord]) -> bool {
    winners.iter().any(|w| match &w.item_id {
        Some(id) => *id == item.id,
        None => w.name == item.name,
    })
}

fn session_count(n: usize) -> String {
    if n == 1 {
        "1 session".to_string()
    } else {
        format!("{n} sessions")
    }
}

/// The generic reason line, also used whenever the fallback engaged.
fn hours_reason(activity: &ItemActivity<'_>, tier: Tier) -> String {
    format!(
        "{:.1}h this {} · {}",
        activity.total_hours,
        tier.noun(),
        session_count(activity.session_count)
    )
}

fn reason_for(
    kind: CategoryKind,
    tier: Tier,
    activity: &ItemActivity<'_>,
    slice: &PeriodSlice<'_>,
) -> String {
    let item = activity.item;
    let noun = tier.noun();
    match kind {
        CategoryKind::Showcase | CategoryKind::Endurance => hours_reason(activity, tier),
        CategoryKind::BestSession => {
            format!(
                "Longest session: {:.1}h",
                best_single_session(item, &slice.period)
            )
        }
        CategoryKind::Comeback => {
            format!(
                "Came back after a {}-day break",
                classify::longest_gap_days(item, &slice.period)
            )
        }
        CategoryKind::BestValue => {
            let hours = lifetime_hours(item);
            let cph = classify::cost_per_hour(item).unwrap_or(0.0);
            format!("${:.2} for {hours:.1}h lifetime · ${cph:.2} per hour", item.price)
        }
        CategoryKind::Grower => {
            let (first, second) =
                classify::half_averages(item, &slice.period).unwrap_or((0.0, 0.0));
            format!("Average session grew from {first:.1}h to {second:.1}h")
        }
        CategoryKind::Consistent => {
            let (mean, _) = classify::gap_stats(item, &slice.period).unwrap_or((0.0, 0.0));
            format!("A session every {mean:.1} days on average")
        }
        CategoryKind::Discovery => {
            let since = crate::aggregate::first_play_date(item)
                .map_or_else(String::new, |d| d.format("%b %-d").to_string());
            format!("First played {since} · {:.1}h this {noun}", activity.total_hours)
        }
        CategoryKind::Grind => {
            format!("{:.1}h at a {}/10 rating", activity.total_hours, item.rating)
        }
        CategoryKind::GenrePioneer => {
            let genre = item.genre().unwrap_or("a new genre");
            format!("First steps in {genre} · {:.1}h this {noun}", activity.total_hours)
        }
        CategoryKind::Soulmate => {
            format!("{:.1}h at {}/10", activity.total_hours, item.rating)
        }
        CategoryKind::Surprise => {
            format!("Rated {}/10 · {:.1}h this {noun}", item.rating, activity.total_hours)
        }
        CategoryKind::Stalled => {
            let lifetime = lifetime_hours(item);
            if activity.session_count == 0 {
                format!("{lifetime:.1}h lifetime, untouched this {noun}")
            } else {
                format!("{lifetime:.1}h lifetime, {:.1}h this {noun}", activity.total_hours)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryEntry, Rating};
    use crate::period::Period;
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(id: &str, name: &str, logs: &[(NaiveDate, f64)]) -> Item {
        let mut item = Item::new(ItemId::new(id).unwrap(), name).unwrap();
        item.history = logs
            .iter()
            .map(|&(date, hours)| HistoryEntry { date, hours })
            .collect();
        item
    }

    fn january(items: &[Item]) -> PeriodSlice<'_> {
        PeriodSlice::new(items, Period::month(2024, 1).unwrap())
    }

    #[test]
    fn fallback_fills_empty_classifier_results() {
        // No item qualifies for Comeback, but there is in-window activity,
        // so the nominee list must not be empty.
        let items = vec![item("g1", "Celeste", &[(date(2024, 1, 5), 3.0)])];
        let slice = january(&items);

        let cat = build_category(CategoryKind::Comeback, Tier::Month, &slice, &[]);
        assert_eq!(cat.nominees.len(), 1);
        assert_eq!(cat.nominees[0].name, "Celeste");
        // Fallback nominees get the generic hours reason
        assert_eq!(cat.nominees[0].reason, "3.0h this month · 1 session");
    }

    #[test]
    fn empty_library_yields_empty_nominees_not_errors() {
        let items: Vec<Item> = Vec::new();
        let slice = january(&items);
        let cat = build_category(CategoryKind::Showcase, Tier::Month, &slice, &[]);
        assert!(cat.nominees.is_empty());
    }

    #[test]
    fn nominee_list_respects_tier_limit() {
        let items: Vec<Item> = (0..10)
            .map(|i| {
                item(
                    &format!("g{i}"),
                    &format!("Game {i}"),
                    &[(date(2024, 1, 5), f64::from(i))],
                )
            })
            .collect();
        let slice = january(&items);

        let cat = build_category(CategoryKind::Showcase, Tier::Month, &slice, &[]);
        assert_eq!(cat.nominees.len(), Tier::Month.nominee_limit());

        let slice = PeriodSlice::new(&items, Period::year(2024));
        let cat = build_category(CategoryKind::Showcase, Tier::Year, &slice, &[]);
        assert_eq!(cat.nominees.len(), Tier::Year.nominee_limit());
    }

    #[test]
    fn highlight_matches_by_item_id() {
        let items = vec![
            item("g1", "Celeste", &[(date(2024, 1, 5), 3.0)]),
            item("g2", "Celeste", &[(date(2024, 1, 6), 2.0)]),
        ];
        let slice = january(&items);
        let winners = vec![WinnerRecord {
            item_id: Some(ItemId::new("g2").unwrap()),
            name: "Celeste".to_string(),
            label: "Game of the Week".to_string(),
            icon: "🏆".to_string(),
        }];

        let cat = build_category(CategoryKind::Showcase, Tier::Month, &slice, &winners);
        // Identity keyed: only the duplicate-named item with the matching
        // id gets the highlight.
        let by_id: Vec<_> = cat
            .nominees
            .iter()
            .map(|n| (n.item_id.as_str(), n.highlight))
            .collect();
        assert_eq!(by_id, vec![("g1", false), ("g2", true)]);
    }

    #[test]
    fn highlight_falls_back_to_name_when_identity_missing() {
        let items = vec![item("g1", "Celeste", &[(date(2024, 1, 5), 3.0)])];
        let slice = january(&items);
        let winners = vec![WinnerRecord {
            item_id: None,
            name: "Celeste".to_string(),
            label: "Game of the Week".to_string(),
            icon: "🏆".to_string(),
        }];

        let cat = build_category(CategoryKind::Showcase, Tier::Month, &slice, &winners);
        assert!(cat.nominees[0].highlight);
    }

    #[test]
    fn no_highlight_without_matching_winner() {
        let items = vec![item("g1", "Celeste", &[(date(2024, 1, 5), 3.0)])];
        let slice = january(&items);
        let winners = vec![WinnerRecord {
            item_id: Some(ItemId::new("other").unwrap()),
            name: "Hades".to_string(),
            label: "Game of the Week".to_string(),
            icon: "🏆".to_string(),
        }];

        let cat = build_category(CategoryKind::Showcase, Tier::Month, &slice, &winners);
        assert!(!cat.nominees[0].highlight);
    }

    #[test]
    fn deferred_category_still_gets_a_full_pool() {
        let items = vec![
            item("g1", "A", &[(date(2024, 1, 5), 1.0)]),
            item("g2", "B", &[(date(2024, 1, 5), 9.0)]),
        ];
        let slice = january(&items);
        let cat = build_category(CategoryKind::Showcase, Tier::Month, &slice, &[]);
        assert_eq!(cat.selection, SelectionMode::Deferred);
        assert_eq!(cat.nominees.len(), 2);
        assert_eq!(cat.nominees[0].name, "B");
    }

    #[test]
    fn reason_lines_always_carry_a_number() {
        let mut it = item(
            "g1",
            "Celeste",
            &[
                (date(2024, 1, 2), 1.0),
                (date(2024, 1, 5), 2.0),
                (date(2024, 1, 14), 5.0),
            ],
        );
        it.price = 20.0;
        it.rating = Rating::clamped(6.0);
        let items = vec![it];
        let slice = january(&items);

        for kind in [
            CategoryKind::Showcase,
            CategoryKind::BestSession,
            CategoryKind::Comeback,
            CategoryKind::BestValue,
            CategoryKind::Discovery,
            CategoryKind::Grind,
        ] {
            let cat = build_category(kind, Tier::Month, &slice, &[]);
            let reason = &cat.nominees[0].reason;
            assert!(
                reason.chars().any(|c| c.is_ascii_digit()),
                "reason for {kind:?} has no number: {reason}"
            );
        }
    }

    #[test]
    fn best_value_reason_shows_cost_per_hour() {
        let mut it = item("g1", "Celeste", &[(date(2024, 1, 5), 10.0)]);
        it.price = 20.0;
        let items = vec![it];
        let slice = january(&items);

        let cat = build_category(CategoryKind::BestValue, Tier::Month, &slice, &[]);
        assert_snapshot!(
            cat.nominees[0].reason,
            @"$20.00 for 10.0h lifetime · $2.00 per hour"
        );
    }

    #[test]
    fn comeback_reason_reports_the_gap() {
        let items = vec![item(
            "g1",
            "Celeste",
            &[(date(2024, 1, 2), 1.0), (date(2024, 1, 12), 2.0)],
        )];
        let slice = january(&items);

        let cat = build_category(CategoryKind::Comeback, Tier::Month, &slice, &[]);
        assert_snapshot!(cat.nominees[0].reason, @"Came back after a 10-day break");
    }

    #[test]
    fn showcase_reason_uses_hours_template() {
        let items = vec![item(
            "g1",
            "Celeste",
            &[(date(2024, 1, 5), 3.0), (date(2024, 1, 20), 1.5)],
        )];
        let slice = january(&items);

        let cat = build_category(CategoryKind::Showcase, Tier::Month, &slice, &[]);
        assert_snapshot!(cat.nominees[0].reason, @"4.5h this month · 2 sessions");
    }

    #[test]
    fn category_metadata_is_tier_aware() {
        assert_eq!(
            CategoryKind::Showcase.label(Tier::Year),
            "Game of the Year"
        );
        assert_eq!(CategoryKind::Showcase.id(Tier::Week), "game-of-the-week");
        assert_eq!(CategoryKind::BestValue.label(Tier::Month), "Best Value");
        assert_eq!(
            CategoryKind::BestValue.label(Tier::Year),
            "Best Investment"
        );
        assert_eq!(CategoryKind::Stalled.id(Tier::Year), "one-that-got-away");
    }

    #[test]
    fn kind_serializes_as_kebab_case() {
        let json = serde_json::to_string(&CategoryKind::GenrePioneer).unwrap();
        assert_eq!(json, "\"genre-pioneer\"");
        let json = serde_json::to_string(&SelectionMode::Deferred).unwrap();
        assert_eq!(json, "\"deferred\"");
    }
}
