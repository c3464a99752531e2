//! The `awards` command: build nominations and render them.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use ga_core::{AwardsReport, SelectionMode, Tier, TierAwards, build_awards};
use serde::Serialize;
use tracing::warn;

use crate::commands::selected_tiers;
use crate::config::Config;
use crate::library;

/// Options for the awards command.
#[derive(Debug)]
pub struct AwardsOptions {
    /// Reference date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Library path override.
    pub library: Option<PathBuf>,
    /// Render a single tier instead of all four.
    pub tier: Option<Tier>,
    /// Emit JSON instead of the human-readable report.
    pub json: bool,
    /// Ask the model to pick winners for deferred categories.
    pub pick: bool,
}

/// A winner chosen for a deferred category.
#[derive(Debug, Serialize)]
pub struct CategoryPick {
    pub tier: Tier,
    pub category: String,
    pub winner: String,
    pub justification: String,
}

/// Runs the awards command.
pub fn run<W: Write>(writer: &mut W, options: &AwardsOptions, config: &Config) -> Result<()> {
    let library_path = options
        .library
        .clone()
        .unwrap_or_else(|| config.library_path.clone());
    let items = library::load_library(&library_path)?;
    let reference = options.date.unwrap_or_else(|| Local::now().date_naive());

    let report = build_awards(&items, reference);

    let picks = if options.pick {
        pick_winners(&report, options.tier, config)?
    } else {
        Vec::new()
    };

    if options.json {
        write_json(writer, &report, options.tier, &picks)?;
    } else {
        write_report(writer, &report, options.tier, &picks)?;
    }
    Ok(())
}

/// Asks the model to pick a winner for each deferred category in the
/// selected tiers. Individual failures are logged and skipped so one bad
/// call cannot sink the whole report.
fn pick_winners(
    report: &AwardsReport,
    filter: Option<Tier>,
    config: &Config,
) -> Result<Vec<CategoryPick>> {
    let Some(api_key) = config.api_key.as_deref() else {
        bail!("--pick requires an API key (set GA_API_KEY or api_key in the config file)");
    };
    let client = ga_llm::Client::new(api_key)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let mut picks = Vec::new();
    for tier in selected_tiers(filter) {
        let awards = report.tier(tier);
        for category in &awards.categories {
            if category.selection != SelectionMode::Deferred || category.nominees.is_empty() {
                continue;
            }
            match runtime.block_on(client.pick_winner(&config.model, category, tier.noun())) {
                Ok(pick) => picks.push(CategoryPick {
                    tier,
                    category: category.id.clone(),
                    winner: pick.winner,
                    justification: pick.justification,
                }),
                Err(err) => {
                    warn!(category = %category.id, error = %err, "winner pick failed");
                }
            }
        }
    }
    Ok(picks)
}

fn write_json<W: Write>(
    writer: &mut W,
    report: &AwardsReport,
    filter: Option<Tier>,
    picks: &[CategoryPick],
) -> Result<()> {
    let mut value = match filter {
        Some(tier) => serde_json::to_value(report.tier(tier))?,
        None => serde_json::to_value(report)?,
    };
    if !picks.is_empty() {
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("picks".to_string(), serde_json::to_value(picks)?);
        }
    }
    writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

fn write_report<W: Write>(
    writer: &mut W,
    report: &AwardsReport,
    filter: Option<Tier>,
    picks: &[CategoryPick],
) -> Result<()> {
    for tier in selected_tiers(filter) {
        write_tier(writer, report.tier(tier), picks)?;
    }
    Ok(())
}

fn write_tier<W: Write>(writer: &mut W, awards: &TierAwards, picks: &[CategoryPick]) -> Result<()> {
    let heading = format!(
        "{} AWARDS: {} to {}",
        awards.tier.title().to_uppercase(),
        awards.period.start_date().format("%b %-d, %Y"),
        awards.period.end_date().format("%b %-d, %Y"),
    );
    writeln!(writer, "{heading}")?;
    writeln!(writer, "{}", "─".repeat(heading.chars().count()))?;
    writeln!(writer)?;

    for category in &awards.categories {
        writeln!(writer, "{} {}", category.icon, category.label)?;
        writeln!(writer, "   {}", category.description)?;
        if category.nominees.is_empty() {
            writeln!(writer, "   (no activity this {})", awards.tier.noun())?;
        }
        for (index, nominee) in category.nominees.iter().enumerate() {
            let star = if nominee.highlight { "★ " } else { "" };
            writeln!(
                writer,
                "   {}. {}{} ({})",
                index + 1,
                star,
                nominee.name,
                nominee.reason
            )?;
        }
        if let Some(pick) = picks
            .iter()
            .find(|p| p.tier == awards.tier && p.category == category.id)
        {
            writeln!(writer, "   Winner: {} ({})", pick.winner, pick.justification)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga_core::{HistoryEntry, Item, ItemId, ItemStatus, Rating};

    fn item(id: &str, name: &str, sessions: &[(u32, u32, f64)]) -> Item {
        let mut item = Item::new(ItemId::new(id).unwrap(), name).unwrap();
        item.status = ItemStatus::InProgress;
        item.rating = Rating::clamped(8.0);
        item.price = 20.0;
        item.history = sessions
            .iter()
            .map(|&(month, day, hours)| {
                HistoryEntry::new(NaiveDate::from_ymd_opt(2024, month, day).unwrap(), hours)
                    .unwrap()
            })
            .collect();
        item
    }

    fn sample_report() -> AwardsReport {
        let items = vec![
            item("g1", "Balatro", &[(3, 10, 4.0), (3, 12, 5.0), (3, 14, 6.0)]),
            item("g2", "Celeste", &[(3, 11, 1.5), (2, 20, 2.0)]),
        ];
        build_awards(&items, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn write_tier_renders_heading_and_nominees() {
        let report = sample_report();
        let mut out = Vec::new();
        write_tier(&mut out, &report.week, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("WEEK AWARDS: Mar 9, 2024 to Mar 15, 2024"));
        assert!(text.contains("🏆 Game of the Week"));
        assert!(text.contains("1. Balatro"));
        assert!(text.contains("Celeste"));
    }

    #[test]
    fn write_tier_marks_prior_winners() {
        let report = sample_report();
        let mut out = Vec::new();
        write_tier(&mut out, &report.month, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Balatro dominates the week, so it resurfaces starred in March.
        assert!(text.contains("★ Balatro"));
    }

    #[test]
    fn write_tier_includes_picked_winners() {
        let report = sample_report();
        let picks = vec![CategoryPick {
            tier: Tier::Week,
            category: "game-of-the-week".to_string(),
            winner: "Balatro".to_string(),
            justification: "Dominated the week.".to_string(),
        }];
        let mut out = Vec::new();
        write_tier(&mut out, &report.week, &picks).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Winner: Balatro (Dominated the week.)"));
    }

    #[test]
    fn write_json_emits_the_full_report() {
        let report = sample_report();
        let mut out = Vec::new();
        write_json(&mut out, &report, None, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["reference_date"], "2024-03-15");
        assert_eq!(value["week"]["categories"].as_array().unwrap().len(), 3);
        assert_eq!(value["year"]["categories"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn write_json_with_tier_filter_emits_one_tier() {
        let report = sample_report();
        let mut out = Vec::new();
        write_json(&mut out, &report, Some(Tier::Quarter), &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["tier"], "quarter");
        assert_eq!(value["categories"].as_array().unwrap().len(), 8);
        assert!(value.get("week").is_none());
    }

    #[test]
    fn write_json_appends_picks_when_present() {
        let report = sample_report();
        let picks = vec![CategoryPick {
            tier: Tier::Week,
            category: "game-of-the-week".to_string(),
            winner: "Balatro".to_string(),
            justification: "Dominated the week.".to_string(),
        }];
        let mut out = Vec::new();
        write_json(&mut out, &report, None, &picks).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["picks"][0]["tier"], "week");
        assert_eq!(value["picks"][0]["winner"], "Balatro");
    }
}
