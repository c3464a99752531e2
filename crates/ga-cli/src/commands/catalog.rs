//! The `catalog` command: list the fixed award category catalog.

use std::io::Write;

use anyhow::Result;
use ga_core::Tier;

use crate::commands::selected_tiers;

/// Prints the category catalog, one block per tier.
pub fn run<W: Write>(writer: &mut W, tier: Option<Tier>) -> Result<()> {
    for tier in selected_tiers(tier) {
        let kinds = tier.category_kinds();
        writeln!(
            writer,
            "{} ({} categories, up to {} nominees each)",
            tier.title(),
            kinds.len(),
            tier.nominee_limit()
        )?;
        for &kind in kinds {
            writeln!(
                writer,
                "  {} {:<20} {}",
                kind.icon(),
                kind.label(tier),
                kind.description(tier)
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(tier: Option<Tier>) -> String {
        let mut out = Vec::new();
        run(&mut out, tier).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn lists_all_four_tiers_by_default() {
        let text = render(None);
        assert!(text.contains("Week (3 categories, up to 4 nominees each)"));
        assert!(text.contains("Month (7 categories, up to 4 nominees each)"));
        assert!(text.contains("Quarter (8 categories, up to 5 nominees each)"));
        assert!(text.contains("Year (9 categories, up to 6 nominees each)"));
    }

    #[test]
    fn year_tier_has_its_exclusive_categories() {
        let text = render(Some(Tier::Year));
        assert!(text.contains("Genre Pioneer"));
        assert!(text.contains("Soulmate"));
        // Rising Star is a month/quarter category only.
        assert!(!text.contains("Rising Star"));
    }

    #[test]
    fn best_value_is_relabeled_at_higher_tiers() {
        assert!(render(Some(Tier::Month)).contains("Best Value"));
        assert!(render(Some(Tier::Year)).contains("Best Investment"));
    }
}
