//! Post-assembly validation
//!
//! Checks the assembled outfit against invariants the earlier stages
//! could not guarantee alone: required slot coverage, item-count bounds,
//! per-category caps, and conflicting formality mixes. Failures send the
//! degradation controller to the next looser tier; cold-weather layering
//! problems are a non-fatal warning, not a failure.

use ensemble_common::{Category, EngineLimits, OutfitWarning, WeatherSnapshot};

use crate::normalize::NormalizedItem;
use crate::occasion::OccasionProfile;
use crate::pipeline::assemble::AssembledPick;

/// Materials warm enough to count as a heavy layer
const WARM_MATERIALS: &[&str] = &["wool", "fleece", "down", "shearling", "cashmere"];

/// Formality spread at which an outfit reads as two different outfits
const CONFLICTING_FORMALITY_GAP: u8 = 3;

/// Outcome of validating one assembled outfit
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Invariant violations; any entry fails the tier attempt
    pub failures: Vec<String>,
    /// Non-fatal issues attached to the final outfit
    pub warnings: Vec<OutfitWarning>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validate an assembled outfit
pub fn validate_outfit(
    picks: &[AssembledPick],
    items: &[NormalizedItem],
    profile: &OccasionProfile,
    limits: &EngineLimits,
    weather: &WeatherSnapshot,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for slot in profile.required_slots {
        if !picks.iter().any(|p| slot.accepts(p.category)) {
            report
                .failures
                .push(format!("required slot '{}' not covered", slot.primary));
        }
    }

    if picks.len() < limits.min_items {
        report.failures.push(format!(
            "outfit has {} item(s), minimum is {}",
            picks.len(),
            limits.min_items
        ));
    }
    if picks.len() > limits.max_items {
        report.failures.push(format!(
            "outfit has {} item(s), maximum is {}",
            picks.len(),
            limits.max_items
        ));
    }

    for category in Category::all() {
        let count = picks.iter().filter(|p| p.category == category).count();
        let cap = limits.category_cap(category);
        if count > cap {
            report.failures.push(format!(
                "{count} items of category '{category}' exceed the cap of {cap}"
            ));
        }
    }

    // A loungewear piece next to black tie is a failure no penalty caught
    for (i, a) in picks.iter().enumerate() {
        for b in picks.iter().skip(i + 1) {
            let gap = items[a.index].formality.gap(items[b.index].formality);
            if gap >= CONFLICTING_FORMALITY_GAP {
                report.failures.push(format!(
                    "conflicting formality mix: '{}' ({}) with '{}' ({})",
                    items[a.index].item.name,
                    items[a.index].formality,
                    items[b.index].item.name,
                    items[b.index].formality
                ));
            }
        }
    }

    if weather.temperature_f < limits.cold_threshold_f && !has_warm_layer(picks, items) {
        report.warnings.push(OutfitWarning::InsufficientLayers);
    }

    report
}

fn has_warm_layer(picks: &[AssembledPick], items: &[NormalizedItem]) -> bool {
    picks.iter().any(|p| {
        p.category == Category::Outerwear
            || items[p.index]
                .tags
                .materials
                .iter()
                .any(|m| WARM_MATERIALS.contains(&m.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_item;
    use crate::occasion::profile_for;
    use ensemble_common::WardrobeItem;

    fn norm(name: &str, category: Category) -> NormalizedItem {
        normalize_item(&WardrobeItem::new(name, category)).0
    }

    fn pick(index: usize, category: Category) -> AssembledPick {
        AssembledPick {
            index,
            category,
            score: 0.5,
            reasons: vec![],
        }
    }

    fn standard_items() -> Vec<NormalizedItem> {
        vec![
            norm("Tee", Category::Top),
            norm("Jeans", Category::Bottom),
            norm("Sneakers", Category::Shoes),
            norm("Parka", Category::Outerwear),
        ]
    }

    fn standard_picks() -> Vec<AssembledPick> {
        vec![
            pick(0, Category::Top),
            pick(1, Category::Bottom),
            pick(2, Category::Shoes),
        ]
    }

    fn validate(
        picks: &[AssembledPick],
        items: &[NormalizedItem],
        temperature_f: f64,
    ) -> ValidationReport {
        let mut weather = WeatherSnapshot::mild();
        weather.temperature_f = temperature_f;
        validate_outfit(
            picks,
            items,
            profile_for("casual"),
            &EngineLimits::default(),
            &weather,
        )
    }

    #[test]
    fn test_complete_outfit_passes() {
        let report = validate(&standard_picks(), &standard_items(), 72.0);
        assert!(report.passed());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_slot_fails() {
        let items = standard_items();
        let picks = vec![
            pick(0, Category::Top),
            pick(1, Category::Bottom),
            pick(3, Category::Outerwear),
        ];
        let report = validate(&picks, &items, 72.0);
        assert!(!report.passed());
        assert!(report.failures.iter().any(|f| f.contains("shoes")));
    }

    #[test]
    fn test_too_few_items_fails() {
        let items = standard_items();
        let picks = vec![pick(0, Category::Top), pick(2, Category::Shoes)];
        let report = validate(&picks, &items, 72.0);
        assert!(report
            .failures
            .iter()
            .any(|f| f.contains("minimum") || f.contains("not covered")));
    }

    #[test]
    fn test_category_cap_violation_fails() {
        let items = vec![
            norm("Jeans", Category::Bottom),
            norm("Chinos", Category::Bottom),
            norm("Tee", Category::Top),
            norm("Sneakers", Category::Shoes),
        ];
        let picks = vec![
            pick(0, Category::Bottom),
            pick(1, Category::Bottom),
            pick(2, Category::Top),
            pick(3, Category::Shoes),
        ];
        let report = validate(&picks, &items, 72.0);
        assert!(report.failures.iter().any(|f| f.contains("cap")));
    }

    #[test]
    fn test_conflicting_formality_mix_fails() {
        let mut gown = WardrobeItem::new("Evening gown", Category::Dress);
        gown.styles = vec!["black_tie".into()];
        let mut sweats = WardrobeItem::new("Joggers", Category::Bottom);
        sweats.styles = vec!["sweats".into()];
        let items = vec![
            normalize_item(&gown).0,
            normalize_item(&sweats).0,
            norm("Sneakers", Category::Shoes),
        ];
        let picks = vec![
            pick(0, Category::Dress),
            pick(1, Category::Bottom),
            pick(2, Category::Shoes),
        ];
        let report = validate(&picks, &items, 72.0);
        assert!(report
            .failures
            .iter()
            .any(|f| f.contains("conflicting formality")));
    }

    #[test]
    fn test_cold_without_layers_warns() {
        let report = validate(&standard_picks(), &standard_items(), 30.0);
        assert!(report.passed(), "layering is a warning, not a failure");
        assert_eq!(report.warnings, vec![OutfitWarning::InsufficientLayers]);
    }

    #[test]
    fn test_cold_with_outerwear_has_no_warning() {
        let items = standard_items();
        let mut picks = standard_picks();
        picks.push(pick(3, Category::Outerwear));
        let report = validate(&picks, &items, 30.0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_cold_with_warm_material_counts_as_layer() {
        let mut sweater = WardrobeItem::new("Wool sweater", Category::Top);
        sweater.materials = vec!["wool".into()];
        let items = vec![
            normalize_item(&sweater).0,
            norm("Jeans", Category::Bottom),
            norm("Boots", Category::Shoes),
        ];
        let picks = vec![
            pick(0, Category::Top),
            pick(1, Category::Bottom),
            pick(2, Category::Shoes),
        ];
        let report = validate(&picks, &items, 30.0);
        assert!(report.warnings.is_empty());
    }
}
