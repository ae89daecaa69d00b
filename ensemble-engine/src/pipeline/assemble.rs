//! Outfit assembly
//!
//! Greedy selection from ranked candidate pools: fill every required
//! slot with the best available candidate (alternative categories may
//! stand in, and one dress satisfies both base slots), add a warm layer
//! in cold weather, then fill optional slots up to the item bounds. All
//! work happens under a fixed attempt budget so assembly terminates on
//! adversarial inputs. Equal-score optional picks are broken by the
//! request's seeded RNG, never an unseeded one.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::Rng;

use ensemble_common::{Category, EngineLimits, WeatherSnapshot};

use crate::error::TierFailure;
use crate::normalize::NormalizedItem;
use crate::occasion::{OccasionProfile, SlotRequirement};
use crate::pipeline::score::ScoredPools;

/// Categories considered for optional fill, in priority order
const OPTIONAL_CATEGORIES: [Category; 4] = [
    Category::Outerwear,
    Category::Accessory,
    Category::Bag,
    Category::Headwear,
];

/// One assembled selection, still referencing the wardrobe by index
#[derive(Debug, Clone)]
pub struct AssembledPick {
    pub index: usize,
    pub category: Category,
    pub score: f64,
    pub reasons: Vec<String>,
}

struct Assembly<'a> {
    items: &'a [NormalizedItem],
    pools: &'a ScoredPools,
    limits: &'a EngineLimits,
    picks: Vec<AssembledPick>,
    used: BTreeSet<usize>,
    counts: BTreeMap<Category, usize>,
    attempts: u32,
}

impl<'a> Assembly<'a> {
    fn spend_attempt(&mut self) -> Result<(), TierFailure> {
        self.attempts += 1;
        if self.attempts > self.limits.assembly_attempt_cap {
            return Err(TierFailure::Validation(
                "assembly attempt budget exhausted".to_string(),
            ));
        }
        Ok(())
    }

    fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    fn under_cap(&self, category: Category) -> bool {
        self.count(category) < self.limits.category_cap(category)
    }

    fn add(&mut self, index: usize, extra_reason: Option<&str>) {
        let category = self.items[index].item.category;
        // Picks always come from a pool; an absent entry degrades to a
        // zero score rather than a panic
        let (score, mut reasons) = match self
            .pools
            .candidates(category)
            .iter()
            .find(|c| c.index == index)
        {
            Some(candidate) => (candidate.score, candidate.reasons.clone()),
            None => (0.0, Vec::new()),
        };
        if let Some(reason) = extra_reason {
            reasons.push(reason.to_string());
        }
        self.picks.push(AssembledPick {
            index,
            category,
            score,
            reasons,
        });
        self.used.insert(index);
        *self.counts.entry(category).or_insert(0) += 1;
    }

    fn slot_satisfied(&self, slot: &SlotRequirement) -> bool {
        self.picks.iter().any(|p| slot.accepts(p.category))
    }

    /// Best unused candidate for a slot, preferring the primary category
    /// on equal scores
    fn best_for_slot(&self, slot: &SlotRequirement) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        let categories =
            std::iter::once(slot.primary).chain(slot.alternatives.iter().copied());
        for category in categories {
            if !self.under_cap(category) {
                continue;
            }
            // Pools are ranked, so the first unused entry is the best
            if let Some(candidate) = self
                .pools
                .candidates(category)
                .iter()
                .find(|c| !self.used.contains(&c.index))
            {
                let better = match best {
                    None => true,
                    Some((_, score)) => candidate.score > score,
                };
                if better {
                    best = Some((candidate.index, candidate.score));
                }
            }
        }
        best.map(|(index, _)| index)
    }

    /// Unused optional-category candidates still under their caps
    fn optional_choices(&self, require_positive: bool) -> Vec<(usize, f64)> {
        let mut choices = Vec::new();
        for category in OPTIONAL_CATEGORIES {
            if !self.under_cap(category) {
                continue;
            }
            if let Some(candidate) = self
                .pools
                .candidates(category)
                .iter()
                .find(|c| !self.used.contains(&c.index))
            {
                if !require_positive || candidate.score > 0.0 {
                    choices.push((candidate.index, candidate.score));
                }
            }
        }
        choices
    }

    /// Pick among the best optional choices, seeded-RNG breaking ties
    /// within `tie_epsilon`
    fn choose_optional(
        &self,
        choices: &[(usize, f64)],
        tie_epsilon: f64,
        rng: &mut StdRng,
    ) -> usize {
        let best = choices
            .iter()
            .map(|(_, score)| *score)
            .fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<usize> = choices
            .iter()
            .filter(|(_, score)| *score >= best - tie_epsilon)
            .map(|(index, _)| *index)
            .collect();
        if tied.len() == 1 {
            tied[0]
        } else {
            tied[rng.gen_range(0..tied.len())]
        }
    }
}

/// Assemble an outfit from ranked pools
///
/// # Errors
/// `TierFailure::EmptyCategory` when a required slot has no candidate;
/// `TierFailure::Validation` when the attempt budget runs out. Both are
/// signals to the degradation controller, never surfaced to callers.
pub(crate) fn assemble(
    items: &[NormalizedItem],
    pools: &ScoredPools,
    profile: &OccasionProfile,
    limits: &EngineLimits,
    weather: &WeatherSnapshot,
    tie_epsilon: f64,
    rng: &mut StdRng,
) -> Result<Vec<AssembledPick>, TierFailure> {
    let mut assembly = Assembly {
        items,
        pools,
        limits,
        picks: Vec::new(),
        used: BTreeSet::new(),
        counts: BTreeMap::new(),
        attempts: 0,
    };

    // Required slots first; one dress can satisfy both base slots
    for slot in profile.required_slots {
        if assembly.slot_satisfied(slot) {
            continue;
        }
        assembly.spend_attempt()?;
        match assembly.best_for_slot(slot) {
            Some(index) => assembly.add(index, None),
            None => return Err(TierFailure::EmptyCategory(slot.primary)),
        }
    }

    // Cold weather: pull in a warm layer before discretionary fills
    if weather.temperature_f <= limits.cold_threshold_f
        && assembly.picks.len() < limits.max_items
        && assembly.count(Category::Outerwear) == 0
    {
        assembly.spend_attempt()?;
        if let Some(candidate) = assembly
            .pools
            .candidates(Category::Outerwear)
            .iter()
            .find(|c| !assembly.used.contains(&c.index))
        {
            let index = candidate.index;
            assembly.add(index, Some("added for warmth"));
        }
    }

    // Reach the minimum item count from optional categories
    while assembly.picks.len() < limits.min_items {
        assembly.spend_attempt()?;
        let choices = assembly.optional_choices(false);
        if choices.is_empty() {
            break;
        }
        let index = assembly.choose_optional(&choices, tie_epsilon, rng);
        assembly.add(index, Some("completes the outfit"));
    }

    // Discretionary extras: only picks that add positive value
    while assembly.picks.len() < limits.max_items {
        assembly.spend_attempt()?;
        let choices = assembly.optional_choices(true);
        if choices.is_empty() {
            break;
        }
        let index = assembly.choose_optional(&choices, tie_epsilon, rng);
        assembly.add(index, None);
    }

    Ok(assembly.picks)
}
