//! Soft scoring
//!
//! Sums weighted contributions per candidate: semantic style/occasion/
//! mood affinity (largest weight), keyword hits, feedback affinity,
//! bounded novelty, favorite bonus, minus formality penalties. The
//! formality block penalty dominates every possible positive sum (see
//! `TuningParams::validate`), so formality-incompatible items can never
//! outrank clean ones. Each contribution appends a reason string so the
//! final outfit can explain itself.
//!
//! Pairwise color/material harmony is a separate pass, skipped for
//! casual-like occasions or oversized pools to bound the quadratic cost.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use ensemble_common::{Category, MatchMode, TuningParams};

use crate::normalize::{NormalizedItem, NormalizedRequest};
use crate::occasion::OccasionProfile;
use crate::stylegraph::StyleGraph;
use crate::pipeline::filter::CandidatePools;

/// Colors that harmonize with anything
const NEUTRAL_COLORS: &[&str] = &[
    "black", "white", "gray", "grey", "navy", "beige", "cream", "tan", "khaki", "ivory",
];

// ============================================================================
// Scored Pools
// ============================================================================

/// One candidate with its accumulated soft score
#[derive(Debug, Clone)]
pub struct ScoredItem {
    /// Index into the normalized wardrobe
    pub index: usize,
    /// Total weighted score; may be negative after penalties
    pub score: f64,
    /// Semantic affinity component alone, for exact-match-bias gating
    pub style_score: f64,
    /// Score-contribution explanations, in application order
    pub reasons: Vec<String>,
}

/// Per-category scored candidate lists
#[derive(Debug, Clone, Default)]
pub struct ScoredPools {
    pub by_category: BTreeMap<Category, Vec<ScoredItem>>,
}

impl ScoredPools {
    pub fn candidates(&self, category: Category) -> &[ScoredItem] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    /// Drop candidates whose semantic affinity is zero (strict tier bias)
    pub fn retain_positive_style(&mut self) {
        for pool in self.by_category.values_mut() {
            pool.retain(|c| c.style_score > 0.0);
        }
        self.by_category.retain(|_, pool| !pool.is_empty());
    }
}

// ============================================================================
// Scorer
// ============================================================================

/// Scoring context for one tier attempt
pub struct Scorer<'a> {
    pub graph: &'a StyleGraph,
    pub params: &'a TuningParams,
    pub profile: &'a OccasionProfile,
    pub norm: &'a NormalizedRequest,
    /// Feedback affinity per wardrobe index, in [-1.0, 1.0]
    pub feedback: &'a [f64],
    pub now: DateTime<Utc>,
}

impl<'a> Scorer<'a> {
    /// Score every candidate in every pool
    ///
    /// # Returns
    /// `Err` with a description when any accumulated score is non-finite;
    /// the controller treats that as an internal scoring error.
    pub fn score_pools(
        &self,
        items: &[NormalizedItem],
        pools: &CandidatePools,
        mode: MatchMode,
    ) -> Result<ScoredPools, String> {
        let mut scored = ScoredPools::default();
        for (category, indices) in &pools.by_category {
            let mut pool = Vec::with_capacity(indices.len());
            for &index in indices {
                let candidate = self.score_item(&items[index], index, mode);
                if !candidate.score.is_finite() {
                    return Err(format!(
                        "non-finite score {} for item '{}'",
                        candidate.score, items[index].item.name
                    ));
                }
                pool.push(candidate);
            }
            scored.by_category.insert(*category, pool);
        }
        Ok(scored)
    }

    fn score_item(&self, item: &NormalizedItem, index: usize, mode: MatchMode) -> ScoredItem {
        let mut reasons = Vec::new();
        let mut score = 0.0;

        let style_score = self.semantic_component(item, mode, &mut reasons);
        score += style_score;

        score += self.keyword_component(item, &mut reasons);
        score += self.feedback_component(index, &mut reasons);
        score += self.novelty_component(item, &mut reasons);

        if item.item.favorite {
            score += self.params.favorite_bonus;
            reasons.push("favorite".to_string());
        }

        score += self.formality_component(item, &mut reasons);

        ScoredItem {
            index,
            score,
            style_score,
            reasons,
        }
    }

    /// Weighted blend of style, occasion, and mood affinities
    ///
    /// Each affinity is 1.0 for an exact tag match, the configured
    /// partial credit for a graph-compatible match in semantic mode, 0
    /// otherwise. Blend weights (style 0.6, occasion 0.25, mood 0.15)
    /// renormalize over the intent fields actually present.
    fn semantic_component(
        &self,
        item: &NormalizedItem,
        mode: MatchMode,
        reasons: &mut Vec<String>,
    ) -> f64 {
        let mut weighted = 0.0;
        let mut weight_sum = 0.0;

        if !self.norm.style.is_empty() {
            let affinity = self.affinity(&item.tags.styles, &self.norm.style, mode);
            weighted += 0.6 * affinity;
            weight_sum += 0.6;
            if affinity >= 1.0 {
                reasons.push(format!("matches requested style '{}'", self.norm.style));
            } else if affinity > 0.0 {
                reasons.push(format!("style compatible with '{}'", self.norm.style));
            }
        }
        if !self.norm.occasion.is_empty() {
            let affinity = self.affinity(&item.tags.occasions, &self.norm.occasion, mode);
            weighted += 0.25 * affinity;
            weight_sum += 0.25;
            if affinity >= 1.0 {
                reasons.push(format!("suits the {} occasion", self.norm.occasion));
            }
        }
        if !self.norm.mood.is_empty() {
            let affinity = self.affinity(&item.tags.moods, &self.norm.mood, mode);
            weighted += 0.15 * affinity;
            weight_sum += 0.15;
            if affinity > 0.0 {
                reasons.push(format!("fits a {} mood", self.norm.mood));
            }
        }

        if weight_sum == 0.0 {
            return 0.0;
        }
        self.params.semantic_weight * (weighted / weight_sum)
    }

    /// Best affinity of any tag in `tags` against `requested`
    fn affinity(&self, tags: &[String], requested: &str, mode: MatchMode) -> f64 {
        let mut best = 0.0f64;
        for tag in tags {
            if tag == requested {
                return 1.0;
            }
            if mode == MatchMode::Semantic && self.graph.compatible(tag, requested) {
                best = best.max(self.params.semantic_partial_credit);
            }
        }
        best
    }

    fn keyword_component(&self, item: &NormalizedItem, reasons: &mut Vec<String>) -> f64 {
        if self.norm.keywords.is_empty() {
            return 0.0;
        }
        let mut hits = 0usize;
        for keyword in &self.norm.keywords {
            let spaced = keyword.replace('_', " ");
            if item.text.contains(&spaced) || item.has_tag(keyword) {
                hits += 1;
                reasons.push(format!("keyword '{spaced}'"));
            }
        }
        self.params.keyword_weight * hits as f64 / self.norm.keywords.len() as f64
    }

    fn feedback_component(&self, index: usize, reasons: &mut Vec<String>) -> f64 {
        let affinity = self.feedback.get(index).copied().unwrap_or(0.0);
        if affinity > 0.0 {
            reasons.push("appeared in liked outfits".to_string());
        } else if affinity < 0.0 {
            reasons.push("appeared in disliked outfits".to_string());
        }
        self.params.feedback_weight * affinity
    }

    /// Bounded novelty: low wear count and long-unworn items score higher
    fn novelty_component(&self, item: &NormalizedItem, reasons: &mut Vec<String>) -> f64 {
        let ceiling = self.params.wear_count_ceiling as f64;
        let wear = 1.0 - (item.item.wear_count.min(self.params.wear_count_ceiling) as f64 / ceiling);
        let recency = match item.item.last_worn {
            None => 1.0,
            Some(worn) => {
                let days = (self.now - worn).num_days().max(0) as f64;
                (days / self.params.novelty_horizon_days).clamp(0.0, 1.0)
            }
        };
        let fraction = 0.6 * wear + 0.4 * recency;
        if fraction >= 0.8 {
            reasons.push("fresh pick, rarely worn".to_string());
        }
        self.params.novelty_weight * fraction
    }

    /// Formality gap penalties against the occasion's expected level
    ///
    /// A gap of two or more steps takes the dominating block penalty; a
    /// one-step gap takes the small tolerated-gap penalty.
    fn formality_component(&self, item: &NormalizedItem, reasons: &mut Vec<String>) -> f64 {
        let gap = item.formality.gap(self.profile.formality);
        if gap >= 2 {
            reasons.push(format!(
                "{} formality clashes with a {} occasion",
                item.formality, self.profile.formality
            ));
            -self.params.formality_block_penalty
        } else if gap == 1 {
            reasons.push("slight formality mismatch".to_string());
            -self.params.formality_gap_penalty
        } else {
            0.0
        }
    }
}

// ============================================================================
// Feedback Affinity
// ============================================================================

/// Precompute per-item feedback affinity in [-1.0, 1.0]
///
/// Each liked outfit containing the item adds one, each disliked outfit
/// subtracts one; the net is clamped.
pub fn feedback_affinity(
    items: &[NormalizedItem],
    feedback: &[ensemble_common::OutfitFeedback],
) -> Vec<f64> {
    items
        .iter()
        .map(|item| {
            let mut net = 0i32;
            for entry in feedback {
                if entry.item_ids.contains(&item.item.id) {
                    net += if entry.liked { 1 } else { -1 };
                }
            }
            (net as f64).clamp(-1.0, 1.0)
        })
        .collect()
}

// ============================================================================
// Pairwise Harmony
// ============================================================================

/// Apply pairwise color/material harmony bonuses across pools
///
/// O(n²) in the candidate count, so the pass is skipped entirely for
/// casual-like occasions and for pools larger than `pool_cap`.
///
/// # Returns
/// `false` when the pass was skipped (counted in telemetry upstream).
pub fn apply_harmony(
    pools: &mut ScoredPools,
    items: &[NormalizedItem],
    params: &TuningParams,
    pool_cap: usize,
    profile: &OccasionProfile,
) -> bool {
    if profile.casual_like || pools.total() > pool_cap {
        return false;
    }

    // Snapshot the candidate set; each item is compared against
    // candidates in other categories only.
    let all: Vec<(Category, usize)> = pools
        .by_category
        .iter()
        .flat_map(|(cat, pool)| pool.iter().map(move |c| (*cat, c.index)))
        .collect();

    for (category, pool) in pools.by_category.iter_mut() {
        for candidate in pool.iter_mut() {
            let mut pair_sum = 0.0;
            let mut pair_count = 0usize;
            for (other_category, other_index) in &all {
                if other_category == category {
                    continue;
                }
                pair_sum += pair_harmony(&items[candidate.index], &items[*other_index]);
                pair_count += 1;
            }
            if pair_count == 0 {
                continue;
            }
            let avg = pair_sum / pair_count as f64;
            // Map [0,1] average onto a bounded [-w, +w] adjustment
            let bonus = params.harmony_weight * (avg - 0.5) * 2.0;
            candidate.score += bonus;
            if bonus > 0.05 {
                candidate.reasons.push("pairs well with the rest".to_string());
            } else if bonus < -0.05 {
                candidate.reasons.push("colors clash with the pool".to_string());
            }
        }
    }
    true
}

/// Harmony of one item pair, in [0.0, 1.0]
fn pair_harmony(a: &NormalizedItem, b: &NormalizedItem) -> f64 {
    0.6 * color_harmony(a, b) + 0.4 * material_harmony(a, b)
}

fn color_harmony(a: &NormalizedItem, b: &NormalizedItem) -> f64 {
    let ca = &a.tags.colors;
    let cb = &b.tags.colors;
    if ca.is_empty() || cb.is_empty() {
        return 0.6;
    }
    if ca.iter().any(|c| cb.contains(c)) {
        return 0.9;
    }
    let neutral = |colors: &[String]| {
        colors
            .iter()
            .any(|c| NEUTRAL_COLORS.contains(&c.as_str()))
    };
    if neutral(ca) || neutral(cb) {
        return 0.8;
    }
    0.5
}

fn material_harmony(a: &NormalizedItem, b: &NormalizedItem) -> f64 {
    let ma = &a.tags.materials;
    let mb = &b.tags.materials;
    if ma.is_empty() || mb.is_empty() {
        return 0.6;
    }
    let both_denim =
        ma.iter().any(|m| m == "denim") && mb.iter().any(|m| m == "denim");
    if both_denim {
        // Double denim reads as a clash
        return 0.4;
    }
    if ma.iter().any(|m| mb.contains(m)) {
        return 0.8;
    }
    0.6
}
