//! Engine tuning parameters
//!
//! Scoring weights, confidence bands, and structural limits for outfit
//! generation. A [`EngineConfig`] is loaded once (see [`crate::config`]),
//! validated, and handed to the engine by value. There is no global
//! parameter state: each engine instance owns its copy, so concurrent
//! engines with different tunings never interfere.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::Category;

// ============================================================================
// Scoring Weights & Confidence Bands
// ============================================================================

/// Soft-scoring weights and per-tier confidence bands
///
/// The one structural rule: `formality_block_penalty` must exceed
/// [`TuningParams::max_positive_sum`], so no accumulation of positive
/// signals can rescue an item whose formality is incompatible with the
/// occasion. [`TuningParams::validate`] rejects configurations that break
/// this rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningParams {
    /// Weight of an exact style-tag match against the requested style.
    ///
    /// Valid range: [0.0, 5.0]
    /// Default: 1.0
    pub semantic_weight: f64,

    /// Fraction of `semantic_weight` granted to styles adjacent in the
    /// compatibility graph. Only applies in semantic match mode.
    ///
    /// Valid range: [0.0, 1.0]
    /// Default: 0.6
    pub semantic_partial_credit: f64,

    /// Weight per request keyword found in an item's name or tags.
    ///
    /// Valid range: [0.0, 5.0]
    /// Default: 0.4
    pub keyword_weight: f64,

    /// Weight of the feedback affinity signal (liked/disliked history).
    ///
    /// Valid range: [0.0, 5.0]
    /// Default: 0.25
    pub feedback_weight: f64,

    /// Weight of the novelty signal (low wear count, long-unworn items).
    ///
    /// Valid range: [0.0, 5.0]
    /// Default: 0.3
    pub novelty_weight: f64,

    /// Weight of pairwise color/material harmony during assembly.
    ///
    /// Valid range: [0.0, 5.0]
    /// Default: 0.2
    pub harmony_weight: f64,

    /// Flat bonus applied to favorited items.
    ///
    /// Valid range: [0.0, 1.0]
    /// Default: 0.1
    pub favorite_bonus: f64,

    /// Magnitude subtracted when an item's formality is more than one
    /// ordinal step from the occasion's expected formality. Must exceed
    /// the maximum possible positive contribution.
    ///
    /// Valid range: (max_positive_sum, 100.0]
    /// Default: 3.0
    pub formality_block_penalty: f64,

    /// Magnitude subtracted for a tolerated one-step formality gap.
    ///
    /// Valid range: [0.0, 1.0]
    /// Default: 0.5
    pub formality_gap_penalty: f64,

    /// Scores within this distance of each other count as tied; seeded
    /// tie-breaking picks among tied candidates.
    ///
    /// Valid range: [0.0, 0.5]
    /// Default: 0.05
    pub tie_epsilon: f64,

    /// Lower bound of the strict-tier confidence band (upper bound 1.0).
    ///
    /// Valid range: (relaxed_confidence_floor, 1.0]
    /// Default: 0.70
    pub strict_confidence_floor: f64,

    /// Lower bound of the relaxed-tier confidence band. The band's upper
    /// bound is `strict_confidence_floor`, keeping tiers disjoint.
    ///
    /// Valid range: (rule_based_confidence..strict_confidence_floor]
    /// Default: 0.50
    pub relaxed_confidence_floor: f64,

    /// Fixed confidence reported by the rule-based tier.
    ///
    /// Valid range: [fallback_confidence, relaxed_confidence_floor]
    /// Default: 0.50
    pub rule_based_confidence: f64,

    /// Fixed confidence reported by the minimal-fallback tier.
    ///
    /// Valid range: [0.0, rule_based_confidence]
    /// Default: 0.35
    pub fallback_confidence: f64,

    /// Days since last wear at which an item reaches full novelty.
    ///
    /// Valid range: (0.0, 3650.0]
    /// Default: 90.0
    pub novelty_horizon_days: f64,

    /// Wear count at which an item reaches zero wear-novelty.
    ///
    /// Valid range: [1, 10000]
    /// Default: 20
    pub wear_count_ceiling: u32,
}

impl Default for TuningParams {
    fn default() -> Self {
        TuningParams {
            semantic_weight: 1.0,
            semantic_partial_credit: 0.6,
            keyword_weight: 0.4,
            feedback_weight: 0.25,
            novelty_weight: 0.3,
            harmony_weight: 0.2,
            favorite_bonus: 0.1,
            formality_block_penalty: 3.0,
            formality_gap_penalty: 0.5,
            tie_epsilon: 0.05,
            strict_confidence_floor: 0.70,
            relaxed_confidence_floor: 0.50,
            rule_based_confidence: 0.50,
            fallback_confidence: 0.35,
            novelty_horizon_days: 90.0,
            wear_count_ceiling: 20,
        }
    }
}

impl TuningParams {
    /// Largest score any single item can earn from positive signals
    ///
    /// Sum of all positive weights at full strength. The formality block
    /// penalty must exceed this value so a blocked item always scores
    /// below an unblocked zero-signal item.
    pub fn max_positive_sum(&self) -> f64 {
        self.semantic_weight
            + self.keyword_weight
            + self.feedback_weight
            + self.novelty_weight
            + self.harmony_weight
            + self.favorite_bonus
    }

    /// Validate weight ranges and band ordering
    ///
    /// # Returns
    /// `Error::Config` naming the first violated rule.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("semantic_weight", self.semantic_weight),
            ("keyword_weight", self.keyword_weight),
            ("feedback_weight", self.feedback_weight),
            ("novelty_weight", self.novelty_weight),
            ("harmony_weight", self.harmony_weight),
            ("favorite_bonus", self.favorite_bonus),
            ("formality_gap_penalty", self.formality_gap_penalty),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.semantic_partial_credit) {
            return Err(Error::Config(format!(
                "semantic_partial_credit must be in [0.0, 1.0], got {}",
                self.semantic_partial_credit
            )));
        }
        if self.formality_block_penalty <= self.max_positive_sum() {
            return Err(Error::Config(format!(
                "formality_block_penalty ({}) must exceed the maximum positive \
                 contribution ({}), otherwise blocked items can outrank clean ones",
                self.formality_block_penalty,
                self.max_positive_sum()
            )));
        }
        if self.tie_epsilon < 0.0 || self.tie_epsilon > 0.5 {
            return Err(Error::Config(format!(
                "tie_epsilon must be in [0.0, 0.5], got {}",
                self.tie_epsilon
            )));
        }
        // Confidence bands must be ordered so looser tiers never report
        // higher confidence than stricter ones.
        let bands_ordered = 0.0 <= self.fallback_confidence
            && self.fallback_confidence <= self.rule_based_confidence
            && self.rule_based_confidence <= self.relaxed_confidence_floor
            && self.relaxed_confidence_floor < self.strict_confidence_floor
            && self.strict_confidence_floor <= 1.0;
        if !bands_ordered {
            return Err(Error::Config(format!(
                "confidence bands out of order: fallback {} <= rule_based {} <= \
                 relaxed_floor {} < strict_floor {} <= 1.0 must hold",
                self.fallback_confidence,
                self.rule_based_confidence,
                self.relaxed_confidence_floor,
                self.strict_confidence_floor
            )));
        }
        if self.novelty_horizon_days <= 0.0 {
            return Err(Error::Config(format!(
                "novelty_horizon_days must be positive, got {}",
                self.novelty_horizon_days
            )));
        }
        if self.wear_count_ceiling == 0 {
            return Err(Error::Config(
                "wear_count_ceiling must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Structural Limits
// ============================================================================

/// Structural limits on outfit shape and generation effort
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    /// Minimum items in a valid outfit.
    ///
    /// Valid range: [1, max_items]
    /// Default: 3
    pub min_items: usize,

    /// Maximum items in a valid outfit.
    ///
    /// Valid range: [min_items, 12]
    /// Default: 6
    pub max_items: usize,

    /// Maximum tops (layering allows a second top).
    ///
    /// Valid range: [1, 3]
    /// Default: 2
    pub max_tops: usize,

    /// Maximum accessories.
    ///
    /// Valid range: [0, 4]
    /// Default: 2
    pub max_accessories: usize,

    /// Cap on assembly attempts per tier before declaring the tier failed.
    ///
    /// Valid range: [1, 10000]
    /// Default: 100
    pub assembly_attempt_cap: u32,

    /// Top-N ranked candidates admitted to pairwise harmony scoring.
    /// Bounds the quadratic harmony pass on large wardrobes.
    ///
    /// Valid range: [max_items, 500]
    /// Default: 40
    pub harmony_pool_cap: usize,

    /// Temperature at or below which outerwear/heavy layers are required.
    ///
    /// Default: 40.0 (degrees Fahrenheit)
    pub cold_threshold_f: f64,

    /// Temperature at or above which heavy layers are excluded.
    ///
    /// Default: 78.0 (degrees Fahrenheit)
    pub hot_threshold_f: f64,

    /// Soft deadline for one generation run, in milliseconds. When it
    /// expires mid-run the engine skips ahead to the cheap tiers rather
    /// than aborting. 0 disables the deadline.
    ///
    /// Default: 5000
    pub deadline_ms: u64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        EngineLimits {
            min_items: 3,
            max_items: 6,
            max_tops: 2,
            max_accessories: 2,
            assembly_attempt_cap: 100,
            harmony_pool_cap: 40,
            cold_threshold_f: 40.0,
            hot_threshold_f: 78.0,
            deadline_ms: 5000,
        }
    }
}

impl EngineLimits {
    /// Maximum items of `category` allowed in one outfit
    pub fn category_cap(&self, category: Category) -> usize {
        match category {
            Category::Top => self.max_tops,
            Category::Accessory => self.max_accessories,
            _ => 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_items == 0 {
            return Err(Error::Config("min_items must be at least 1".to_string()));
        }
        if self.min_items > self.max_items {
            return Err(Error::Config(format!(
                "min_items ({}) must not exceed max_items ({})",
                self.min_items, self.max_items
            )));
        }
        if self.max_items > 12 {
            return Err(Error::Config(format!(
                "max_items must be at most 12, got {}",
                self.max_items
            )));
        }
        if self.max_tops == 0 {
            return Err(Error::Config("max_tops must be at least 1".to_string()));
        }
        if self.assembly_attempt_cap == 0 {
            return Err(Error::Config(
                "assembly_attempt_cap must be at least 1".to_string(),
            ));
        }
        if self.harmony_pool_cap < self.max_items {
            return Err(Error::Config(format!(
                "harmony_pool_cap ({}) must be at least max_items ({})",
                self.harmony_pool_cap, self.max_items
            )));
        }
        if self.cold_threshold_f >= self.hot_threshold_f {
            return Err(Error::Config(format!(
                "cold_threshold_f ({}) must be below hot_threshold_f ({})",
                self.cold_threshold_f, self.hot_threshold_f
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Combined Config
// ============================================================================

/// Complete engine configuration as loaded from TOML
///
/// ```toml
/// [tuning]
/// semantic_weight = 1.2
///
/// [limits]
/// max_items = 5
/// ```
///
/// Missing sections and fields take their defaults, so a partial file is
/// a valid override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tuning: TuningParams,
    pub limits: EngineLimits,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.tuning.validate()?;
        self.limits.validate()
    }
}
