//! Generation output contract
//!
//! A [`GeneratedOutfit`] is the engine's sole success result: the selected
//! items, an overall confidence, human-readable reasoning, the tier that
//! produced it, and any warnings accumulated on the way down the
//! degradation ladder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::Category;

// ============================================================================
// Generation Tier
// ============================================================================

/// Degradation ladder position that produced an outfit
///
/// Generation always starts at `Strict` and moves one direction only:
/// toward looser tiers. Each tier maps to a disjoint confidence band, so
/// confidence decreases whenever the ladder advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTier {
    Strict,
    Relaxed,
    RuleBased,
    MinimalFallback,
}

impl GenerationTier {
    /// Next looser tier, or `None` at the bottom of the ladder
    pub fn next_looser(self) -> Option<GenerationTier> {
        match self {
            GenerationTier::Strict => Some(GenerationTier::Relaxed),
            GenerationTier::Relaxed => Some(GenerationTier::RuleBased),
            GenerationTier::RuleBased => Some(GenerationTier::MinimalFallback),
            GenerationTier::MinimalFallback => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationTier::Strict => "strict",
            GenerationTier::Relaxed => "relaxed",
            GenerationTier::RuleBased => "rule_based",
            GenerationTier::MinimalFallback => "minimal_fallback",
        }
    }
}

impl std::fmt::Display for GenerationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Warnings
// ============================================================================

/// Non-fatal conditions surfaced alongside a generated outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutfitWarning {
    /// Cold weather but no outerwear or heavy layer available
    InsufficientLayers,
    /// Deadline expired; remaining tiers were skipped in favor of cheap ones
    DeadlineExceeded,
    /// Outfit includes generic placeholder items for missing categories
    PlaceholderItems { count: usize },
    /// Unrecognized tags were dropped during normalization
    DroppedTags { count: usize },
    /// Style scoring failed; ranking fell back to neutral ordering
    StyleScoringSkipped,
}

impl std::fmt::Display for OutfitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutfitWarning::InsufficientLayers => {
                write!(f, "cold weather but no warm layer available")
            }
            OutfitWarning::DeadlineExceeded => {
                write!(f, "generation deadline exceeded, used fastest strategy")
            }
            OutfitWarning::PlaceholderItems { count } => {
                write!(f, "{count} placeholder item(s) stand in for missing categories")
            }
            OutfitWarning::DroppedTags { count } => {
                write!(f, "{count} unrecognized tag(s) ignored")
            }
            OutfitWarning::StyleScoringSkipped => {
                write!(f, "style scoring unavailable, used rule-based ordering")
            }
        }
    }
}

// ============================================================================
// Outfit
// ============================================================================

/// One item chosen into an outfit, with its score and selection reasons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedItem {
    pub item_id: Uuid,
    pub name: String,
    pub category: Category,
    /// Soft score the item carried at selection time
    pub score: f64,
    /// True for synthesized fallback placeholders, false for real items
    #[serde(default)]
    pub is_fallback: bool,
    /// Short phrases explaining the selection, e.g. "matches requested style"
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// A complete generated outfit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedOutfit {
    pub id: Uuid,
    pub items: Vec<SelectedItem>,
    /// Overall confidence. Valid range: [0.0, 1.0]
    pub confidence: f64,
    /// Human-readable explanation of the composition
    pub reasoning: String,
    #[serde(default)]
    pub warnings: Vec<OutfitWarning>,
    pub tier: GenerationTier,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedOutfit {
    pub fn contains_item(&self, item_id: Uuid) -> bool {
        self.items.iter().any(|i| i.item_id == item_id)
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.items.iter().filter(|i| i.category == category).count()
    }

    pub fn has_warning(&self, warning: &OutfitWarning) -> bool {
        self.warnings.contains(warning)
    }

    /// Ids of real (non-fallback) selected items
    pub fn real_item_ids(&self) -> Vec<Uuid> {
        self.items
            .iter()
            .filter(|i| !i.is_fallback)
            .map(|i| i.item_id)
            .collect()
    }
}
