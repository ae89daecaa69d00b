//! Wardrobe item vocabulary
//!
//! Core types describing a single garment: its outfit slot (category),
//! formality level, gender expression, and descriptive tags. These types
//! are the input contract of the generation engine; tag normalization and
//! scoring live in `ensemble-engine`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Categories
// ============================================================================

/// Outfit slot a wardrobe item occupies
///
/// Categories drive assembly: an outfit needs a silhouette base
/// (top + bottom, or a dress) plus shoes, with remaining slots optional.
/// Variant order is assembly-priority order and defines `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Top,
    Bottom,
    Dress,
    Outerwear,
    Shoes,
    Accessory,
    Bag,
    Headwear,
}

impl Category {
    /// All categories in assembly-priority order
    pub fn all() -> [Category; 8] {
        [
            Category::Top,
            Category::Bottom,
            Category::Dress,
            Category::Outerwear,
            Category::Shoes,
            Category::Accessory,
            Category::Bag,
            Category::Headwear,
        ]
    }

    /// Stable lowercase label used in logs and reasoning text
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Dress => "dress",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessory => "accessory",
            Category::Bag => "bag",
            Category::Headwear => "headwear",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Formality
// ============================================================================

/// Formality level on an ordinal scale
///
/// Variant order defines the scale: `Loungewear < Casual < BusinessCasual
/// < Formal`. Distance on this scale gates item compatibility with the
/// requested occasion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Loungewear,
    Casual,
    BusinessCasual,
    Formal,
}

impl Formality {
    /// Ordinal distance between two formality levels
    ///
    /// # Returns
    /// 0 for equal levels, 3 for the loungewear/formal extremes.
    pub fn gap(self, other: Formality) -> u8 {
        (self as i8 - other as i8).unsigned_abs()
    }

    /// Infer a formality level from a single normalized style tag
    ///
    /// Returns `None` for tags that carry no formality signal. Callers
    /// inspecting multiple tags should take the maximum of the inferred
    /// levels (a tuxedo jacket tagged `classic` and `formal` is formal).
    pub fn from_tag(tag: &str) -> Option<Formality> {
        match tag {
            "formal" | "black_tie" | "elegant" | "evening" | "tuxedo" | "suiting"
            | "cocktail" => Some(Formality::Formal),
            "business_casual" | "smart_casual" | "business" | "office" | "preppy"
            | "old_money" | "polished" => Some(Formality::BusinessCasual),
            "loungewear" | "lounge" | "sleepwear" | "pajama" | "sweats" => {
                Some(Formality::Loungewear)
            }
            "casual" | "streetwear" | "everyday" | "relaxed" | "athleisure" | "sporty" => {
                Some(Formality::Casual)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Formality::Loungewear => "loungewear",
            Formality::Casual => "casual",
            Formality::BusinessCasual => "business_casual",
            Formality::Formal => "formal",
        }
    }
}

impl std::fmt::Display for Formality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Gender Expression
// ============================================================================

/// Gender expression of an item or a profile preference
///
/// Items without an expression fit any profile. `Unisex` items are never
/// excluded by profile gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderExpression {
    Masculine,
    Feminine,
    Unisex,
}

// ============================================================================
// Wardrobe Item
// ============================================================================

/// A single garment in a user's wardrobe
///
/// Tag lists (`styles`, `occasions`, `moods`, `seasons`, `materials`) are
/// free-form strings as entered by the user or an upstream tagger; the
/// engine normalizes them before filtering and scoring. All fields other
/// than `id`, `name`, and `category` are optional in serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    /// Primary color name, e.g. "navy"
    #[serde(default)]
    pub color: String,
    /// Additional colors present in the garment
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    /// Style tags, e.g. "minimalist", "streetwear"
    #[serde(default)]
    pub styles: Vec<String>,
    /// Occasions the item suits, e.g. "office", "date_night"
    #[serde(default)]
    pub occasions: Vec<String>,
    /// Mood tags, e.g. "confident", "cozy"
    #[serde(default)]
    pub moods: Vec<String>,
    /// Seasons the item suits: "spring", "summer", "fall", "winter"
    #[serde(default)]
    pub seasons: Vec<String>,
    /// Fabric or material tags, e.g. "wool", "linen"
    #[serde(default)]
    pub materials: Vec<String>,
    /// Explicit formality level; inferred from style tags when absent
    #[serde(default)]
    pub formality: Option<Formality>,
    #[serde(default)]
    pub gender: Option<GenderExpression>,
    /// Times the item has been worn (novelty signal)
    #[serde(default)]
    pub wear_count: u32,
    /// Most recent wear timestamp (novelty signal)
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    /// User marked the item as a favorite
    #[serde(default)]
    pub favorite: bool,
}

impl WardrobeItem {
    /// Minimal constructor for an item with only required fields set
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        WardrobeItem {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            category,
            color: String::new(),
            dominant_colors: Vec::new(),
            styles: Vec::new(),
            occasions: Vec::new(),
            moods: Vec::new(),
            seasons: Vec::new(),
            materials: Vec::new(),
            formality: None,
            gender: None,
            wear_count: 0,
            last_worn: None,
            favorite: false,
        }
    }
}
