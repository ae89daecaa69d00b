//! Generation request contract
//!
//! A [`GenerationRequest`] carries everything one generation run needs:
//! the occasion/style/mood intent, a weather snapshot, the user profile,
//! recent feedback, and the wardrobe snapshot to compose from. Requests
//! are self-contained so concurrent runs never share mutable state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{GenderExpression, WardrobeItem};

// ============================================================================
// Weather
// ============================================================================

/// Coarse weather condition classes recognized by hard filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Snow,
    Wind,
    Fog,
}

/// Point-in-time weather used for seasonal gating
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in degrees Fahrenheit
    pub temperature_f: f64,
    #[serde(default)]
    pub condition: WeatherCondition,
    /// Relative humidity percentage. Valid range: [0.0, 100.0]
    #[serde(default)]
    pub humidity_pct: f64,
    /// Sustained wind speed in miles per hour
    #[serde(default)]
    pub wind_mph: f64,
}

impl WeatherSnapshot {
    /// Mild fair-weather snapshot used when no provider is available
    pub fn mild() -> Self {
        WeatherSnapshot {
            temperature_f: 72.0,
            condition: WeatherCondition::Clear,
            humidity_pct: 40.0,
            wind_mph: 5.0,
        }
    }
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::mild()
    }
}

// ============================================================================
// Profile & Feedback
// ============================================================================

/// Stable user preferences applied to every request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    /// Preferred gender expression; `None` disables gender exclusion
    #[serde(default)]
    pub gender: Option<GenderExpression>,
    /// Styles the user gravitates toward, e.g. "minimalist"
    #[serde(default)]
    pub preferred_styles: Vec<String>,
    /// Tags that must never appear on selected items
    #[serde(default)]
    pub excluded_tags: Vec<String>,
}

/// A single piece of outfit feedback from the user
///
/// Feedback is keyed by the item ids of the judged outfit so the signal
/// survives outfit deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitFeedback {
    #[serde(default)]
    pub outfit_id: Option<Uuid>,
    pub item_ids: Vec<Uuid>,
    pub liked: bool,
}

// ============================================================================
// Request
// ============================================================================

/// How strictly style tags must match the requested style
///
/// `Semantic` walks the style compatibility graph and grants partial
/// credit to related styles. `Traditional` counts exact tag matches only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Semantic,
    Traditional,
}

/// Input contract for one outfit generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Occasion label, e.g. "office", "wedding_guest", "errands"
    pub occasion: String,
    /// Requested style, e.g. "minimalist", "streetwear"
    pub style: String,
    /// Optional mood descriptor, e.g. "confident"
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub weather: WeatherSnapshot,
    #[serde(default)]
    pub profile: UserProfile,
    /// Recent outfit feedback, newest first
    #[serde(default)]
    pub feedback: Vec<OutfitFeedback>,
    /// Free-text keywords boosted during scoring
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Seed for deterministic tie-breaking. Equal seeds with equal inputs
    /// produce equal outfits.
    #[serde(default)]
    pub seed: u64,
    /// Wardrobe snapshot to compose from
    pub wardrobe: Vec<WardrobeItem>,
}

impl GenerationRequest {
    /// Request with required intent fields set and everything else default
    pub fn new(
        occasion: impl Into<String>,
        style: impl Into<String>,
        wardrobe: Vec<WardrobeItem>,
    ) -> Self {
        GenerationRequest {
            occasion: occasion.into(),
            style: style.into(),
            mood: String::new(),
            weather: WeatherSnapshot::mild(),
            profile: UserProfile::default(),
            feedback: Vec::new(),
            keywords: Vec::new(),
            match_mode: MatchMode::default(),
            seed: 0,
            wardrobe,
        }
    }
}
