//! Hard filter stage
//!
//! Removes items that cannot legally appear in the outfit: wrong
//! category, occasion-blocked type, weather-inappropriate, excluded by
//! the profile's gender or tag exclusions, or (in tag-checked modes)
//! outside the occasion's widened accepted-tag set. Never errors; an
//! empty candidate pool is a signal to the degradation controller.

use std::collections::BTreeMap;

use tracing::debug;

use ensemble_common::{
    Category, EngineLimits, GenderExpression, GenerationRequest, WeatherCondition,
    WeatherSnapshot,
};

use crate::normalize::{NormalizedItem, NormalizedRequest};
use crate::occasion::OccasionProfile;

/// Fuzzy-match threshold for widened tag acceptance
const FUZZY_ACCEPT_THRESHOLD: f64 = 0.85;

/// Materials too heavy for hot weather
const HEAVY_MATERIALS: &[&str] = &["wool", "fleece", "down", "shearling", "cashmere"];

/// Materials too light for cold weather
const LIGHT_MATERIALS: &[&str] = &["linen", "mesh", "chiffon"];

/// Shoe materials that do not survive rain or snow
const WET_WEATHER_EXCLUDED: &[&str] = &["suede", "canvas"];

// ============================================================================
// Filter Mode
// ============================================================================

/// How aggressively the tag-acceptance check prunes candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Item tags must intersect the occasion's accepted set
    Strict,
    /// Strict acceptance plus fuzzy and name-substring matching
    Widened,
    /// No tag acceptance; category, weather, and exclusions only
    RuleBased,
}

// ============================================================================
// Candidate Pools
// ============================================================================

/// Per-category candidate lists, as indices into the normalized wardrobe
///
/// Deterministic iteration order (categories ascend in assembly-priority
/// order, indices preserve wardrobe order).
#[derive(Debug, Clone, Default)]
pub struct CandidatePools {
    pub by_category: BTreeMap<Category, Vec<usize>>,
}

impl CandidatePools {
    /// Candidate indices for one category; empty when none survived
    pub fn candidates(&self, category: Category) -> &[usize] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total candidates across all categories
    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Build per-category candidate pools for one tier attempt
pub fn filter_candidates(
    items: &[NormalizedItem],
    request: &GenerationRequest,
    norm: &NormalizedRequest,
    profile: &OccasionProfile,
    limits: &EngineLimits,
    mode: FilterMode,
) -> CandidatePools {
    let mut pools = CandidatePools::default();
    for (index, item) in items.iter().enumerate() {
        if !passes_exclusions(item, request, norm, profile) {
            continue;
        }
        if !weather_ok(item, &request.weather, limits) {
            continue;
        }
        if mode != FilterMode::RuleBased && !tag_accepted(item, norm, profile, mode) {
            continue;
        }
        pools
            .by_category
            .entry(item.item.category)
            .or_default()
            .push(index);
    }
    debug!(
        occasion = profile.label,
        mode = ?mode,
        candidates = pools.total(),
        "hard filter complete"
    );
    pools
}

/// Gender, profile tag, and occasion blocked-type exclusions
fn passes_exclusions(
    item: &NormalizedItem,
    request: &GenerationRequest,
    norm: &NormalizedRequest,
    profile: &OccasionProfile,
) -> bool {
    if let (Some(wanted), Some(expression)) = (request.profile.gender, item.item.gender) {
        if expression != GenderExpression::Unisex && expression != wanted {
            return false;
        }
    }
    for blocked in profile.blocked_types {
        if mentions_type(item, blocked) {
            return false;
        }
    }
    for excluded in &norm.excluded_tags {
        if mentions_type(item, excluded) {
            return false;
        }
    }
    true
}

/// True when the item's tags or name text mention `kind`
///
/// `kind` is a canonical tag; name text is matched with the underscores
/// widened back to spaces so "dress shoes" matches `dress_shoes`. Text
/// matching is whole-word, so "swimsuit" does not mention `suit`.
fn mentions_type(item: &NormalizedItem, kind: &str) -> bool {
    if item.has_tag(kind) || item.tags.materials.iter().any(|t| t == kind) {
        return true;
    }
    let spaced = kind.replace('_', " ");
    contains_phrase(&item.text, &spaced)
}

/// Whole-word phrase search over free text
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

/// Temperature, season, and condition appropriateness
fn weather_ok(item: &NormalizedItem, weather: &WeatherSnapshot, limits: &EngineLimits) -> bool {
    let t = weather.temperature_f;
    let seasons = &item.tags.seasons;
    if !seasons.is_empty() {
        let summer_only = seasons.iter().all(|s| s == "summer");
        let winter_only = seasons.iter().all(|s| s == "winter");
        if summer_only && t <= limits.cold_threshold_f {
            return false;
        }
        if winter_only && t >= limits.hot_threshold_f {
            return false;
        }
    }
    if t >= limits.hot_threshold_f
        && item
            .tags
            .materials
            .iter()
            .any(|m| HEAVY_MATERIALS.contains(&m.as_str()))
    {
        return false;
    }
    if t <= limits.cold_threshold_f
        && item
            .tags
            .materials
            .iter()
            .any(|m| LIGHT_MATERIALS.contains(&m.as_str()))
    {
        return false;
    }
    if matches!(weather.condition, WeatherCondition::Rain | WeatherCondition::Snow)
        && item.item.category == Category::Shoes
        && item
            .tags
            .materials
            .iter()
            .any(|m| WET_WEATHER_EXCLUDED.contains(&m.as_str()))
    {
        return false;
    }
    true
}

/// Widened accepted-tag check for the occasion
fn tag_accepted(
    item: &NormalizedItem,
    norm: &NormalizedRequest,
    profile: &OccasionProfile,
    mode: FilterMode,
) -> bool {
    // Exact acceptance: any style/occasion/mood tag in the accepted set,
    // or the item explicitly lists the requested occasion
    if item.match_tags().any(|tag| profile.accepts_tag(tag)) {
        return true;
    }
    if !norm.occasion.is_empty() && item.has_tag(&norm.occasion) {
        return true;
    }
    if mode != FilterMode::Widened {
        return false;
    }
    // Widened acceptance: near-miss tags and accepted-tag mentions in the
    // item's name or description
    for tag in item.match_tags() {
        for accepted in profile.accepted_tags {
            if strsim::normalized_levenshtein(tag, accepted) >= FUZZY_ACCEPT_THRESHOLD {
                return true;
            }
        }
    }
    profile
        .accepted_tags
        .iter()
        .any(|accepted| item.text.contains(&accepted.replace('_', " ")))
}
