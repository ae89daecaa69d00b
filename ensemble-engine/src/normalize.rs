//! Tag normalization
//!
//! Canonicalizes free-form tags on wardrobe items and requests before any
//! comparison, so matching never depends on casing or separator style:
//! lower-cased, separator characters folded to underscores, synonyms
//! collapsed, duplicates removed. Pure and stateless. Malformed tags
//! (empty after canonicalization, or absurdly long) are dropped and
//! counted, never raised.

use ensemble_common::{Formality, GenerationRequest, WardrobeItem};

/// Canonical tags longer than this are junk input, not vocabulary
const MAX_TAG_LEN: usize = 48;

// ============================================================================
// Tag Canonicalization
// ============================================================================

/// Canonicalize one raw tag
///
/// # Algorithm
/// 1. Lowercase and trim
/// 2. Fold separators (space, hyphen, slash, dot, plus) to underscores
/// 3. Drop every other non-alphanumeric character
/// 4. Collapse runs of underscores, trim edge underscores
/// 5. Fold known synonyms to their canonical spelling
///
/// # Returns
/// `None` when nothing usable remains; callers count these as dropped.
pub fn canonical_tag(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut last_underscore = true; // suppress leading underscore
    for ch in raw.trim().chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            out.push(lower);
            last_underscore = false;
        } else if matches!(lower, ' ' | '-' | '/' | '.' | '+' | '_') {
            if !last_underscore {
                out.push('_');
                last_underscore = true;
            }
        }
        // Anything else (punctuation, emoji, control chars) is dropped
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() || out.len() > MAX_TAG_LEN || !out.bytes().any(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(tag_alias(&out).to_string())
}

/// Fold common synonyms and spelling variants to one canonical tag
fn tag_alias(tag: &str) -> &str {
    match tag {
        "boho" | "boho_chic" => "bohemian",
        "biz_casual" | "businesscasual" => "business_casual",
        "street_wear" | "street" => "streetwear",
        "athletic" | "sport" | "sports" => "sporty",
        "minimal" | "minimalistic" => "minimalist",
        "comfy" => "cozy",
        "dressy" | "fancy" => "elegant",
        "office_wear" => "office",
        "autumn" => "fall",
        "tshirt" | "tee" => "t_shirt",
        "gymwear" | "gym_wear" => "athleisure",
        _ => tag,
    }
}

/// Canonicalize a tag list, deduplicating while preserving first-seen order
///
/// Increments `dropped` for each tag that canonicalization rejects.
pub fn normalize_tag_list(raw: &[String], dropped: &mut usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        match canonical_tag(tag) {
            Some(canonical) => {
                if !out.contains(&canonical) {
                    out.push(canonical);
                }
            }
            None => *dropped += 1,
        }
    }
    out
}

// ============================================================================
// Normalized Item
// ============================================================================

/// Canonical tag sets of one wardrobe item
#[derive(Debug, Clone, Default)]
pub struct NormalizedTags {
    pub styles: Vec<String>,
    pub occasions: Vec<String>,
    pub moods: Vec<String>,
    pub seasons: Vec<String>,
    pub materials: Vec<String>,
    pub colors: Vec<String>,
}

/// A wardrobe item with canonical tags and resolved formality
///
/// The engine works exclusively on this shape after normalization; the
/// original item rides along for output construction.
#[derive(Debug, Clone)]
pub struct NormalizedItem {
    pub item: WardrobeItem,
    pub tags: NormalizedTags,
    /// Explicit formality, or the highest level inferred from style and
    /// occasion tags, or `Casual` when nothing signals a level
    pub formality: Formality,
    /// Lowercased name and description, for keyword matching
    pub text: String,
}

impl NormalizedItem {
    /// True when any style, occasion, or mood tag equals `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.styles.iter().any(|t| t == tag)
            || self.tags.occasions.iter().any(|t| t == tag)
            || self.tags.moods.iter().any(|t| t == tag)
    }

    /// Style, occasion, and mood tags as one iterator
    pub fn match_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .styles
            .iter()
            .chain(self.tags.occasions.iter())
            .chain(self.tags.moods.iter())
            .map(String::as_str)
    }
}

/// Normalize one wardrobe item
///
/// Returns the normalized item and how many of its tags were dropped.
pub fn normalize_item(item: &WardrobeItem) -> (NormalizedItem, usize) {
    let mut dropped = 0usize;
    let styles = normalize_tag_list(&item.styles, &mut dropped);
    let occasions = normalize_tag_list(&item.occasions, &mut dropped);
    let moods = normalize_tag_list(&item.moods, &mut dropped);
    let seasons = normalize_tag_list(&item.seasons, &mut dropped);
    let materials = normalize_tag_list(&item.materials, &mut dropped);

    let mut color_raw: Vec<String> = Vec::with_capacity(1 + item.dominant_colors.len());
    if !item.color.is_empty() {
        color_raw.push(item.color.clone());
    }
    color_raw.extend(item.dominant_colors.iter().cloned());
    let colors = normalize_tag_list(&color_raw, &mut dropped);

    let formality = item.formality.unwrap_or_else(|| {
        styles
            .iter()
            .chain(occasions.iter())
            .filter_map(|tag| Formality::from_tag(tag))
            .max()
            .unwrap_or(Formality::Casual)
    });

    let mut text = item.name.to_lowercase();
    if !item.description.is_empty() {
        text.push(' ');
        text.push_str(&item.description.to_lowercase());
    }

    let normalized = NormalizedItem {
        item: item.clone(),
        tags: NormalizedTags {
            styles,
            occasions,
            moods,
            seasons,
            materials,
            colors,
        },
        formality,
        text,
    };
    (normalized, dropped)
}

/// Normalize a full wardrobe snapshot
///
/// # Returns
/// The normalized items and the total count of dropped tags across the
/// snapshot (surfaced later as a `DroppedTags` warning).
pub fn normalize_wardrobe(items: &[WardrobeItem]) -> (Vec<NormalizedItem>, usize) {
    let mut total_dropped = 0usize;
    let mut normalized = Vec::with_capacity(items.len());
    for item in items {
        let (norm, dropped) = normalize_item(item);
        total_dropped += dropped;
        normalized.push(norm);
    }
    (normalized, total_dropped)
}

// ============================================================================
// Normalized Request
// ============================================================================

/// Request intent fields after canonicalization
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub occasion: String,
    pub style: String,
    pub mood: String,
    pub keywords: Vec<String>,
    /// Profile tags that must never appear on a selected item
    pub excluded_tags: Vec<String>,
    pub dropped: usize,
}

/// Normalize the intent fields of a request
///
/// Empty or malformed occasion/style canonicalize to the empty string;
/// downstream lookup treats that as an unknown label.
pub fn normalize_request(request: &GenerationRequest) -> NormalizedRequest {
    let mut dropped = 0usize;
    let occasion = canonical_tag(&request.occasion).unwrap_or_default();
    let style = canonical_tag(&request.style).unwrap_or_default();
    let mood = canonical_tag(&request.mood).unwrap_or_default();
    if !request.occasion.is_empty() && occasion.is_empty() {
        dropped += 1;
    }
    if !request.style.is_empty() && style.is_empty() {
        dropped += 1;
    }
    if !request.mood.is_empty() && mood.is_empty() {
        dropped += 1;
    }
    let keywords = normalize_tag_list(&request.keywords, &mut dropped);
    let excluded_tags = normalize_tag_list(&request.profile.excluded_tags, &mut dropped);
    NormalizedRequest {
        occasion,
        style,
        mood,
        keywords,
        excluded_tags,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_common::Category;

    #[test]
    fn test_canonical_tag_folds_case_and_separators() {
        assert_eq!(canonical_tag("Business Casual"), Some("business_casual".into()));
        assert_eq!(canonical_tag("  Smart-Casual "), Some("smart_casual".into()));
        assert_eq!(canonical_tag("DATE/NIGHT"), Some("date_night".into()));
        assert_eq!(canonical_tag("y2K"), Some("y2k".into()));
    }

    #[test]
    fn test_canonical_tag_collapses_underscore_runs() {
        assert_eq!(canonical_tag("old -- money"), Some("old_money".into()));
        assert_eq!(canonical_tag("__edgy__"), Some("edgy".into()));
    }

    #[test]
    fn test_canonical_tag_rejects_junk() {
        assert_eq!(canonical_tag(""), None);
        assert_eq!(canonical_tag("   "), None);
        assert_eq!(canonical_tag("!!!"), None);
        assert_eq!(canonical_tag(&"x".repeat(200)), None);
    }

    #[test]
    fn test_alias_folding() {
        assert_eq!(canonical_tag("Boho"), Some("bohemian".into()));
        assert_eq!(canonical_tag("street wear"), Some("streetwear".into()));
        assert_eq!(canonical_tag("Autumn"), Some("fall".into()));
        assert_eq!(canonical_tag("comfy"), Some("cozy".into()));
    }

    #[test]
    fn test_tag_list_dedup_and_drop_count() {
        let raw = vec![
            "Casual".to_string(),
            "casual".to_string(),
            "CASUAL ".to_string(),
            "???".to_string(),
            "sporty".to_string(),
        ];
        let mut dropped = 0;
        let tags = normalize_tag_list(&raw, &mut dropped);
        assert_eq!(tags, vec!["casual".to_string(), "sporty".to_string()]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_item_formality_explicit_wins() {
        let mut item = WardrobeItem::new("Silk shirt", Category::Top);
        item.styles = vec!["formal".into()];
        item.formality = Some(Formality::Casual);
        let (norm, _) = normalize_item(&item);
        assert_eq!(norm.formality, Formality::Casual);
    }

    #[test]
    fn test_item_formality_inferred_takes_max() {
        let mut item = WardrobeItem::new("Tuxedo jacket", Category::Outerwear);
        item.styles = vec!["classic".into(), "Black Tie".into()];
        let (norm, _) = normalize_item(&item);
        assert_eq!(norm.formality, Formality::Formal);
    }

    #[test]
    fn test_item_formality_defaults_to_casual() {
        let item = WardrobeItem::new("Mystery garment", Category::Top);
        let (norm, _) = normalize_item(&item);
        assert_eq!(norm.formality, Formality::Casual);
    }

    #[test]
    fn test_item_text_includes_description() {
        let mut item = WardrobeItem::new("Rain Shell", Category::Outerwear);
        item.description = "Waterproof GORE-TEX".into();
        let (norm, _) = normalize_item(&item);
        assert!(norm.text.contains("rain shell"));
        assert!(norm.text.contains("gore-tex"));
    }

    #[test]
    fn test_request_normalization() {
        let mut request = GenerationRequest::new("Date Night", "Old Money", vec![]);
        request.keywords = vec!["Linen".into(), "linen".into(), "".into()];
        let norm = normalize_request(&request);
        assert_eq!(norm.occasion, "date_night");
        assert_eq!(norm.style, "old_money");
        assert_eq!(norm.keywords, vec!["linen".to_string()]);
        assert_eq!(norm.dropped, 1);
    }
}
