//! Degradation ladder behavior through the public engine API

mod helpers;

use ensemble_common::{
    Category, GenerationRequest, GenerationTier, OutfitWarning, WardrobeItem,
};
use ensemble_engine::{GenerationError, OutfitEngine};

use helpers::{casual_wardrobe, tagged_item};

fn tier_rank(tier: GenerationTier) -> u8 {
    match tier {
        GenerationTier::Strict => 0,
        GenerationTier::Relaxed => 1,
        GenerationTier::RuleBased => 2,
        GenerationTier::MinimalFallback => 3,
    }
}

#[test]
fn test_empty_wardrobe_is_insufficient() {
    let engine = OutfitEngine::with_defaults();
    let request = GenerationRequest::new("casual", "minimalist", vec![]);
    let err = engine.generate(&request).unwrap_err();
    assert_eq!(err, GenerationError::InsufficientWardrobe);
}

#[test]
fn test_fully_tagged_wardrobe_stays_strict() {
    let engine = OutfitEngine::with_defaults();
    let request = GenerationRequest::new("casual", "minimalist", casual_wardrobe());
    let outfit = engine.generate(&request).unwrap();
    assert_eq!(outfit.tier, GenerationTier::Strict);
}

#[test]
fn test_name_only_wardrobe_reaches_relaxed() {
    // Items carry no tags; the widened filter still matches "casual"
    // in the item names
    let engine = OutfitEngine::with_defaults();
    let wardrobe = vec![
        WardrobeItem::new("Casual tee", Category::Top),
        WardrobeItem::new("Casual jeans", Category::Bottom),
        WardrobeItem::new("Casual sneakers", Category::Shoes),
    ];
    let request = GenerationRequest::new("casual", "minimalist", wardrobe);
    let outfit = engine.generate(&request).unwrap();
    assert_eq!(outfit.tier, GenerationTier::Relaxed);
}

#[test]
fn test_untagged_wardrobe_reaches_rule_based() {
    let engine = OutfitEngine::with_defaults();
    let wardrobe = vec![
        WardrobeItem::new("Plain tee", Category::Top),
        WardrobeItem::new("Plain trousers", Category::Bottom),
        WardrobeItem::new("Plain shoes", Category::Shoes),
    ];
    let request = GenerationRequest::new("casual", "minimalist", wardrobe);
    let outfit = engine.generate(&request).unwrap();
    assert_eq!(outfit.tier, GenerationTier::RuleBased);
    assert!(outfit.has_warning(&OutfitWarning::StyleScoringSkipped));
}

#[test]
fn test_missing_category_reaches_minimal_fallback() {
    // No shoes anywhere in the wardrobe: only placeholders can complete
    // the outfit
    let engine = OutfitEngine::with_defaults();
    let wardrobe = vec![
        tagged_item("Tee", Category::Top, "casual"),
        tagged_item("Jeans", Category::Bottom, "casual"),
    ];
    let real_ids: Vec<_> = wardrobe.iter().map(|i| i.id).collect();
    let request = GenerationRequest::new("casual", "minimalist", wardrobe);
    let outfit = engine.generate(&request).unwrap();

    assert_eq!(outfit.tier, GenerationTier::MinimalFallback);
    assert!(outfit.items.iter().any(|i| i.is_fallback));
    assert!(outfit
        .warnings
        .iter()
        .any(|w| matches!(w, OutfitWarning::PlaceholderItems { count } if *count >= 1)));
    // Real items still participate alongside placeholders
    for id in real_ids {
        assert!(outfit.contains_item(id));
    }
    // Shoes slot is covered by a placeholder
    let shoes: Vec<_> = outfit
        .items
        .iter()
        .filter(|i| i.category == Category::Shoes)
        .collect();
    assert_eq!(shoes.len(), 1);
    assert!(shoes[0].is_fallback);
}

#[test]
fn test_confidence_decreases_down_the_ladder() {
    // Four wardrobes engineered to land on each successive tier
    let engine = OutfitEngine::with_defaults();
    let wardrobes = vec![
        casual_wardrobe(),
        vec![
            WardrobeItem::new("Casual tee", Category::Top),
            WardrobeItem::new("Casual jeans", Category::Bottom),
            WardrobeItem::new("Casual sneakers", Category::Shoes),
        ],
        vec![
            WardrobeItem::new("Plain tee", Category::Top),
            WardrobeItem::new("Plain trousers", Category::Bottom),
            WardrobeItem::new("Plain shoes", Category::Shoes),
        ],
        vec![WardrobeItem::new("Plain tee", Category::Top)],
    ];

    let mut results = Vec::new();
    for wardrobe in wardrobes {
        let request = GenerationRequest::new("casual", "minimalist", wardrobe);
        let outfit = engine.generate(&request).unwrap();
        results.push((outfit.tier, outfit.confidence));
    }

    assert_eq!(results[0].0, GenerationTier::Strict);
    assert_eq!(results[1].0, GenerationTier::Relaxed);
    assert_eq!(results[2].0, GenerationTier::RuleBased);
    assert_eq!(results[3].0, GenerationTier::MinimalFallback);

    for pair in results.windows(2) {
        assert!(tier_rank(pair[0].0) < tier_rank(pair[1].0));
        assert!(
            pair[0].1 > pair[1].1,
            "confidence must strictly decrease down the ladder: {:?}",
            results
        );
    }
}

#[test]
fn test_fallback_outfit_meets_minimum_size() {
    let engine = OutfitEngine::with_defaults();
    let wardrobe = vec![tagged_item("Tee", Category::Top, "casual")];
    let request = GenerationRequest::new("casual", "minimalist", wardrobe);
    let outfit = engine.generate(&request).unwrap();

    assert_eq!(outfit.tier, GenerationTier::MinimalFallback);
    assert!(outfit.items.len() >= 3);
    assert!(outfit.confidence > 0.0 && outfit.confidence <= 0.5);
}

#[test]
fn test_placeholder_names_avoid_blocked_vocabulary() {
    // Loungewear blocks formal garment types; placeholders must not
    // reintroduce them by name
    let engine = OutfitEngine::with_defaults();
    let wardrobe = vec![tagged_item("Soft tee", Category::Top, "loungewear")];
    let request = GenerationRequest::new("loungewear", "cozy", wardrobe);
    let outfit = engine.generate(&request).unwrap();

    assert_eq!(outfit.tier, GenerationTier::MinimalFallback);
    for item in outfit.items.iter().filter(|i| i.is_fallback) {
        let name = item.name.to_lowercase();
        for kind in ["suit", "blazer", "dress shirt", "dress shoes", "tie"] {
            assert!(
                !name.contains(kind),
                "placeholder '{}' uses blocked vocabulary",
                item.name
            );
        }
    }
}

#[test]
fn test_tier_counters_track_degradation() {
    let engine = OutfitEngine::with_defaults();

    let strict = GenerationRequest::new("casual", "minimalist", casual_wardrobe());
    engine.generate(&strict).unwrap();

    let fallback = GenerationRequest::new(
        "casual",
        "minimalist",
        vec![tagged_item("Tee", Category::Top, "casual")],
    );
    engine.generate(&fallback).unwrap();

    let metrics = engine.metrics();
    assert_eq!(metrics.requests, 2);
    assert_eq!(metrics.successes, 2);
    assert_eq!(metrics.tiers.strict, 1);
    assert_eq!(metrics.tiers.minimal_fallback, 1);
}
