//! Shared fixtures for engine integration tests
//!
//! Not every test binary uses every fixture.
#![allow(dead_code)]

use ensemble_common::{Category, GenerationRequest, WardrobeItem, WeatherCondition};

/// Item with the same tag as style and occasion
pub fn tagged_item(name: &str, category: Category, tag: &str) -> WardrobeItem {
    let mut item = WardrobeItem::new(name, category);
    item.styles = vec![tag.to_string()];
    item.occasions = vec![tag.to_string()];
    item
}

/// Item with explicit style tags only
pub fn styled_item(name: &str, category: Category, styles: &[&str]) -> WardrobeItem {
    let mut item = WardrobeItem::new(name, category);
    item.styles = styles.iter().map(|s| s.to_string()).collect();
    item
}

/// Item with explicit occasion tags only
pub fn occasion_item(name: &str, category: Category, occasions: &[&str]) -> WardrobeItem {
    let mut item = WardrobeItem::new(name, category);
    item.occasions = occasions.iter().map(|s| s.to_string()).collect();
    item
}

/// The three-piece casual wardrobe from the baseline scenario
pub fn casual_wardrobe() -> Vec<WardrobeItem> {
    let mut tee = tagged_item("White T-shirt", Category::Top, "casual");
    tee.color = "white".to_string();
    let mut jeans = tagged_item("Blue jeans", Category::Bottom, "casual");
    jeans.color = "blue".to_string();
    let mut sneakers = tagged_item("White sneakers", Category::Shoes, "casual");
    sneakers.color = "white".to_string();
    vec![tee, jeans, sneakers]
}

/// A wardrobe of formal pieces only (suit, dress shirt, dress shoes)
pub fn formal_only_wardrobe() -> Vec<WardrobeItem> {
    vec![
        styled_item("Navy suit jacket", Category::Outerwear, &["formal"]),
        styled_item("White dress shirt", Category::Top, &["formal"]),
        styled_item("Navy suit trousers", Category::Bottom, &["formal"]),
        styled_item("Black dress shoes", Category::Shoes, &["formal"]),
    ]
}

/// Request with weather fields set inline
pub fn request_with_weather(
    occasion: &str,
    style: &str,
    wardrobe: Vec<WardrobeItem>,
    temperature_f: f64,
    condition: WeatherCondition,
) -> GenerationRequest {
    let mut request = GenerationRequest::new(occasion, style, wardrobe);
    request.weather.temperature_f = temperature_f;
    request.weather.condition = condition;
    request
}
