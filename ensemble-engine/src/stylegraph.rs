//! Style compatibility graph
//!
//! A symmetric adjacency over canonical style labels. Two styles are
//! compatible when either appears in the other's entry of the static
//! table below; construction inserts both directions, so symmetry holds
//! by construction rather than by table discipline. Built once at engine
//! start and read-only thereafter; lookups are O(1).

use std::collections::{HashMap, HashSet};

/// Static compatibility table: style label → compatible styles
///
/// Labels are canonical tags (see [`crate::normalize`]). The table lists
/// each edge at least once; the constructor mirrors it. 66 labels.
const COMPATIBILITY_TABLE: &[(&str, &[&str])] = &[
    (
        "minimalist",
        &[
            "classic",
            "modern",
            "scandinavian",
            "neutral",
            "monochrome",
            "chic",
            "contemporary",
            "casual",
            "normcore",
            "basic",
        ],
    ),
    (
        "classic",
        &[
            "minimalist",
            "preppy",
            "business_casual",
            "old_money",
            "elegant",
            "polished",
            "smart_casual",
            "parisian",
            "modern",
            "formal",
        ],
    ),
    (
        "business_casual",
        &[
            "classic",
            "smart_casual",
            "preppy",
            "office",
            "polished",
            "business",
            "modern",
            "old_money",
        ],
    ),
    (
        "smart_casual",
        &["business_casual", "classic", "casual", "preppy", "polished", "modern"],
    ),
    ("office", &["business_casual", "business", "polished", "workwear"]),
    ("business", &["business_casual", "office", "polished", "formal"]),
    ("polished", &["classic", "business_casual", "elegant", "old_money", "chic"]),
    (
        "formal",
        &["elegant", "black_tie", "evening", "classic", "glamorous", "cocktail"],
    ),
    ("black_tie", &["formal", "evening", "elegant", "glamorous"]),
    (
        "cocktail",
        &["formal", "elegant", "evening", "glamorous", "romantic", "chic"],
    ),
    ("evening", &["formal", "black_tie", "cocktail", "elegant", "glamorous"]),
    (
        "elegant",
        &[
            "formal",
            "classic",
            "romantic",
            "chic",
            "glamorous",
            "cocktail",
            "evening",
            "black_tie",
            "old_money",
            "parisian",
        ],
    ),
    ("glamorous", &["formal", "evening", "cocktail", "maximalist", "y2k"]),
    (
        "old_money",
        &["classic", "preppy", "business_casual", "elegant", "parisian", "polished"],
    ),
    (
        "preppy",
        &["classic", "old_money", "smart_casual", "nautical", "coastal", "light_academia"],
    ),
    ("parisian", &["chic", "classic", "elegant", "minimalist", "romantic"]),
    (
        "chic",
        &["minimalist", "parisian", "elegant", "modern", "monochrome", "cocktail", "contemporary"],
    ),
    (
        "casual",
        &[
            "minimalist",
            "streetwear",
            "sporty",
            "everyday",
            "relaxed",
            "basic",
            "normcore",
            "smart_casual",
            "athleisure",
            "cozy",
            "denim",
        ],
    ),
    ("everyday", &["casual", "basic", "relaxed", "normcore", "minimalist"]),
    ("basic", &["casual", "everyday", "minimalist", "normcore", "neutral"]),
    ("normcore", &["casual", "basic", "everyday", "vintage"]),
    ("relaxed", &["casual", "cozy", "loungewear", "everyday", "bohemian", "coastal"]),
    ("cozy", &["loungewear", "relaxed", "casual", "scandinavian"]),
    ("loungewear", &["cozy", "relaxed", "athleisure", "casual", "sleepwear"]),
    ("sleepwear", &["loungewear", "cozy"]),
    ("athleisure", &["sporty", "loungewear", "casual", "streetwear", "activewear"]),
    ("sporty", &["athleisure", "casual", "streetwear", "activewear", "skater", "surfer"]),
    ("activewear", &["sporty", "athleisure", "outdoorsy"]),
    (
        "streetwear",
        &["casual", "sporty", "y2k", "grunge", "skater", "edgy", "urban", "athleisure"],
    ),
    ("urban", &["streetwear", "edgy", "modern", "grunge"]),
    ("skater", &["streetwear", "sporty", "grunge", "casual", "y2k"]),
    ("surfer", &["coastal", "sporty", "casual", "bohemian"]),
    ("y2k", &["streetwear", "retro", "glamorous", "colorful", "skater"]),
    ("retro", &["vintage", "y2k", "mod", "colorful"]),
    (
        "vintage",
        &["retro", "normcore", "bohemian", "mod", "grunge", "western", "romantic"],
    ),
    ("mod", &["retro", "vintage", "monochrome"]),
    ("grunge", &["punk", "streetwear", "edgy", "vintage", "skater", "rock"]),
    ("punk", &["grunge", "edgy", "gothic", "rock", "biker"]),
    ("rock", &["grunge", "punk", "biker", "edgy", "western"]),
    ("biker", &["punk", "rock", "edgy", "rugged"]),
    (
        "edgy",
        &["punk", "grunge", "gothic", "streetwear", "biker", "rock", "urban"],
    ),
    ("gothic", &["punk", "edgy", "dark_academia"]),
    ("dark_academia", &["light_academia", "gothic", "vintage", "preppy"]),
    ("light_academia", &["dark_academia", "preppy", "romantic", "vintage"]),
    (
        "romantic",
        &[
            "feminine",
            "elegant",
            "bohemian",
            "vintage",
            "cottagecore",
            "cocktail",
            "parisian",
            "light_academia",
            "pastel",
        ],
    ),
    ("feminine", &["romantic", "pastel", "cottagecore", "elegant"]),
    ("masculine", &["rugged", "workwear", "military", "utility"]),
    ("androgynous", &["minimalist", "modern", "monochrome", "contemporary"]),
    (
        "bohemian",
        &["romantic", "vintage", "cottagecore", "coastal", "relaxed", "eclectic", "western", "surfer", "artsy"],
    ),
    ("cottagecore", &["bohemian", "romantic", "feminine", "pastel"]),
    ("western", &["rugged", "vintage", "bohemian", "denim", "rock", "workwear"]),
    ("denim", &["casual", "western", "workwear"]),
    (
        "workwear",
        &["utility", "rugged", "denim", "military", "masculine", "western", "outdoorsy", "office"],
    ),
    ("utility", &["workwear", "military", "outdoorsy", "rugged", "urban"]),
    ("military", &["utility", "workwear", "rugged", "masculine"]),
    (
        "rugged",
        &["workwear", "outdoorsy", "western", "masculine", "military", "biker", "utility"],
    ),
    ("outdoorsy", &["rugged", "utility", "workwear", "activewear"]),
    (
        "coastal",
        &["resort", "tropical", "bohemian", "preppy", "relaxed", "surfer", "nautical"],
    ),
    ("nautical", &["coastal", "preppy", "resort"]),
    ("resort", &["coastal", "tropical", "nautical", "bohemian"]),
    ("tropical", &["resort", "coastal", "colorful"]),
    ("scandinavian", &["minimalist", "cozy", "neutral", "modern", "monochrome"]),
    (
        "modern",
        &["minimalist", "contemporary", "chic", "classic", "androgynous", "urban", "scandinavian"],
    ),
    ("contemporary", &["modern", "minimalist", "chic", "androgynous"]),
    ("monochrome", &["minimalist", "chic", "mod", "scandinavian", "androgynous", "modern"]),
    ("neutral", &["minimalist", "basic", "scandinavian"]),
    ("pastel", &["feminine", "romantic", "cottagecore", "colorful"]),
    ("colorful", &["maximalist", "eclectic", "y2k", "retro", "tropical", "pastel"]),
    ("maximalist", &["eclectic", "colorful", "glamorous", "artsy"]),
    ("eclectic", &["maximalist", "bohemian", "artsy", "colorful", "vintage"]),
    ("artsy", &["eclectic", "bohemian", "maximalist"]),
];

/// Symmetric style-label adjacency with O(1) lookup
#[derive(Debug, Clone)]
pub struct StyleGraph {
    adjacency: HashMap<String, HashSet<String>>,
}

impl Default for StyleGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleGraph {
    /// Build the graph from the static compatibility table
    pub fn new() -> Self {
        let mut graph = StyleGraph {
            adjacency: HashMap::with_capacity(COMPATIBILITY_TABLE.len()),
        };
        for (style, neighbors) in COMPATIBILITY_TABLE {
            for neighbor in *neighbors {
                graph.insert_pair(style, neighbor);
            }
        }
        graph
    }

    /// Insert one compatibility edge in both directions
    fn insert_pair(&mut self, a: &str, b: &str) {
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    /// True when `a` and `b` are compatible styles (or equal)
    pub fn compatible(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        self.adjacency
            .get(a)
            .map(|set| set.contains(b))
            .unwrap_or(false)
    }

    /// True when `label` is a known style node
    pub fn contains(&self, label: &str) -> bool {
        self.adjacency.contains_key(label)
    }

    /// Compatible neighbors of `label`, if known
    pub fn neighbors(&self, label: &str) -> Option<&HashSet<String>> {
        self.adjacency.get(label)
    }

    /// Number of style nodes
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
