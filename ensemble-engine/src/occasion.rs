//! Per-occasion filtering profiles
//!
//! Static tables describing what each occasion demands of an outfit:
//! which category slots are required (with alternatives, e.g. a dress may
//! stand in for top + bottom), which tags are accepted by the hard
//! filter, which item types are hard-blocked, the target formality, and
//! whether the occasion is casual-like (which lets scoring skip the
//! quadratic harmony pass). Accepted-tag sets are deliberately wide —
//! at least nine related tags per occasion — so the candidate pool is
//! not starved by exact-label matching.
//!
//! Unknown occasions resolve to the casual profile; the controlled
//! vocabulary is forgiving, not fatal.

use ensemble_common::{Category, Formality};

// ============================================================================
// Slot Requirements
// ============================================================================

/// One required outfit slot, with categories that may stand in
///
/// A pick of the primary category or any alternative satisfies the slot.
/// A single item may satisfy multiple slots (a dress covers the top and
/// bottom slots at once).
#[derive(Debug, Clone, Copy)]
pub struct SlotRequirement {
    pub primary: Category,
    pub alternatives: &'static [Category],
}

impl SlotRequirement {
    /// True when an item of `category` satisfies this slot
    pub fn accepts(&self, category: Category) -> bool {
        self.primary == category || self.alternatives.contains(&category)
    }
}

/// Top + bottom-or-dress + shoes: the standard silhouette
const STANDARD_SLOTS: &[SlotRequirement] = &[
    SlotRequirement {
        primary: Category::Top,
        alternatives: &[Category::Dress],
    },
    SlotRequirement {
        primary: Category::Bottom,
        alternatives: &[Category::Dress],
    },
    SlotRequirement {
        primary: Category::Shoes,
        alternatives: &[],
    },
];

/// Top + bottom + shoes with no dress alternative (athletic wear)
const ATHLETIC_SLOTS: &[SlotRequirement] = &[
    SlotRequirement {
        primary: Category::Top,
        alternatives: &[],
    },
    SlotRequirement {
        primary: Category::Bottom,
        alternatives: &[],
    },
    SlotRequirement {
        primary: Category::Shoes,
        alternatives: &[],
    },
];

// ============================================================================
// Occasion Profile
// ============================================================================

/// Filtering and validation profile for one occasion
#[derive(Debug)]
pub struct OccasionProfile {
    /// Canonical occasion label
    pub label: &'static str,
    /// Formality the occasion expects; items more than one ordinal step
    /// away take the blocking penalty during scoring
    pub formality: Formality,
    /// Category slots an outfit for this occasion must fill
    pub required_slots: &'static [SlotRequirement],
    /// Widened tag set the hard filter accepts for this occasion
    pub accepted_tags: &'static [&'static str],
    /// Item types excluded outright, matched against tags and name text
    pub blocked_types: &'static [&'static str],
    /// Casual-like occasions skip pairwise harmony scoring
    pub casual_like: bool,
}

impl OccasionProfile {
    /// True when `tag` is in this occasion's accepted set
    pub fn accepts_tag(&self, tag: &str) -> bool {
        self.accepted_tags.contains(&tag)
    }
}

static CASUAL: OccasionProfile = OccasionProfile {
    label: "casual",
    formality: Formality::Casual,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "casual",
        "everyday",
        "relaxed",
        "streetwear",
        "minimalist",
        "sporty",
        "basic",
        "normcore",
        "weekend",
        "errands",
        "denim",
        "cozy",
    ],
    blocked_types: &["tuxedo", "gown", "black_tie", "tailcoat"],
    casual_like: true,
};

static LOUNGEWEAR: OccasionProfile = OccasionProfile {
    label: "loungewear",
    formality: Formality::Loungewear,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "loungewear",
        "lounge",
        "cozy",
        "relaxed",
        "casual",
        "sweats",
        "sleepwear",
        "athleisure",
        "soft",
        "everyday",
        "knit",
        "home",
    ],
    blocked_types: &[
        "suit",
        "blazer",
        "dress_shirt",
        "dress_shoes",
        "tie",
        "oxford",
        "heels",
        "gown",
        "tuxedo",
        "trench",
    ],
    casual_like: true,
};

static OFFICE: OccasionProfile = OccasionProfile {
    label: "office",
    formality: Formality::BusinessCasual,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "office",
        "work",
        "business",
        "business_casual",
        "smart_casual",
        "professional",
        "polished",
        "preppy",
        "classic",
        "formal",
        "blazer",
        "tailored",
    ],
    blocked_types: &[
        "sweats",
        "pajama",
        "sleepwear",
        "swim",
        "flip_flops",
        "tank_top",
        "crop_top",
        "gym",
    ],
    casual_like: false,
};

static FORMAL: OccasionProfile = OccasionProfile {
    label: "formal",
    formality: Formality::Formal,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "formal",
        "black_tie",
        "elegant",
        "evening",
        "cocktail",
        "classic",
        "glamorous",
        "polished",
        "suiting",
        "tailored",
        "luxury",
    ],
    blocked_types: &[
        "sweats",
        "hoodie",
        "pajama",
        "sleepwear",
        "flip_flops",
        "gym",
        "graphic_tee",
    ],
    casual_like: false,
};

static DATE_NIGHT: OccasionProfile = OccasionProfile {
    label: "date_night",
    formality: Formality::BusinessCasual,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "date_night",
        "date",
        "dinner",
        "evening",
        "romantic",
        "elegant",
        "cocktail",
        "chic",
        "night_out",
        "party",
        "stylish",
        "polished",
    ],
    blocked_types: &["pajama", "sweats", "gym", "sleepwear"],
    casual_like: false,
};

static ATHLETIC: OccasionProfile = OccasionProfile {
    label: "athletic",
    formality: Formality::Casual,
    required_slots: ATHLETIC_SLOTS,
    accepted_tags: &[
        "sporty",
        "athleisure",
        "gym",
        "workout",
        "running",
        "training",
        "activewear",
        "exercise",
        "performance",
        "track",
        "yoga",
    ],
    blocked_types: &[
        "suit",
        "blazer",
        "dress_shirt",
        "dress_shoes",
        "tie",
        "heels",
        "gown",
        "oxford",
        "loafers",
        "tuxedo",
    ],
    casual_like: true,
};

static PARTY: OccasionProfile = OccasionProfile {
    label: "party",
    formality: Formality::Casual,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "party",
        "night_out",
        "club",
        "festive",
        "fun",
        "glamorous",
        "sequin",
        "bold",
        "colorful",
        "y2k",
        "disco",
        "dancing",
    ],
    blocked_types: &["pajama", "sweats", "gym", "sleepwear"],
    casual_like: false,
};

static WEDDING_GUEST: OccasionProfile = OccasionProfile {
    label: "wedding_guest",
    formality: Formality::Formal,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "wedding",
        "wedding_guest",
        "formal",
        "elegant",
        "cocktail",
        "garden_party",
        "evening",
        "romantic",
        "chic",
        "polished",
        "floral",
        "pastel",
    ],
    blocked_types: &[
        "jeans",
        "sweats",
        "hoodie",
        "pajama",
        "flip_flops",
        "gym",
        "graphic_tee",
        "denim",
    ],
    casual_like: false,
};

static TRAVEL: OccasionProfile = OccasionProfile {
    label: "travel",
    formality: Formality::Casual,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "travel",
        "airport",
        "cozy",
        "casual",
        "relaxed",
        "layers",
        "athleisure",
        "everyday",
        "practical",
        "streetwear",
        "minimalist",
        "versatile",
    ],
    blocked_types: &["gown", "tuxedo", "black_tie", "heels"],
    casual_like: true,
};

static BRUNCH: OccasionProfile = OccasionProfile {
    label: "brunch",
    formality: Formality::Casual,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "brunch",
        "daytime",
        "casual",
        "chic",
        "romantic",
        "spring",
        "feminine",
        "preppy",
        "smart_casual",
        "relaxed",
        "floral",
        "weekend",
    ],
    blocked_types: &["tuxedo", "gown", "black_tie", "pajama", "gym"],
    casual_like: false,
};

static INTERVIEW: OccasionProfile = OccasionProfile {
    label: "interview",
    formality: Formality::BusinessCasual,
    required_slots: STANDARD_SLOTS,
    accepted_tags: &[
        "interview",
        "office",
        "business",
        "business_casual",
        "professional",
        "polished",
        "formal",
        "classic",
        "smart_casual",
        "tailored",
        "conservative",
        "work",
    ],
    blocked_types: &[
        "sweats",
        "pajama",
        "gym",
        "flip_flops",
        "crop_top",
        "graphic_tee",
        "ripped",
        "tank_top",
    ],
    casual_like: false,
};

/// Resolve the profile for a canonical occasion label
///
/// Common aliases fold to their profile; anything unrecognized gets the
/// casual profile, which has the most forgiving accepted-tag set.
pub fn profile_for(occasion: &str) -> &'static OccasionProfile {
    match occasion {
        "casual" | "everyday" | "weekend" | "errands" => &CASUAL,
        "loungewear" | "lounge" | "home" | "lazy_day" => &LOUNGEWEAR,
        "office" | "work" | "business" | "business_casual" | "meeting" => &OFFICE,
        "formal" | "black_tie" | "gala" | "evening" => &FORMAL,
        "date_night" | "date" | "dinner" | "night_out" => &DATE_NIGHT,
        "athletic" | "workout" | "gym" | "running" | "sporty" => &ATHLETIC,
        "party" | "club" | "birthday" | "festival" => &PARTY,
        "wedding_guest" | "wedding" => &WEDDING_GUEST,
        "travel" | "airport" | "vacation" => &TRAVEL,
        "brunch" | "daytime" => &BRUNCH,
        "interview" => &INTERVIEW,
        _ => &CASUAL,
    }
}

/// All defined profiles, for table-wide assertions
#[cfg(test)]
fn all_profiles() -> [&'static OccasionProfile; 11] {
    [
        &CASUAL,
        &LOUNGEWEAR,
        &OFFICE,
        &FORMAL,
        &DATE_NIGHT,
        &ATHLETIC,
        &PARTY,
        &WEDDING_GUEST,
        &TRAVEL,
        &BRUNCH,
        &INTERVIEW,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_profile_has_wide_accepted_set() {
        for profile in all_profiles() {
            assert!(
                profile.accepted_tags.len() >= 9,
                "{} accepts only {} tags; widened sets need at least 9",
                profile.label,
                profile.accepted_tags.len()
            );
        }
    }

    #[test]
    fn test_every_profile_requires_a_full_silhouette() {
        for profile in all_profiles() {
            assert_eq!(
                profile.required_slots.len(),
                3,
                "{} must require top, bottom, and shoes slots",
                profile.label
            );
            assert!(profile
                .required_slots
                .iter()
                .any(|s| s.primary == Category::Shoes));
        }
    }

    #[test]
    fn test_loungewear_blocks_formal_items() {
        let profile = profile_for("loungewear");
        for blocked in ["suit", "dress_shoes", "tie", "blazer", "dress_shirt"] {
            assert!(
                profile.blocked_types.contains(&blocked),
                "loungewear must block '{blocked}'"
            );
        }
    }

    #[test]
    fn test_unknown_occasion_resolves_to_casual() {
        assert_eq!(profile_for("space_walk").label, "casual");
        assert_eq!(profile_for("").label, "casual");
    }

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(profile_for("work").label, "office");
        assert_eq!(profile_for("wedding").label, "wedding_guest");
        assert_eq!(profile_for("gym").label, "athletic");
    }

    #[test]
    fn test_dress_satisfies_base_slots() {
        let profile = profile_for("casual");
        let top_slot = &profile.required_slots[0];
        let bottom_slot = &profile.required_slots[1];
        assert!(top_slot.accepts(Category::Dress));
        assert!(bottom_slot.accepts(Category::Dress));
        assert!(!profile.required_slots[2].accepts(Category::Dress));
    }

    #[test]
    fn test_athletic_has_no_dress_alternative() {
        let profile = profile_for("workout");
        assert!(profile.required_slots.iter().all(|s| !s.accepts(Category::Dress)));
    }

    #[test]
    fn test_casual_like_flags() {
        assert!(profile_for("casual").casual_like);
        assert!(profile_for("loungewear").casual_like);
        assert!(!profile_for("formal").casual_like);
        assert!(!profile_for("office").casual_like);
    }
}
