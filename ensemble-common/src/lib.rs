//! # Ensemble Common Library
//!
//! Shared contracts for the ensemble outfit composition engine:
//! - Wardrobe item vocabulary (categories, formality, tags)
//! - Generation request and outfit result types
//! - Tuning parameters, structural limits, and TOML configuration loading
//! - Collaborator interfaces (wardrobe, weather, outfit history)

pub mod config;
pub mod error;
pub mod item;
pub mod outfit;
pub mod params;
pub mod request;
pub mod store;

pub use error::{Error, Result};
pub use item::{Category, Formality, GenderExpression, WardrobeItem};
pub use outfit::{GeneratedOutfit, GenerationTier, OutfitWarning, SelectedItem};
pub use params::{EngineConfig, EngineLimits, TuningParams};
pub use request::{
    GenerationRequest, MatchMode, OutfitFeedback, UserProfile, WeatherCondition, WeatherSnapshot,
};
