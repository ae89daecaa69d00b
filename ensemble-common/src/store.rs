//! Collaborator interfaces
//!
//! The engine composes outfits from data handed to it; these traits are
//! the seams where callers plug in wardrobe storage, weather lookup, and
//! outfit history. A JSON-file wardrobe and an in-memory history ship
//! here so the CLI and tests have working implementations.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::item::WardrobeItem;
use crate::outfit::GeneratedOutfit;
use crate::request::WeatherSnapshot;

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Traits
// ============================================================================

/// Source of wardrobe snapshots
pub trait WardrobeStore {
    fn load_wardrobe(&self) -> Result<Vec<WardrobeItem>, StoreError>;
}

/// Source of current weather conditions
pub trait WeatherProvider {
    fn current(&self) -> Result<WeatherSnapshot, StoreError>;
}

/// Sink for generated outfits and wear events
pub trait OutfitHistoryStore {
    /// Record a freshly generated outfit
    fn record(&mut self, outfit: &GeneratedOutfit) -> Result<(), StoreError>;

    /// Mark a previously recorded outfit as worn
    fn mark_worn(&mut self, outfit_id: Uuid, worn_at: DateTime<Utc>) -> Result<(), StoreError>;
}

// ============================================================================
// JSON File Wardrobe
// ============================================================================

/// Wardrobe stored as a JSON array of items in a single file
pub struct JsonFileWardrobe {
    path: PathBuf,
}

impl JsonFileWardrobe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileWardrobe { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WardrobeStore for JsonFileWardrobe {
    fn load_wardrobe(&self) -> Result<Vec<WardrobeItem>, StoreError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let items: Vec<WardrobeItem> = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Malformed(format!("{}: {}", self.path.display(), e)))?;
        debug!(
            "loaded {} wardrobe items from {}",
            items.len(),
            self.path.display()
        );
        Ok(items)
    }
}

// ============================================================================
// Fixed Weather
// ============================================================================

/// Weather provider returning a fixed snapshot
///
/// Stands in when no live provider is wired up and doubles as the test
/// provider.
pub struct FixedWeather {
    snapshot: WeatherSnapshot,
}

impl FixedWeather {
    pub fn new(snapshot: WeatherSnapshot) -> Self {
        FixedWeather { snapshot }
    }

    /// Provider reporting mild fair weather
    pub fn mild() -> Self {
        FixedWeather {
            snapshot: WeatherSnapshot::mild(),
        }
    }
}

impl WeatherProvider for FixedWeather {
    fn current(&self) -> Result<WeatherSnapshot, StoreError> {
        Ok(self.snapshot)
    }
}

// ============================================================================
// In-Memory History
// ============================================================================

/// Outfit history held in memory
#[derive(Default)]
pub struct InMemoryHistory {
    outfits: Vec<GeneratedOutfit>,
    wear_events: Vec<(Uuid, DateTime<Utc>)>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outfits(&self) -> &[GeneratedOutfit] {
        &self.outfits
    }

    pub fn wear_events(&self) -> &[(Uuid, DateTime<Utc>)] {
        &self.wear_events
    }
}

impl OutfitHistoryStore for InMemoryHistory {
    fn record(&mut self, outfit: &GeneratedOutfit) -> Result<(), StoreError> {
        self.outfits.push(outfit.clone());
        Ok(())
    }

    fn mark_worn(&mut self, outfit_id: Uuid, worn_at: DateTime<Utc>) -> Result<(), StoreError> {
        if !self.outfits.iter().any(|o| o.id == outfit_id) {
            return Err(StoreError::NotFound(format!("outfit {outfit_id}")));
        }
        self.wear_events.push((outfit_id, worn_at));
        Ok(())
    }
}
