//! # Ensemble Engine
//!
//! The outfit composition engine: given an immutable wardrobe snapshot
//! and a generation request, compose a small, valid, stylistically
//! coherent outfit under hard constraints (categories, weather,
//! exclusions) and soft constraints (semantic style compatibility,
//! color/material harmony, novelty), with graceful degradation through
//! strictness tiers and bounded latency.
//!
//! Entry point: [`OutfitEngine`], exposing `generate()` and `metrics()`.

pub mod engine;
pub mod error;
pub mod normalize;
pub mod occasion;
pub mod pipeline;
pub mod stylegraph;
pub mod telemetry;

mod degrade;

pub use engine::OutfitEngine;
pub use error::GenerationError;
pub use telemetry::AggregateMetrics;
