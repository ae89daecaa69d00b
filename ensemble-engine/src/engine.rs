//! Outfit engine facade
//!
//! [`OutfitEngine`] owns the process-wide read-only state (style graph,
//! tuning) and the telemetry aggregator, and exposes the two operations
//! callers get: [`OutfitEngine::generate`] and [`OutfitEngine::metrics`].
//! Engines are explicitly constructed and passed by reference; there is
//! no global instance. Generation is a stateless computation over the
//! immutable request, so one engine serves many threads concurrently.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ensemble_common::{
    EngineConfig, EngineLimits, GeneratedOutfit, GenerationRequest, OutfitWarning, Result,
    TuningParams,
};

use crate::degrade::{run_ladder, Deadline, TierContext};
use crate::error::GenerationError;
use crate::normalize::{normalize_request, normalize_wardrobe};
use crate::occasion::profile_for;
use crate::pipeline::score::feedback_affinity;
use crate::stylegraph::StyleGraph;
use crate::telemetry::{AggregateMetrics, EngineTelemetry};

/// The outfit composition engine
///
/// Construct once at process start, share by reference.
#[derive(Debug)]
pub struct OutfitEngine {
    graph: StyleGraph,
    tuning: TuningParams,
    limits: EngineLimits,
    telemetry: EngineTelemetry,
}

impl OutfitEngine {
    /// Build an engine from a validated configuration
    ///
    /// # Errors
    /// `Error::Config` when the configuration violates a tuning rule
    /// (for example a formality penalty that fails to dominate the
    /// positive weights).
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let graph = StyleGraph::new();
        info!(
            style_nodes = graph.len(),
            deadline_ms = config.limits.deadline_ms,
            "outfit engine ready"
        );
        Ok(OutfitEngine {
            graph,
            tuning: config.tuning,
            limits: config.limits,
            telemetry: EngineTelemetry::new(),
        })
    }

    /// Engine with built-in default tuning
    pub fn with_defaults() -> Self {
        OutfitEngine {
            graph: StyleGraph::new(),
            tuning: TuningParams::default(),
            limits: EngineLimits::default(),
            telemetry: EngineTelemetry::new(),
        }
    }

    /// Generate one outfit for the request
    ///
    /// Synchronous and deterministic for a fixed request and seed. The
    /// only hard failure is an unusable wardrobe; every other problem
    /// degrades the result through the tier ladder and still returns an
    /// outfit with warnings.
    pub fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GeneratedOutfit, GenerationError> {
        let started = Instant::now();
        let deadline = Deadline::new(self.limits.deadline_ms);

        let norm = normalize_request(request);
        let (items, item_dropped) = normalize_wardrobe(&request.wardrobe);
        let dropped = item_dropped + norm.dropped;
        self.telemetry.add_dropped_tags(dropped);

        if items.is_empty() {
            warn!(occasion = %request.occasion, "generation refused: empty wardrobe");
            self.telemetry.record_failure(started.elapsed());
            return Err(GenerationError::InsufficientWardrobe);
        }

        let profile = profile_for(&norm.occasion);
        let feedback = feedback_affinity(&items, &request.feedback);
        debug!(
            occasion = profile.label,
            style = %norm.style,
            wardrobe = items.len(),
            dropped_tags = dropped,
            "starting generation"
        );

        let ctx = TierContext {
            graph: &self.graph,
            params: &self.tuning,
            limits: &self.limits,
            request,
            norm: &norm,
            items: &items,
            feedback: &feedback,
            profile,
            now: Utc::now(),
        };

        match run_ladder(&ctx, &self.telemetry, &deadline) {
            Ok(draft) => {
                let mut warnings = draft.warnings;
                if dropped > 0 {
                    warnings.push(OutfitWarning::DroppedTags { count: dropped });
                }
                let outfit = GeneratedOutfit {
                    id: Uuid::new_v4(),
                    items: draft.picks,
                    confidence: draft.confidence,
                    reasoning: draft.reasoning,
                    warnings,
                    tier: draft.tier,
                    generated_at: Utc::now(),
                };
                let latency = started.elapsed();
                self.telemetry.record_success(draft.tier, latency);
                info!(
                    tier = outfit.tier.as_str(),
                    items = outfit.items.len(),
                    confidence = outfit.confidence,
                    latency_ms = latency.as_millis() as u64,
                    "outfit generated"
                );
                Ok(outfit)
            }
            Err(error) => {
                self.telemetry.record_failure(started.elapsed());
                warn!(%error, "generation failed");
                Err(error)
            }
        }
    }

    /// Read-only snapshot of aggregate telemetry
    pub fn metrics(&self) -> AggregateMetrics {
        self.telemetry.snapshot()
    }
}
