//! ensemble - Outfit generation CLI
//!
//! Developer driver for the composition engine: loads a wardrobe JSON
//! file, builds a generation request from flags, runs one generation,
//! and prints the outfit (and optionally the telemetry snapshot). This
//! is tooling, not the product transport layer.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use ensemble_common::config::load_config;
use ensemble_common::store::{JsonFileWardrobe, WardrobeStore};
use ensemble_common::{GenerationRequest, MatchMode, WeatherCondition};
use ensemble_engine::OutfitEngine;

#[derive(Parser, Debug)]
#[command(name = "ensemble", about = "Generate an outfit from a wardrobe file")]
struct Args {
    /// Path to a wardrobe JSON file (array of items)
    wardrobe: PathBuf,

    /// Occasion to dress for
    #[arg(long, default_value = "casual")]
    occasion: String,

    /// Requested style
    #[arg(long, default_value = "minimalist")]
    style: String,

    /// Optional mood descriptor
    #[arg(long, default_value = "")]
    mood: String,

    /// Air temperature in degrees Fahrenheit
    #[arg(long, default_value_t = 72.0)]
    temperature: f64,

    /// Weather condition: clear, clouds, rain, snow, wind, fog
    #[arg(long, default_value = "clear")]
    condition: String,

    /// Free-text keywords to boost (repeatable)
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// Seed for deterministic tie-breaking
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Count only exact style matches (disables semantic matching)
    #[arg(long)]
    traditional: bool,

    /// Path to a tuning TOML file (overrides ENSEMBLE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the telemetry snapshot after generation
    #[arg(long)]
    metrics: bool,

    /// Print the outfit as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn parse_condition(value: &str) -> Result<WeatherCondition> {
    Ok(match value.to_lowercase().as_str() {
        "clear" => WeatherCondition::Clear,
        "clouds" | "cloudy" => WeatherCondition::Clouds,
        "rain" | "rainy" => WeatherCondition::Rain,
        "snow" | "snowy" => WeatherCondition::Snow,
        "wind" | "windy" => WeatherCondition::Wind,
        "fog" | "foggy" => WeatherCondition::Fog,
        other => bail!("unknown weather condition '{other}'"),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting ensemble v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let engine = OutfitEngine::new(config)?;

    let store = JsonFileWardrobe::new(&args.wardrobe);
    let wardrobe = store
        .load_wardrobe()
        .with_context(|| format!("loading wardrobe from {}", args.wardrobe.display()))?;
    info!("Loaded {} wardrobe items", wardrobe.len());

    let mut request = GenerationRequest::new(&args.occasion, &args.style, wardrobe);
    request.mood = args.mood.clone();
    request.weather.temperature_f = args.temperature;
    request.weather.condition = parse_condition(&args.condition)?;
    request.keywords = args.keywords.clone();
    request.seed = args.seed;
    if args.traditional {
        request.match_mode = MatchMode::Traditional;
    }

    let outfit = engine.generate(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outfit)?);
    } else {
        println!(
            "Outfit for {} ({}), tier {}, confidence {:.2}",
            args.occasion, args.style, outfit.tier, outfit.confidence
        );
        for item in &outfit.items {
            let marker = if item.is_fallback { " [placeholder]" } else { "" };
            println!("  {:<10} {}{}", format!("{}:", item.category), item.name, marker);
            if !item.reasons.is_empty() {
                println!("             ({})", item.reasons.join(", "));
            }
        }
        if !outfit.warnings.is_empty() {
            println!("Warnings:");
            for warning in &outfit.warnings {
                println!("  - {warning}");
            }
        }
        println!("{}", outfit.reasoning);
    }

    if args.metrics {
        println!("{}", serde_json::to_string_pretty(&engine.metrics())?);
    }

    Ok(())
}
