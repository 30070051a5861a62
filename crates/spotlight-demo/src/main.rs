#![forbid(unsafe_code)]

//! Scripted spotlight tour.
//!
//! Builds a three-step tour over a fake screen, feeds it layout passes
//! (including a rotation that re-lays-out the search bar), and drives it
//! with presses. Every bridge event is logged.
//!
//! Run:
//!   RUST_LOG=spotlight=trace cargo run -p spotlight-demo -- --config tour.toml

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use spotlight_core::{Point, Rect, Size};
use spotlight_tour::{
    BackdropBehavior, SpotlightTourProvider, TourConfig, TourEvent, TourStep,
};

#[derive(Debug, Parser)]
#[command(name = "spotlight-demo", about = "Scripted spotlight tour walkthrough")]
struct Args {
    /// TOML or JSON tour config (by extension).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in device-independent units.
    #[arg(long, default_value_t = 390.0)]
    width: f32,

    /// Viewport height in device-independent units.
    #[arg(long, default_value_t = 844.0)]
    height: f32,
}

fn load_config(path: Option<&PathBuf>) -> Result<TourConfig, spotlight_tour::ConfigError> {
    let Some(path) = path else {
        return Ok(TourConfig::default());
    };
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => TourConfig::from_json_file(path)?,
        _ => TourConfig::from_toml_file(path)?,
    };
    config.validated()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load tour config");
            return ExitCode::FAILURE;
        }
    };
    info!(config = %config.to_jsonl(), "config loaded");

    let viewport = Rect::from_size(args.width, args.height);
    let tour = SpotlightTourProvider::new()
        .config(config)
        .steps(vec![
            TourStep::new("search")
                .title("Search")
                .body("Find anything from here."),
            TourStep::new("filters")
                .title("Filters")
                .body("Narrow results down."),
            TourStep::new("profile")
                .title("Profile")
                .body("Your settings live here.")
                .on_backdrop_press(BackdropBehavior::custom(|tour| {
                    info!(current = tour.current(), "custom backdrop handler");
                    tour.stop();
                })),
        ])
        .on_stop(|state| info!(index = state.index, is_last = state.is_last, "tour stopped"))
        .build();

    let _events = tour.subscribe(|event| match event {
        TourEvent::SpotChanged(Some(spot)) => {
            info!(index = spot.index, target = ?spot.target, cutout = ?spot.cutout, "spot");
        }
        TourEvent::SpotChanged(None) => info!("spot cleared"),
        other => info!(event = ?other, "tour event"),
    });

    // Search bar and filter chips share the header; the avatar sits alone.
    let header = tour.attach([0, 1]);
    let avatar = tour.attach(2);

    tour.start();
    header.layout(Rect::new(16.0, 56.0, args.width - 32.0, 44.0));
    avatar.layout(Rect::new(args.width - 56.0, 8.0, 40.0, 40.0));

    if let Some(view) = tour.render() {
        info!(title = %view.title, progress = %view.progress, "tooltip");
    }
    if let Some(layout) = tour.floating_layout(Size::new(240.0, 96.0), viewport) {
        info!(origin = ?layout.origin, placement = ?layout.placement, "tooltip placed");
    }

    // Rotation: the header re-lays-out, unmeasured in between.
    header.invalidate();
    header.layout(Rect::new(16.0, 40.0, args.height - 32.0, 44.0));

    tour.press_at(Point::new(args.width / 2.0, args.height - 10.0));
    tour.pause();
    tour.next();
    tour.resume();
    tour.go_to(2);
    tour.press_backdrop();

    ExitCode::SUCCESS
}
