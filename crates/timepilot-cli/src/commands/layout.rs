use clap::Args;
use std::path::PathBuf;
use timepilot_core::{layout_timeline, Config, TimelineEvent};

use super::{print_timeline, viewport, CliResult};

#[derive(Args)]
pub struct LayoutArgs {
    /// JSON array of events: {"title", "start_minute", "end_minute", "quadrant"?, "kind"?}
    #[arg(long)]
    file: PathBuf,
    /// Viewport height (defaults to layout.viewport_height)
    #[arg(long, allow_negative_numbers = true)]
    height: Option<f32>,
    /// Viewport width (defaults to layout.viewport_width)
    #[arg(long, allow_negative_numbers = true)]
    width: Option<f32>,
    /// Print placements as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LayoutArgs) -> CliResult {
    let content = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("cannot read {}: {e}", args.file.display()))?;
    let events: Vec<TimelineEvent> = serde_json::from_str(&content)?;

    let config = Config::load_or_default();
    let layout = layout_timeline(
        &events,
        viewport(&config, args.height, args.width),
        &config.layout.policy(),
    );
    print_timeline(&events, &layout, args.json)
}
