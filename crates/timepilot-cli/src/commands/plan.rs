use chrono::{Local, NaiveDate};
use clap::Args;
use timepilot_core::{Config, ScheduleBoard};

use super::{block_on, connect, print_timeline, viewport, CliResult};

#[derive(Args)]
pub struct PlanArgs {
    /// Local date to plan (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Viewport height (defaults to layout.viewport_height)
    #[arg(long)]
    height: Option<f32>,
    /// Viewport width (defaults to layout.viewport_width)
    #[arg(long)]
    width: Option<f32>,
    /// Print placements as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PlanArgs) -> CliResult {
    let config = Config::load_or_default();
    let day = args.date.unwrap_or_else(|| Local::now().date_naive());

    let mut board = ScheduleBoard::new(connect()?);
    let count = block_on(board.apply_smart_plan(day, &Local))??;
    tracing::info!(%day, count, "plan received");

    let (events, layout) = board.layout(
        Some(day),
        viewport(&config, args.height, args.width),
        &config.layout.policy(),
        &Local,
    );
    if !args.json {
        println!("plan for {day}: {count} events");
    }
    print_timeline(&events, &layout, args.json)
}
