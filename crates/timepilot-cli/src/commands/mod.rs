pub mod auth;
pub mod config;
pub mod events;
pub mod layout;
pub mod plan;

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use timepilot_core::layout::EventRect;
use timepilot_core::storage::get_or_create_device_id;
use timepilot_core::{ApiClient, Config, KeyringStore, TimelineEvent, TimelineLayout, Viewport};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Run one async backend operation to completion.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, std::io::Error> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

/// Client configured from disk, with tokens in the OS keyring.
pub fn connect() -> Result<ApiClient, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let device_id = get_or_create_device_id()?;
    Ok(ApiClient::from_config(
        &config,
        device_id,
        Arc::new(KeyringStore::new()),
    )?)
}

/// Configured viewport with optional command-line overrides.
pub fn viewport(config: &Config, height: Option<f32>, width: Option<f32>) -> Viewport {
    let base = config.layout.viewport();
    Viewport::new(height.unwrap_or(base.height), width.unwrap_or(base.width))
}

#[derive(Serialize)]
struct PlacedRow<'a> {
    title: &'a str,
    time: String,
    column: usize,
    total_columns: usize,
    rect: EventRect,
}

fn rows<'a>(events: &'a [TimelineEvent], layout: &TimelineLayout) -> Vec<PlacedRow<'a>> {
    layout
        .placed
        .iter()
        .map(|p| {
            let event = &events[p.index];
            PlacedRow {
                title: event.title(),
                time: event.time_range_label(),
                column: p.column,
                total_columns: p.total_columns,
                rect: p.rect,
            }
        })
        .collect()
}

pub fn print_timeline(events: &[TimelineEvent], layout: &TimelineLayout, json: bool) -> CliResult {
    if json {
        let out = serde_json::json!({
            "events": rows(events, layout),
            "hour_marks": layout
                .hour_marks()
                .iter()
                .map(|m| serde_json::json!({ "label": m.label(), "offset": m.offset }))
                .collect::<Vec<_>>(),
            "cluster_count": layout.cluster_count,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if layout.is_empty() {
        println!("no events");
        return Ok(());
    }

    for row in rows(events, layout) {
        println!(
            "{:<11}  col {}/{}  top {:>7.1}  height {:>6.1}  x {:>6.1}  width {:>6.1}  {}",
            row.time,
            row.column + 1,
            row.total_columns,
            row.rect.top,
            row.rect.height,
            row.rect.x_offset,
            row.rect.width,
            row.title,
        );
    }
    Ok(())
}
