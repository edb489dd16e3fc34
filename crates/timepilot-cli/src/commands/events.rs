use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use timepilot_core::event::local_instant;
use timepilot_core::{
    Config, CreateEvent, DeleteEvent, EventDraft, EventItem, EventKind, Quadrant, ScheduleBoard,
    UpdateEvent, WallClock,
};

use super::{block_on, connect, print_timeline, viewport, CliResult};

#[derive(Subcommand)]
pub enum EventsAction {
    /// List habitual and ad-hoc events
    List {
        /// Only events starting on this local date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Show the laid-out timeline instead of a plain list
        #[arg(long)]
        timeline: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an event
    Add(EventFields),
    /// Replace an existing event
    Edit {
        /// Event ID
        id: i64,
        #[command(flatten)]
        fields: EventFields,
        /// Description (habitual events only)
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: i64,
        /// habitual or ad-hoc
        #[arg(long, default_value = "ad-hoc")]
        kind: EventKind,
    },
}

#[derive(Args)]
pub struct EventFields {
    /// habitual (daily) or ad-hoc (emergency)
    #[arg(long, default_value = "ad-hoc")]
    kind: EventKind,
    #[arg(long)]
    title: String,
    /// Eisenhower quadrant 1-4
    #[arg(long, default_value_t = 2)]
    quadrant: u8,
    /// Local date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Local start time (HH:MM)
    #[arg(long)]
    start: WallClock,
    /// Local end time (HH:MM)
    #[arg(long)]
    end: WallClock,
}

impl EventFields {
    fn draft(&self) -> Result<EventDraft, Box<dyn std::error::Error>> {
        WallClock::ensure_ordered(self.start, self.end)?;
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let quadrant = Quadrant::try_from(self.quadrant)?;
        let start = local_instant(date, self.start, &Local)?;
        let end = local_instant(date, self.end, &Local)?;
        Ok(EventDraft::new(self.title.clone(), quadrant, start, end)?)
    }
}

fn describe(item: &EventItem) -> String {
    let start = item.start_time.with_timezone(&Local);
    let end = item.end_time.with_timezone(&Local);
    let id = item
        .event_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "{id:>6}  {:<8}  {}  {} {}-{}  {}",
        item.kind.as_str(),
        item.quadrant,
        start.format("%Y-%m-%d"),
        start.format("%H:%M"),
        end.format("%H:%M"),
        item.title
    )
}

pub fn run(action: EventsAction) -> CliResult {
    let mut board = ScheduleBoard::new(connect()?);
    match action {
        EventsAction::List {
            date,
            timeline,
            json,
        } => {
            block_on(board.load_events())??;

            if timeline {
                let config = Config::load_or_default();
                let day = date.unwrap_or_else(|| Local::now().date_naive());
                let (events, layout) = board.layout(
                    Some(day),
                    viewport(&config, None, None),
                    &config.layout.policy(),
                    &Local,
                );
                return print_timeline(&events, &layout, json);
            }

            let items: Vec<&EventItem> = board
                .events()
                .iter()
                .filter(|item| {
                    date.map_or(true, |d| item.start_time.with_timezone(&Local).date_naive() == d)
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("no events");
            } else {
                for item in items {
                    println!("{}", describe(item));
                }
            }
        }
        EventsAction::Add(fields) => {
            let cmd = CreateEvent::new(fields.kind, fields.draft()?);
            let id = block_on(board.add_event(cmd))??;
            println!("event created: {id}");
        }
        EventsAction::Edit {
            id,
            fields,
            description,
        } => {
            let draft = fields.draft()?;
            let cmd = match fields.kind {
                EventKind::Habitual => UpdateEvent::Habitual {
                    event_id: id,
                    draft,
                    description,
                },
                EventKind::AdHoc => {
                    if description.is_some() {
                        tracing::warn!("--description is ignored for ad-hoc events");
                    }
                    UpdateEvent::AdHoc { event_id: id, draft }
                }
            };
            if block_on(board.edit_event(cmd))?? {
                println!("event {id} updated");
            } else {
                return Err(format!("event {id} was not updated").into());
            }
        }
        EventsAction::Delete { id, kind } => {
            if block_on(board.delete_event(DeleteEvent::new(kind, id)))?? {
                println!("event {id} deleted");
            } else {
                return Err(format!("event {id} was not deleted").into());
            }
        }
    }
    Ok(())
}
