//! # TimePilot Core Library
//!
//! Business logic for the TimePilot calendar client: the event model, the
//! REST client for the TimePilot backend and the timeline layout engine that
//! places overlapping events side by side. The CLI and any GUI host are thin
//! layers over this crate.
//!
//! ## Architecture
//!
//! - **Layout**: pure overlap clustering, greedy column assignment and
//!   minute-to-pixel geometry
//! - **Events**: wall-clock timeline events, backend event items and typed
//!   create/update/delete commands
//! - **API**: `reqwest` client with device-id and bearer-token headers,
//!   tokens kept in the OS keyring
//! - **Storage**: TOML configuration and the persistent device id
//!
//! ## Key Components
//!
//! - [`layout_timeline`]: one full layout pass
//! - [`ScheduleBoard`]: local event list kept in sync with the backend
//! - [`ApiClient`]: backend operations
//! - [`Config`]: application configuration management

pub mod api;
pub mod board;
pub mod error;
pub mod event;
pub mod layout;
pub mod storage;

pub use api::{ApiClient, AuthTokens, CredentialStore, KeyringStore, MemoryStore};
pub use board::ScheduleBoard;
pub use error::{ApiError, ConfigError, CoreError, CredentialError, ValidationError};
pub use event::{
    CreateEvent, DeleteEvent, EventDraft, EventItem, EventKind, Quadrant, TimelineEvent,
    UpdateEvent, WallClock,
};
pub use layout::{
    layout_timeline, EventRect, LayoutPolicy, PlacedEvent, TimeScale, TimelineLayout, Viewport,
};
pub use storage::Config;
