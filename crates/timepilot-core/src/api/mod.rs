//! TimePilot backend client.

mod client;
mod credentials;
pub mod types;

pub use client::ApiClient;
pub use credentials::{AuthTokens, CredentialStore, KeyringStore, MemoryStore};
pub use types::{
    AdHocEventVo, BaseResponse, HabitualEventVo, LoginResponse, PlannedEventVo, RegisterRequest,
};
