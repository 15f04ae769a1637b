pub mod config;
mod health;

pub use config::{Environment, Settings, SettingsError};
pub use health::create_router;
