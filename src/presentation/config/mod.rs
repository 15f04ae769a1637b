mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, GradingSettings, LlmSettings, RedisSettings, ServerSettings, Settings,
    SettingsError, SttSettings,
};
