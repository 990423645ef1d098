pub mod config;
pub mod report;

pub use config::{AppConfig, OutputConfig, Overrides, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_YAML};
pub use report::{ChannelSummary, ProductionReport};
