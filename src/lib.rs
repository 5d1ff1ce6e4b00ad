pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod pool;
pub mod tasks;

pub use config::DrawConfig;
pub use engine::DrawEngine;
pub use error::{ConfigError, DrawError};
pub use models::{ResultRecord, StopOutcome};
