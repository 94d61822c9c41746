use crate::controller::browser::BrowserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickemError {
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
    #[error("could not reach the group picks view: {0}")]
    Navigation(String),
    #[error("week {0} is outside 1..=18")]
    InvalidWeek(u32),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("standings error: {0}")]
    Standings(String),
    #[error("week {week} task failed: {reason}")]
    Task { week: u8, reason: String },
}

impl From<String> for PickemError {
    fn from(err: String) -> Self {
        Self::Config(err)
    }
}

impl From<&str> for PickemError {
    fn from(err: &str) -> Self {
        Self::Config(err.to_string())
    }
}
