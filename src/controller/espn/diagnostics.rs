use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::controller::browser::BrowserSession;

/// Where failure screenshots go.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    dir: PathBuf,
}

impl Diagnostics {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves a full-page screenshot as `file_name`. Failures are logged and
    /// swallowed; the screenshot only ever accompanies another error.
    pub async fn capture(&self, session: &dyn BrowserSession, file_name: &str) -> Option<PathBuf> {
        let path = self.dir.join(file_name);
        info!("Taking full-page screenshot...");
        let bytes = match session.screenshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Could not take screenshot: {e}");
                return None;
            }
        };
        if let Err(e) = tokio::fs::write(&path, bytes).await {
            error!(path = %path.display(), "Could not write screenshot: {e}");
            return None;
        }
        Some(path)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(".")
    }
}
