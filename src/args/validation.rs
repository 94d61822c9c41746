use std::path::{Path, PathBuf};

use super::types::Args;
use crate::controller::espn::MAX_WORKERS;
use crate::model::{TieConfig, check_week as check_season_week};

/// # Errors
///
/// Will return `Err` if the value is not a week between 1 and 18
pub fn check_week(value: &str) -> Result<u8, String> {
    let week: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a week number."))?;
    check_season_week(week).map_err(|e| e.to_string())
}

/// # Errors
///
/// Will return `Err` if the value is not between 1 and the worker limit
pub fn check_workers(value: &str) -> Result<usize, String> {
    let workers: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number."))?;
    if (1..=MAX_WORKERS).contains(&workers) {
        Ok(workers)
    } else {
        Err(format!("workers must be between 1 and {MAX_WORKERS}."))
    }
}

/// # Errors
///
/// Will return `Err` if the file is not readable or is not a valid tie table
pub fn check_readable_file_and_ties(file: &str) -> Result<TieConfig, String> {
    let path = PathBuf::from(file);
    if !path.is_file() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    TieConfig::from_json_file(&path).map_err(|e| format!("The json file '{file}': {e}"))
}

/// # Errors
///
/// Will return `Err` if the file does not exist or is not a regular file
pub fn check_readable_file(file: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(file);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("The file '{file}' is not readable."))
    }
}

/// # Errors
///
/// Will return `Err` if the parent directory of the file does not exist
pub fn check_parent_dir_is_writeable(file: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(file);
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(format!(
            "The directory '{}' for the output file does not exist.",
            parent.display()
        ));
    }
    let read_only = parent
        .metadata()
        .map(|m| m.permissions().readonly())
        .unwrap_or(true);
    if read_only {
        return Err(format!("The directory '{}' is not writeable.", parent.display()));
    }
    Ok(path)
}

impl Args {
    /// Checks that need more than one argument at a time.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configuration is invalid
    pub fn validate(&self) -> Result<(), String> {
        if self.group_id.trim().is_empty() {
            return Err("group id must not be empty".to_string());
        }
        if !self.webdriver_url.starts_with("http://") && !self.webdriver_url.starts_with("https://") {
            return Err(format!(
                "webdriver url '{}' must start with http:// or https://",
                self.webdriver_url
            ));
        }
        if self.diagnostics_dir.exists() && !self.diagnostics_dir.is_dir() {
            return Err(format!(
                "'{}' is not a directory.",
                self.diagnostics_dir.display()
            ));
        }
        Ok(())
    }
}
