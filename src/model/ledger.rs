use ahash::AHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::check_week;
use super::participant::{DEFAULT_OWNER, Participant};
use super::pick::Pick;
use crate::error::PickemError;

/// What one results page contributed: the entry names it listed (in row
/// order) and the picks it showed for each of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub entries: Vec<String>,
    pub picks: Vec<(String, Vec<Pick>)>,
}

impl ExtractedPage {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.picks.is_empty()
    }

    #[must_use]
    pub fn pick_count(&self) -> usize {
        self.picks.iter().map(|(_, picks)| picks.len()).sum()
    }
}

/// Registry of every participant seen during a run. Week tasks share it
/// behind an `Arc`; the lock is only taken inside [`Ledger::merge`].
#[derive(Debug, Default)]
pub struct Ledger {
    participants: Mutex<AHashMap<String, Participant>>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AHashMap<String, Participant>> {
        // merges are plain appends; a poisoned map is still consistent
        self.participants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers unseen entries and appends the page's picks for `week`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `week` is not a regular-season week.
    pub fn merge(&self, week: u8, page: ExtractedPage) -> Result<(), PickemError> {
        let week = check_week(u32::from(week))?;
        let mut participants = self.lock();

        for name in page.entries {
            participants
                .entry(name.clone())
                .or_insert_with(|| Participant::new(name, DEFAULT_OWNER));
        }

        for (name, picks) in page.picks {
            participants
                .entry(name.clone())
                .or_insert_with(|| Participant::new(name, DEFAULT_OWNER))
                .add_weekly_picks(week, picks)?;
        }

        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Participant> {
        self.lock().get(name).cloned()
    }

    /// Copy of every participant, sorted by name.
    #[must_use]
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.lock().values().cloned().collect();
        participants.sort_by(|a, b| a.name().cmp(b.name()));
        participants
    }
}
