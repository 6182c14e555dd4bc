//! Watch ledger: the ordered list of watched/subtitled marks behind the
//! status column.
//!
//! The ledger is persisted whole under one workspace key on every
//! mutation, newest entry first. A movie has at most two entries at a
//! time, one confirmed (watched/dubbed) and one pending (subtitled).

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::Workspace;
use crate::models::entry::reference_now;
use crate::models::{LedgerEntry, MovieId};
use crate::storage::LocalStore;

/// Which transition `toggle_confirmed` applied to the persisted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmedTransition {
    /// A confirmed entry was prepended to the ledger.
    Inserted,
    /// The confirmed entry was removed; the movie's pending entry stays.
    ConfirmedRemoved,
    /// The movie's only entry was removed.
    EntryRemoved,
}

#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub transition: ConfirmedTransition,
    /// The row-checked flag echoed back to the caller.
    pub checked: bool,
    /// The list as this session now sees it. When `checked` is false the
    /// movie's first remaining entry is dropped from this view only; the
    /// persisted list keeps it.
    pub session_entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone)]
pub struct SubtitleOutcome {
    /// Whether the movie has a pending entry after the toggle.
    pub pending: bool,
    pub entries: Vec<LedgerEntry>,
}

/// Handle on one workspace's ledger. The storage key is resolved once at
/// construction and never changes for the life of the handle.
pub struct Ledger {
    store: Arc<LocalStore>,
    key: &'static str,
}

impl Ledger {
    pub fn new(store: Arc<LocalStore>, workspace: Workspace) -> Self {
        Self {
            store,
            key: workspace.storage_key(),
        }
    }

    pub fn storage_key(&self) -> &'static str {
        self.key
    }

    /// The persisted list, newest first. Missing and unreadable blobs both
    /// read as an empty ledger.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.store.read(self.key).unwrap_or_default()
    }

    /// Flips the watched/dubbed mark for a movie.
    ///
    /// The persisted transition depends only on the entries already
    /// present; `checked` drives the returned session view, not storage.
    pub fn toggle_confirmed(
        &self,
        movie_id: MovieId,
        title: &str,
        checked: bool,
    ) -> Result<ToggleOutcome> {
        let mut entries = self.entries();
        let count = entries.iter().filter(|e| e.movie_id == movie_id).count();
        let first = entries.iter().position(|e| e.movie_id == movie_id);

        let transition = match first {
            None => {
                entries.insert(0, LedgerEntry::new(movie_id, title, true, reference_now()));
                ConfirmedTransition::Inserted
            }
            Some(first) => {
                if count == 2 {
                    if let Some(confirmed_at) = entries
                        .iter()
                        .position(|e| e.movie_id == movie_id && e.confirmed)
                    {
                        entries.remove(confirmed_at);
                    }
                    ConfirmedTransition::ConfirmedRemoved
                } else if !entries[first].confirmed {
                    entries.insert(0, LedgerEntry::new(movie_id, title, true, reference_now()));
                    ConfirmedTransition::Inserted
                } else {
                    entries.remove(first);
                    ConfirmedTransition::EntryRemoved
                }
            }
        };

        self.store.write(self.key, &entries)?;
        match transition {
            ConfirmedTransition::Inserted => {
                log::info!("Marked movie {} ('{}') as watched", movie_id, title);
            }
            ConfirmedTransition::ConfirmedRemoved | ConfirmedTransition::EntryRemoved => {
                log::info!("Unmarked movie {} as watched", movie_id);
            }
        }

        // The unchecked row hides the movie's remaining entry for the rest
        // of the session; the write above already captured the real list.
        if !checked {
            if let Some(pos) = entries.iter().position(|e| e.movie_id == movie_id) {
                entries.remove(pos);
                log::debug!("Dropped movie {} from the session view", movie_id);
            }
        }

        Ok(ToggleOutcome {
            transition,
            checked,
            session_entries: entries,
        })
    }

    /// Flips the subtitled mark for a movie. Confirmed entries are never
    /// touched; only the movie's pending entry comes and goes.
    ///
    /// `title_lookup` resolves the title from the caller's current result
    /// set when a new pending entry is created; a miss stores an empty
    /// title, matching what the row would display.
    pub fn toggle_subtitled(
        &self,
        movie_id: MovieId,
        title_lookup: impl Fn(MovieId) -> Option<String>,
    ) -> Result<SubtitleOutcome> {
        let mut entries = self.entries();
        let new_pending = |lookup: &dyn Fn(MovieId) -> Option<String>| {
            LedgerEntry::new(
                movie_id,
                lookup(movie_id).unwrap_or_default(),
                false,
                reference_now(),
            )
        };

        let has_any = entries.iter().any(|e| e.movie_id == movie_id);
        if !has_any {
            entries.insert(0, new_pending(&title_lookup));
        } else if let Some(pending_at) = entries
            .iter()
            .position(|e| e.movie_id == movie_id && !e.confirmed)
        {
            entries.remove(pending_at);
        } else {
            entries.insert(0, new_pending(&title_lookup));
        }

        self.store.write(self.key, &entries)?;

        let pending = entries
            .iter()
            .any(|e| e.movie_id == movie_id && !e.confirmed);
        if pending {
            log::info!("Flagged movie {} for subtitles", movie_id);
        } else {
            log::info!("Cleared the subtitle flag for movie {}", movie_id);
        }

        Ok(SubtitleOutcome { pending, entries })
    }

    /// Ids of every movie with a confirmed entry. Seeds the checked state
    /// of result rows when a session starts.
    pub fn load_checked_map(&self) -> HashSet<MovieId> {
        self.entries()
            .iter()
            .filter(|e| e.confirmed)
            .map(|e| e.movie_id)
            .collect()
    }
}
