//! Read-side cache of the dashboard counters.
//!
//! Attaches to the store's change notifications so the counters are
//! already current whenever the caller asks for them. Never writes.

use std::sync::{Arc, Mutex};

use crate::config::Workspace;
use crate::models::entry::reference_now;
use crate::models::LedgerEntry;
use crate::stats::{compute_stats, WatchStats};
use crate::storage::LocalStore;

pub struct Dashboard {
    inner: Arc<Mutex<WatchStats>>,
}

impl Dashboard {
    /// Computes an initial snapshot for the workspace and refreshes it on
    /// every store write to that workspace's ledger key.
    pub fn attach(store: &Arc<LocalStore>, workspace: Workspace) -> Self {
        let key = workspace.storage_key();
        let initial = compute_stats(&read_entries(store, key), reference_now());
        let inner = Arc::new(Mutex::new(initial));

        let cache = Arc::clone(&inner);
        // The store owns the subscriber list, so the subscriber holds the
        // store weakly.
        let weak = Arc::downgrade(store);
        store.subscribe(move |written| {
            if written != key {
                return;
            }
            let Some(store) = weak.upgrade() else {
                return;
            };
            *cache.lock().unwrap() = compute_stats(&read_entries(&store, key), reference_now());
            log::debug!("Refreshed dashboard counters after write to '{}'", written);
        });

        Self { inner }
    }

    /// Latest counters for this dashboard's workspace.
    pub fn snapshot(&self) -> WatchStats {
        self.inner.lock().unwrap().clone()
    }
}

fn read_entries(store: &LocalStore, key: &str) -> Vec<LedgerEntry> {
    store.read(key).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    fn test_store() -> (tempfile::TempDir, Arc<LocalStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalStore::new(dir.path().to_path_buf()).unwrap());
        (dir, store)
    }

    #[test]
    fn attach_computes_an_initial_snapshot() {
        let (_dir, store) = test_store();
        let ledger = Ledger::new(Arc::clone(&store), Workspace::Default);
        ledger.toggle_confirmed(27205, "Inception", true).unwrap();
        ledger.toggle_confirmed(550, "Fight Club", true).unwrap();

        let dashboard = Dashboard::attach(&store, Workspace::Default);
        let stats = dashboard.snapshot();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.today, 2);
    }

    #[test]
    fn snapshot_refreshes_after_a_ledger_mutation() {
        let (_dir, store) = test_store();
        let dashboard = Dashboard::attach(&store, Workspace::Default);
        assert_eq!(dashboard.snapshot().total, 0);

        let ledger = Ledger::new(Arc::clone(&store), Workspace::Default);
        ledger.toggle_confirmed(27205, "Inception", true).unwrap();
        assert_eq!(dashboard.snapshot().total, 1);

        ledger.toggle_confirmed(27205, "Inception", false).unwrap();
        assert_eq!(dashboard.snapshot().total, 0);
    }

    #[test]
    fn writes_to_other_keys_leave_the_snapshot_alone() {
        let (_dir, store) = test_store();
        let dashboard = Dashboard::attach(&store, Workspace::Default);

        let p2p = Ledger::new(Arc::clone(&store), Workspace::PeerToPeer);
        p2p.toggle_confirmed(550, "Fight Club", true).unwrap();
        assert_eq!(dashboard.snapshot().total, 0);
    }

    #[test]
    fn pending_marks_do_not_move_the_counters() {
        let (_dir, store) = test_store();
        let dashboard = Dashboard::attach(&store, Workspace::Default);

        let ledger = Ledger::new(Arc::clone(&store), Workspace::Default);
        ledger
            .toggle_subtitled(603, |_| Some("The Matrix".into()))
            .unwrap();
        assert_eq!(dashboard.snapshot(), WatchStats::default());
    }
}
