//! Periodic snapshot scheduling.
//!
//! A background thread drives a full snapshot pass across all databases
//! every `interval`, and once more at shutdown. Per-database failures are
//! logged and never abort a pass.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::manager::Manager;
use crate::snapshot::SnapshotStore;

/// Drives periodic snapshots of every database in a manager.
///
/// The timer thread starts on [`SnapshotScheduler::start`] and runs until
/// [`SnapshotScheduler::shutdown`] (or drop), which interrupts the wait,
/// performs one final save pass, and joins the thread.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use proxima::{Manager, SnapshotScheduler, SnapshotStore};
///
/// let manager = Arc::new(Manager::new());
/// let store = Arc::new(SnapshotStore::new("./data"));
///
/// let mut scheduler =
///     SnapshotScheduler::start(manager, store, Duration::from_secs(5));
/// // ... serve traffic ...
/// scheduler.shutdown();
/// ```
pub struct SnapshotScheduler {
    shutdown: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotScheduler {
    /// Spawn the timer thread.
    #[must_use]
    pub fn start(manager: Arc<Manager>, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        let shutdown = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Arc::clone(&shutdown);

        let handle = thread::spawn(move || {
            loop {
                if wait_for_shutdown(&signal, interval) {
                    break;
                }
                debug!("running scheduled snapshot pass");
                save_all(&manager, &store);
            }
            // Final pass so nothing accepted before shutdown is lost.
            debug!("running final snapshot pass");
            save_all(&manager, &store);
        });

        Self { shutdown, handle: Some(handle) }
    }

    /// Stop the timer, run one final save pass, and join the thread.
    ///
    /// Calling this more than once is a no-op.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        let (stopped, signal) = &*self.shutdown;
        *stopped.lock().unwrap_or_else(PoisonError::into_inner) = true;
        signal.notify_all();

        if handle.join().is_err() {
            warn!("snapshot scheduler thread panicked");
        }
    }
}

impl Drop for SnapshotScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Sleep until `interval` elapses or shutdown is signalled. Returns `true`
/// when shutting down. Spurious wakeups re-enter the wait for the
/// remainder of the interval.
fn wait_for_shutdown(signal: &(Mutex<bool>, Condvar), interval: Duration) -> bool {
    let (stopped, condvar) = signal;
    let deadline = Instant::now() + interval;

    let mut guard = stopped.lock().unwrap_or_else(PoisonError::into_inner);
    loop {
        if *guard {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        guard = condvar
            .wait_timeout(guard, deadline - now)
            .unwrap_or_else(PoisonError::into_inner)
            .0;
    }
}

/// Snapshot every database in the manager, logging failures and
/// continuing.
pub fn save_all(manager: &Manager, store: &SnapshotStore) {
    let names = match manager.list_databases() {
        Ok(names) => names,
        Err(err) => {
            warn!(error = %err, "failed to list databases for snapshot pass");
            return;
        }
    };

    for name in names {
        let database = match manager.get_database(&name) {
            Ok(database) => database,
            Err(err) => {
                warn!(database = %name, error = %err, "failed to fetch database for snapshot");
                continue;
            }
        };

        if let Err(err) = store.save(&database) {
            warn!(database = %name, error = %err, "failed to snapshot database");
        }
    }
}
