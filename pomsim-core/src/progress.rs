//! Process-wide progress reporting.
//!
//! Progress is rendered as log lines. At most one run owns the progress state
//! at a time: it is initialised by [`Progress::begin`] and torn down when the
//! returned guard is dropped. Workers of a batch share the guard and their
//! updates are serialised by a mutex.
use log::{info, warn};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard,
    },
    time::Instant,
};

/// Units between reports when the total is unknown.
const REPORT_INTERVAL: usize = 10_000;

struct ProgressState {
    id: u64,
    label: String,
    total: Option<usize>,
    done: usize,
    reported: usize,
    start: Instant,
}

static PROGRESS: Mutex<Option<ProgressState>> = Mutex::new(None);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn lock() -> MutexGuard<'static, Option<ProgressState>> {
    // A panicking worker must not disable progress of the remaining runs.
    PROGRESS.lock().unwrap_or_else(|e| e.into_inner())
}

/// Serialises tests that report progress, as they share the global state.
#[cfg(test)]
static TEST_MUTEX: Mutex<()> = Mutex::new(());

#[cfg(test)]
pub(crate) fn test_lock() -> MutexGuard<'static, ()> {
    TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}

/// Units recorded by whichever guard owns the progress state.
#[cfg(test)]
pub(crate) fn current_done() -> Option<usize> {
    lock().as_ref().map(|state| state.done)
}

/// Guard owning the process-wide progress state.
#[derive(Debug)]
pub struct Progress {
    id: Option<u64>,
}

impl Progress {
    /// Starts reporting progress of `total` units (`None` if unknown).
    ///
    /// If another run is already reporting, the returned guard is inactive.
    pub fn begin(label: impl Into<String>, total: Option<usize>) -> Self {
        let label = label.into();
        let mut state = lock();
        if let Some(other) = state.as_ref() {
            warn!(
                "Progress of '{}' is not shown while '{}' is running",
                label, other.label
            );
            return Self { id: None };
        }
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        info!("{}: started", label);
        *state = Some(ProgressState {
            id,
            label,
            total,
            done: 0,
            reported: 0,
            start: Instant::now(),
        });
        Self { id: Some(id) }
    }

    /// A guard that reports nothing.
    pub fn disabled() -> Self {
        Self { id: None }
    }

    /// Returns `true` if this guard owns the progress state.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Records `n` finished units.
    pub fn advance(&self, n: usize) {
        let id = match self.id {
            Some(id) => id,
            None => return,
        };
        let mut state = lock();
        let state = match state.as_mut() {
            Some(state) if state.id == id => state,
            _ => return,
        };
        state.done += n;

        match state.total {
            Some(total) if total > 0 => {
                let decile = state.done.min(total) * 10 / total;
                if decile > state.reported {
                    state.reported = decile;
                    info!(
                        "{}: {}/{} ({}%), {:.2} sec",
                        state.label,
                        state.done,
                        total,
                        decile * 10,
                        state.start.elapsed().as_secs_f32()
                    );
                }
            }
            _ => {
                let mark = state.done / REPORT_INTERVAL;
                if mark > state.reported {
                    state.reported = mark;
                    info!("{}: {}", state.label, state.done);
                }
            }
        }
    }

    /// Units recorded so far, if this guard is active.
    pub fn done(&self) -> Option<usize> {
        let id = self.id?;
        lock()
            .as_ref()
            .filter(|state| state.id == id)
            .map(|state| state.done)
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            let mut state = lock();
            if state.as_ref().map_or(false, |s| s.id == id) {
                if let Some(s) = state.take() {
                    info!(
                        "{}: finished {} in {:.2} sec",
                        s.label,
                        s.done,
                        s.start.elapsed().as_secs_f32()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_lifecycle() {
        let _lock = test_lock();
        {
            let p = Progress::begin("first", Some(4));
            assert!(p.is_active());

            let q = Progress::begin("second", Some(1));
            assert!(!q.is_active());
            q.advance(1);

            std::thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(|| p.advance(1));
                }
            });
            assert_eq!(p.done(), Some(4));
        }

        let p = Progress::begin("third", None);
        assert!(p.is_active());
        assert_eq!(p.done(), Some(0));
        assert_eq!(Progress::disabled().done(), None);
        assert_eq!(current_done(), Some(0));
        drop(p);
        assert_eq!(current_done(), None);
    }
}
