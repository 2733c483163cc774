//! Parallel directory walker feeding the registrar.
//!
//! A pool of OS threads drains a shared channel of directories. Quiescence
//! is tracked by a single atomic counter: a directory counts as in-flight
//! from just before it is enqueued until its processing completes, so an
//! empty queue observed together with a zero counter means no work remains
//! anywhere and the workers may exit. A worker that is still producing
//! children therefore can never be mistaken for idle.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel as channel;

use crate::indexer::registrar::Registrar;

/// How long an idle worker waits for new work before re-checking the
/// in-flight counter.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Parallel recursive traversal over one root directory.
pub struct Walker {
    parallelism: usize,
}

impl Walker {
    /// Create a walker with the given worker pool size (at least 1).
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }

    /// Walk `root`, registering every reachable entry.
    ///
    /// The root itself is expected to be registered by the caller; workers
    /// register directory *contents* and enqueue subdirectories. Runs all
    /// workers to quiescence and joins them.
    pub fn run<W>(&self, root: PathBuf, registrar: &Arc<Registrar<W>>)
    where
        W: Write + Send + 'static,
    {
        // Unbounded: workers both produce and consume, so a bounded queue
        // could fill up and block every producer with no consumer left.
        let (work_tx, work_rx) = channel::unbounded::<PathBuf>();
        let in_flight = Arc::new(AtomicUsize::new(0));

        in_flight.fetch_add(1, Ordering::SeqCst);
        let _ = work_tx.send(root);

        let workers: Vec<_> = (0..self.parallelism)
            .map(|_| {
                let work_rx = work_rx.clone();
                let work_tx = work_tx.clone();
                let in_flight = Arc::clone(&in_flight);
                let registrar = Arc::clone(registrar);

                thread::spawn(move || {
                    walker_thread(&work_rx, &work_tx, &in_flight, &registrar);
                })
            })
            .collect();

        // Drop our copies so the channel can disconnect once workers exit.
        drop(work_tx);
        drop(work_rx);

        for handle in workers {
            let _ = handle.join();
        }
    }
}

/// Worker loop: pull directories until the queue is empty and nothing is
/// in flight.
fn walker_thread<W: Write>(
    work_rx: &channel::Receiver<PathBuf>,
    work_tx: &channel::Sender<PathBuf>,
    in_flight: &AtomicUsize,
    registrar: &Registrar<W>,
) {
    loop {
        match work_rx.recv_timeout(IDLE_POLL) {
            Ok(dir) => {
                process_directory(&dir, work_tx, in_flight, registrar);
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            Err(channel::RecvTimeoutError::Timeout) => {
                if in_flight.load(Ordering::SeqCst) == 0 {
                    return;
                }
            }
            Err(channel::RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// Process one directory: canonicalize and register each entry, enqueue
/// subdirectories.
fn process_directory<W: Write>(
    dir: &Path,
    work_tx: &channel::Sender<PathBuf>,
    in_flight: &AtomicUsize,
    registrar: &Registrar<W>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("could not traverse {}: {err}", dir.display());
            return;
        }
    };

    for entry_result in entries {
        let Ok(entry) = entry_result else {
            continue;
        };

        let canonical = match fs::canonicalize(entry.path()) {
            Ok(path) => path,
            Err(err) => {
                log::debug!("skipping {}: {err}", entry.path().display());
                continue;
            }
        };

        // The canonical path has no symlink component left, so a plain
        // metadata call tells whether to descend.
        let is_dir = fs::metadata(&canonical).is_ok_and(|meta| meta.is_dir());
        if is_dir {
            in_flight.fetch_add(1, Ordering::SeqCst);
            if work_tx.send(canonical.clone()).is_err() {
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        }

        if let Err(err) = registrar.register(&canonical) {
            log::warn!("abandoning {}: {err}", dir.display());
            return;
        }
    }
}
