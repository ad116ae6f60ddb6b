//! Level-file watcher for hot-reloading
//!
//! Polls the modification time of every loaded level file. When one
//! changes, a reload is queued onto the UI action queue, the same thing the
//! `reload_config` key does, so the engine is only touched by its owner.

use crate::manager::ConfigManager;
use marquee_core::UiSender;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, SystemTime};

/// Watches the files of a loaded level chain
pub struct LevelFileWatcher {
    files: Vec<(PathBuf, Option<SystemTime>)>,
    sender: UiSender<ConfigManager>,
    check_interval: Duration,
    queue_closed: bool,
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl LevelFileWatcher {
    /// Watches the files `config` currently has loaded
    pub fn new(config: &ConfigManager, sender: UiSender<ConfigManager>) -> Self {
        let files = config
            .loaded_files()
            .into_iter()
            .map(|(_, path)| {
                let path = path.to_path_buf();
                let stamp = modified(&path);
                (path, stamp)
            })
            .collect();

        Self {
            files,
            sender,
            check_interval: Duration::from_secs(2),
            queue_closed: false,
        }
    }

    /// Sets the check interval for file modifications
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn watched_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().map(|(path, _)| path)
    }

    /// Queues a reload if any watched file changed or disappeared
    ///
    /// Returns true when a reload was queued.
    pub fn check_for_changes(&mut self) -> bool {
        let mut changed = false;
        for (path, stamp) in &mut self.files {
            let current = modified(path);
            if current != *stamp {
                log::info!("Level file {} changed", path.display());
                *stamp = current;
                changed = true;
            }
        }
        if !changed {
            return false;
        }

        let posted = self.sender.post(|config: &mut ConfigManager| {
            match config.refresh_configuration() {
                Ok(true) => log::info!("Configuration reloaded"),
                Ok(false) => log::warn!("Configuration reloaded with unresolved levels"),
                Err(e) => log::error!("Failed to reload configuration: {}", e),
            }
        });
        if !posted {
            log::warn!("UI queue closed, reload dropped");
            self.queue_closed = true;
        }
        posted
    }

    /// Starts polling on a background thread
    ///
    /// Returns a handle that can be used to stop watching. Polling also ends
    /// once the UI queue has been dropped.
    pub fn start_watching(mut self) -> WatchHandle {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            log::info!("Watching {} level file(s)", self.files.len());

            loop {
                match rx.recv_timeout(self.check_interval) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                self.check_for_changes();
                if self.queue_closed {
                    break;
                }
            }
            log::info!("Level file watcher stopped");
        });

        WatchHandle {
            stop_tx: tx,
            thread_handle: Some(handle),
        }
    }
}

/// Handle for a running watcher
///
/// Dropping this handle will stop the watcher thread.
pub struct WatchHandle {
    stop_tx: mpsc::Sender<()>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl WatchHandle {
    /// Stops the watcher and waits for the thread to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
