//! Configuration file watcher for hot reload.
//!
//! Only the gate section is applied live. Editors and notify tend to emit
//! several events per save, so a reload that yields the same gate as the one
//! already in force is dropped instead of being sent again.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    reloader: Reloader,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher for the file that produced `current`.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(
        path: &Path,
        current: GatewayConfig,
    ) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                reloader: Reloader::new(path, current),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            mut reloader,
            update_tx,
        } = self;
        let path = reloader.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    if let Some(config) = reloader.reload() {
                        let _ = update_tx.send(config);
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Reloads the file and decides whether the result is worth sending.
struct Reloader {
    path: PathBuf,
    current: GatewayConfig,
}

impl Reloader {
    fn new(path: &Path, current: GatewayConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            current,
        }
    }

    /// The freshly loaded configuration, if its gate differs from the one in force.
    fn reload(&mut self) -> Option<GatewayConfig> {
        let next = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to reload config, keeping current configuration"
                );
                return None;
            }
        };

        if next == self.current {
            tracing::debug!("Config file unchanged, skipping reload");
            return None;
        }

        let gate_changed = next.gate != self.current.gate;
        if !needs_no_restart(&self.current, &next) {
            tracing::warn!("Only the gate section reloads live; other changes apply after a restart");
        }
        self.current = next;

        if gate_changed {
            tracing::info!("Config file change detected, reloading session gate");
            Some(self.current.clone())
        } else {
            None
        }
    }
}

/// Whether every difference between the two configurations is in the gate section.
fn needs_no_restart(current: &GatewayConfig, next: &GatewayConfig) -> bool {
    let mut masked = next.clone();
    masked.gate = current.gate.clone();
    masked == *current
}
