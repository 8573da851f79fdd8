//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself, so edits
//! made by replacing the file (write a temp file, rename over) keep being
//! observed after the original inode is gone.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

/// Error type for starting the watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("config path {0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("watch error: {0}")]
    Notify(#[from] notify::Error),
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as updates are wanted.
    /// Once the receiver is dropped, further changes are ignored.
    pub fn run(self) -> Result<RecommendedWatcher, WatchError> {
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| WatchError::NoFileName(self.path.clone()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tx = self.update_tx;
        let path = self.path.clone();
        let mut closed = false;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!("Watch error: {:?}", e);
                        return;
                    }
                };
                if closed || !is_config_change(&event, &file_name) {
                    return;
                }

                tracing::info!("Config file change detected, reloading...");
                match load_config(&path) {
                    Ok(new_config) => {
                        if tx.send(new_config).is_err() {
                            closed = true;
                            tracing::warn!("Config receiver dropped, ignoring further changes");
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to reload config: {}. Keeping current configuration.",
                            e
                        );
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

/// Whether `event` created or modified the file named `file_name`.
fn is_config_change(event: &Event, file_name: &OsString) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind};
    use std::fs;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("log-endpoint-watch-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn level_config(level: &str) -> String {
        format!("[observability]\nlog_level = \"{level}\"\n")
    }

    /// Wait until a config with `level` arrives, skipping duplicates of earlier ones.
    async fn wait_for_level(rx: &mut mpsc::UnboundedReceiver<AppConfig>, level: &str) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        loop {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(config)) if config.observability.log_level == level => return true,
                Ok(Some(_)) => continue,
                _ => return false,
            }
        }
    }

    #[test]
    fn test_event_filter_matches_file_name_only() {
        let name = OsString::from("app.toml");
        let event = |kind, path: &str| Event::new(kind).add_path(PathBuf::from(path));

        assert!(is_config_change(
            &event(EventKind::Modify(ModifyKind::Any), "/etc/svc/app.toml"),
            &name
        ));
        assert!(is_config_change(
            &event(EventKind::Create(CreateKind::File), "/etc/svc/app.toml"),
            &name
        ));
        assert!(!is_config_change(
            &event(EventKind::Modify(ModifyKind::Any), "/etc/svc/app.toml.tmp"),
            &name
        ));
        assert!(!is_config_change(
            &event(EventKind::Remove(RemoveKind::File), "/etc/svc/app.toml"),
            &name
        ));
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let (watcher, _rx) = ConfigWatcher::new(Path::new("/"));
        assert!(matches!(watcher.run(), Err(WatchError::NoFileName(_))));
    }

    #[tokio::test]
    async fn test_reloads_survive_atomic_replace_and_skip_invalid() {
        let dir = temp_dir();
        let path = dir.join("app.toml");
        fs::write(&path, level_config("info")).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _watcher = watcher.run().unwrap();

        fs::write(&path, level_config("debug")).unwrap();
        assert!(wait_for_level(&mut rx, "debug").await, "in-place write not reloaded");

        // Replace the file the way editors and configmaps do.
        let tmp = dir.join("app.toml.tmp");
        fs::write(&tmp, level_config("trace")).unwrap();
        fs::rename(&tmp, &path).unwrap();
        assert!(wait_for_level(&mut rx, "trace").await, "atomic replace not reloaded");

        fs::write(&path, "[timeouts]\nrequest_secs = 0\n").unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        while let Ok(config) = rx.try_recv() {
            // A read racing the truncate may see an empty file; the invalid one never passes.
            assert_ne!(config.timeouts.request_secs, 0);
        }

        fs::write(&path, level_config("warn")).unwrap();
        assert!(wait_for_level(&mut rx, "warn").await, "edit after replace not reloaded");

        let _ = fs::remove_dir_all(&dir);
    }
}
