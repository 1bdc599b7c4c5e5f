//! Network addressing mode control.
//!
//! The DHCP client daemon reads a single configuration file. A node that can
//! switch modes keeps a second file next to it; toggling swaps the two by
//! name and restarts the daemon.
//!
//! # State Machine
//!
//! ```text
//!            toggle()
//!   ┌──────┐ ───────▶ ┌────────┐
//!   │ Dhcp │          │ Static │
//!   └──────┘ ◀─────── └────────┘
//!            toggle()
//! ```
//!
//! The mode is never stored. It is read from the active file on demand: a
//! line starting with the static marker means `Static`, otherwise `Dhcp`.
//!
//! # Swap sequence
//!
//! 1. active → temp
//! 2. backup → active
//! 3. temp → backup
//! 4. restart the daemon
//!
//! The whole sequence holds the write side of a lock and mode reads hold
//! the read side, so toggles are serialized and readers never see a missing
//! active file. A failing step is reported as-is with no rollback. If step 3
//! fails the backup file is missing and later toggles are refused until an
//! operator restores it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{ControlError, Result};
use crate::runner::CommandRunner;
use crate::types::NetworkConfig;

/// How the node obtains its network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    /// Address assigned by a DHCP server.
    Dhcp,
    /// Address declared in the configuration file.
    Static,
}

impl NetworkMode {
    /// Returns the lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dhcp => "dhcp",
            Self::Static => "static",
        }
    }

    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dhcp => Self::Static,
            Self::Static => Self::Dhcp,
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine the mode declared by a configuration file's contents.
#[must_use]
pub fn detect_mode(contents: &str, static_marker: &str) -> NetworkMode {
    if contents.lines().any(|line| line.starts_with(static_marker)) {
        NetworkMode::Static
    } else {
        NetworkMode::Dhcp
    }
}

/// Reads and switches the node's addressing mode.
pub struct NetworkModeController<R: CommandRunner> {
    config: NetworkConfig,
    runner: Arc<R>,
    swap_lock: RwLock<()>,
}

impl<R: CommandRunner> NetworkModeController<R> {
    /// Create a controller for the configured file pair.
    #[must_use]
    pub fn new(config: NetworkConfig, runner: Arc<R>) -> Self {
        Self {
            config,
            runner,
            swap_lock: RwLock::new(()),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Read the current mode from the active file.
    ///
    /// Waits for any toggle in progress, so the swap is never observed
    /// half-done.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Io` if the active file cannot be read.
    pub async fn current_mode(&self) -> Result<NetworkMode> {
        let _guard = self.swap_lock.read().await;
        self.read_mode().await
    }

    async fn read_mode(&self) -> Result<NetworkMode> {
        let path = &self.config.active_path;
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read network config");
            ControlError::io(path, e)
        })?;

        Ok(detect_mode(&contents, &self.config.static_marker))
    }

    /// Returns true if both files of the pair exist.
    pub async fn can_toggle(&self) -> bool {
        self.check_preconditions().await.is_ok()
    }

    /// Check that both files of the pair exist.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Precondition` naming the missing file, or
    /// `ControlError::Io` if existence cannot be determined.
    pub async fn check_preconditions(&self) -> Result<()> {
        for path in [&self.config.active_path, &self.config.backup_path] {
            let exists = tokio::fs::try_exists(path)
                .await
                .map_err(|e| ControlError::io(path, e))?;
            if !exists {
                tracing::warn!(path = %path.display(), "Network config file missing, cannot toggle");
                return Err(ControlError::Precondition(format!(
                    "{} does not exist",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Swap the active and backup files and restart the daemon.
    ///
    /// Returns the mode read back from the new active file.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Precondition` without touching the filesystem if
    /// either file is missing. Otherwise returns the error of the first
    /// failing step, leaving the files as that step left them.
    pub async fn toggle(&self) -> Result<NetworkMode> {
        let _guard = self.swap_lock.write().await;

        self.check_preconditions().await?;

        let NetworkConfig {
            active_path,
            backup_path,
            temp_path,
            restart,
            ..
        } = &self.config;

        rename(active_path, temp_path).await?;
        rename(backup_path, active_path).await?;
        rename(temp_path, backup_path).await?;

        self.runner.run(restart, &[]).await.map_err(|e| {
            tracing::error!(command = %restart, error = %e, "Failed to restart network service");
            ControlError::from(e)
        })?;

        let mode = self.read_mode().await?;
        tracing::info!(mode = %mode, "Network mode toggled");
        Ok(mode)
    }
}

async fn rename(from: &Path, to: &Path) -> Result<()> {
    tokio::fs::rename(from, to).await.map_err(|e| {
        tracing::error!(
            from = %from.display(),
            to = %to.display(),
            error = %e,
            "Failed to rename network config"
        );
        ControlError::io(from, e)
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::mock::MockCommandRunner;
    use crate::runner::CommandSpec;

    const DHCP_CONF: &str = "hostname\nclientid\npersistent\n";
    const STATIC_CONF: &str = "hostname\ninterface eth0\nstatic ip_address 192.168.1.5/24\nstatic routers=192.168.1.1\n";

    fn setup(
        active: Option<&str>,
        backup: Option<&str>,
    ) -> (
        NetworkModeController<MockCommandRunner>,
        Arc<MockCommandRunner>,
        TempDir,
    ) {
        let dir = TempDir::new().unwrap();
        let mut config = NetworkConfig::with_active_path(dir.path().join("dhcpcd.conf"));
        config.restart = CommandSpec::new("systemctl", ["restart", "dhcpcd"]);

        if let Some(contents) = active {
            std::fs::write(&config.active_path, contents).unwrap();
        }
        if let Some(contents) = backup {
            std::fs::write(&config.backup_path, contents).unwrap();
        }

        let runner = Arc::new(MockCommandRunner::new());
        let controller = NetworkModeController::new(config, Arc::clone(&runner));
        (controller, runner, dir)
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn detect_static_marker() {
        assert_eq!(detect_mode(STATIC_CONF, "static ip_address"), NetworkMode::Static);
        assert_eq!(detect_mode(DHCP_CONF, "static ip_address"), NetworkMode::Dhcp);
        // Commented-out and indented lines do not count.
        assert_eq!(
            detect_mode("# static ip_address 10.0.0.2/24\n", "static ip_address"),
            NetworkMode::Dhcp
        );
        assert_eq!(detect_mode("", "static ip_address"), NetworkMode::Dhcp);
    }

    #[test]
    fn mode_names() {
        assert_eq!(NetworkMode::Dhcp.to_string(), "dhcp");
        assert_eq!(NetworkMode::Static.as_str(), "static");
        assert_eq!(NetworkMode::Dhcp.toggled(), NetworkMode::Static);
        assert_eq!(
            serde_json::to_string(&NetworkMode::Static).unwrap(),
            "\"static\""
        );
    }

    #[tokio::test]
    async fn current_mode_reads_active_file() {
        let (controller, _runner, _dir) = setup(Some(STATIC_CONF), None);
        assert_eq!(controller.current_mode().await.unwrap(), NetworkMode::Static);

        let (controller, _runner, _dir) = setup(Some(DHCP_CONF), None);
        assert_eq!(controller.current_mode().await.unwrap(), NetworkMode::Dhcp);
    }

    #[tokio::test]
    async fn current_mode_missing_file_is_io_error() {
        let (controller, _runner, _dir) = setup(None, None);
        let result = controller.current_mode().await;
        assert!(matches!(result, Err(ControlError::Io { .. })));
    }

    #[tokio::test]
    async fn toggle_swaps_files_and_restarts_once() {
        let (controller, runner, _dir) = setup(Some(DHCP_CONF), Some(STATIC_CONF));

        let mode = controller.toggle().await.unwrap();
        assert_eq!(mode, NetworkMode::Static);
        assert_eq!(controller.current_mode().await.unwrap(), NetworkMode::Static);

        let config = controller.config();
        assert_eq!(read(&config.active_path), STATIC_CONF);
        assert_eq!(read(&config.backup_path), DHCP_CONF);
        assert!(!config.temp_path.exists());

        let restarts = runner.calls_to("systemctl");
        assert_eq!(restarts.len(), 1);
        assert_eq!(restarts[0].args, vec!["restart", "dhcpcd"]);
    }

    #[tokio::test]
    async fn toggle_round_trip() {
        let (controller, runner, _dir) = setup(Some(DHCP_CONF), Some(STATIC_CONF));
        let before = controller.current_mode().await.unwrap();

        controller.toggle().await.unwrap();
        controller.toggle().await.unwrap();

        assert_eq!(controller.current_mode().await.unwrap(), before);
        assert_eq!(read(&controller.config().active_path), DHCP_CONF);
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn toggle_without_backup_changes_nothing() {
        let (controller, runner, _dir) = setup(Some(DHCP_CONF), None);
        assert!(!controller.can_toggle().await);

        let result = controller.toggle().await;
        assert!(matches!(result, Err(ControlError::Precondition(_))));

        let config = controller.config();
        assert_eq!(read(&config.active_path), DHCP_CONF);
        assert!(!config.backup_path.exists());
        assert!(!config.temp_path.exists());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn toggle_without_active_changes_nothing() {
        let (controller, runner, _dir) = setup(None, Some(STATIC_CONF));

        let result = controller.toggle().await;
        assert!(matches!(result, Err(ControlError::Precondition(_))));
        assert_eq!(read(&controller.config().backup_path), STATIC_CONF);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn restart_failure_is_reported_after_swap() {
        let (controller, runner, _dir) = setup(Some(DHCP_CONF), Some(STATIC_CONF));
        runner.fail_program("systemctl");

        let result = controller.toggle().await;
        assert!(matches!(result, Err(ControlError::Command(_))));

        // No rollback: the files stay swapped.
        assert_eq!(read(&controller.config().active_path), STATIC_CONF);
        assert_eq!(read(&controller.config().backup_path), DHCP_CONF);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_are_serialized() {
        let (controller, runner, _dir) = setup(Some(DHCP_CONF), Some(STATIC_CONF));
        runner.set_delay(Duration::from_millis(5));
        let controller = Arc::new(controller);

        let mut tasks = Vec::new();
        for _ in 0..7 {
            let controller = Arc::clone(&controller);
            tasks.push(tokio::spawn(async move { controller.toggle().await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // Seven transitions from DHCP end on static, with both files intact.
        let config = controller.config();
        assert_eq!(read(&config.active_path), STATIC_CONF);
        assert_eq!(read(&config.backup_path), DHCP_CONF);
        assert!(!config.temp_path.exists());
        assert_eq!(runner.calls_to("systemctl").len(), 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_during_toggles_never_see_missing_file() {
        let (controller, _runner, _dir) = setup(Some(DHCP_CONF), Some(STATIC_CONF));
        let controller = Arc::new(controller);
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let mut readers = Vec::new();
        for _ in 0..3 {
            let controller = Arc::clone(&controller);
            let done = Arc::clone(&done);
            readers.push(tokio::spawn(async move {
                let mut failures = 0usize;
                while !done.load(std::sync::atomic::Ordering::Relaxed) {
                    if controller.current_mode().await.is_err() {
                        failures += 1;
                    }
                    tokio::task::yield_now().await;
                }
                failures
            }));
        }

        for _ in 0..100 {
            controller.toggle().await.unwrap();
        }
        done.store(true, std::sync::atomic::Ordering::Relaxed);

        for reader in readers {
            assert_eq!(reader.await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn first_rename_failure_leaves_files_untouched() {
        let (controller, runner, dir) = setup(Some(DHCP_CONF), Some(STATIC_CONF));
        let mut config = controller.config().clone();
        config.temp_path = dir.path().join("missing").join("dhcpcd.conf.temp");
        let controller = NetworkModeController::new(config, Arc::clone(&runner));

        let result = controller.toggle().await;
        match result {
            Err(ControlError::Io { path, .. }) => {
                assert_eq!(path, controller.config().active_path);
            }
            other => panic!("expected Io error, got {other:?}"),
        }

        let config = controller.config();
        assert_eq!(read(&config.active_path), DHCP_CONF);
        assert_eq!(read(&config.backup_path), STATIC_CONF);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn second_rename_failure_leaves_active_in_temp() {
        // A backup directory cannot be moved into itself.
        let dir = TempDir::new().unwrap();
        let backup = dir.path().join("dhcpcd.conf.other");
        std::fs::create_dir(&backup).unwrap();
        let mut config = NetworkConfig::with_active_path(backup.join("dhcpcd.conf"));
        config.backup_path = backup.clone();
        config.temp_path = dir.path().join("dhcpcd.conf.temp");
        std::fs::write(&config.active_path, DHCP_CONF).unwrap();

        let runner = Arc::new(MockCommandRunner::new());
        let controller = NetworkModeController::new(config, Arc::clone(&runner));

        let result = controller.toggle().await;
        match result {
            Err(ControlError::Io { path, .. }) => assert_eq!(path, backup),
            other => panic!("expected Io error, got {other:?}"),
        }

        // No rollback: step 1 stays applied.
        let config = controller.config();
        assert!(!config.active_path.exists());
        assert_eq!(read(&config.temp_path), DHCP_CONF);
        assert!(config.backup_path.is_dir());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn third_rename_failure_leaves_no_backup() {
        // The scratch file sits inside the backup directory, which step 2
        // moves away, so step 3 finds no source.
        let dir = TempDir::new().unwrap();
        let backup = dir.path().join("dhcpcd.conf.other");
        std::fs::create_dir(&backup).unwrap();
        let mut config = NetworkConfig::with_active_path(dir.path().join("dhcpcd.conf"));
        config.backup_path = backup.clone();
        config.temp_path = backup.join("dhcpcd.conf.temp");
        std::fs::write(&config.active_path, DHCP_CONF).unwrap();

        let runner = Arc::new(MockCommandRunner::new());
        let controller = NetworkModeController::new(config, Arc::clone(&runner));

        let result = controller.toggle().await;
        let config = controller.config();
        match result {
            Err(ControlError::Io { path, .. }) => assert_eq!(path, config.temp_path),
            other => panic!("expected Io error, got {other:?}"),
        }

        assert!(!config.backup_path.exists());
        assert!(config.active_path.is_dir());
        assert_eq!(
            read(&config.active_path.join("dhcpcd.conf.temp")),
            DHCP_CONF
        );
        assert!(runner.calls().is_empty());
    }
}
