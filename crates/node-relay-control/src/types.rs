//! Configuration types for the control layer.
//!
//! Every field has a default matching a stock Raspberry Pi control node, so
//! an empty configuration is a working one.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::runner::CommandSpec;

/// Configuration for the event relay pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Maximum number of messages waiting for the dispatcher.
    #[serde(default = "RelayConfig::default_capacity")]
    pub queue_capacity: usize,

    /// Publisher command. The topic and payload are appended as arguments.
    #[serde(default = "RelayConfig::default_publisher")]
    pub publisher: CommandSpec,
}

impl RelayConfig {
    const fn default_capacity() -> usize {
        1000
    }

    fn default_publisher() -> CommandSpec {
        CommandSpec::new("salt-call", ["event.send"])
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            queue_capacity: Self::default_capacity(),
            publisher: Self::default_publisher(),
        }
    }
}

/// Configuration for the network mode controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The configuration file the DHCP client daemon reads.
    #[serde(default = "NetworkConfig::default_active")]
    pub active_path: PathBuf,

    /// The alternate configuration swapped in on toggle.
    #[serde(default = "NetworkConfig::default_backup")]
    pub backup_path: PathBuf,

    /// Scratch path used during the swap.
    #[serde(default = "NetworkConfig::default_temp")]
    pub temp_path: PathBuf,

    /// Line prefix that marks a static address declaration.
    #[serde(default = "NetworkConfig::default_marker")]
    pub static_marker: String,

    /// Command that restarts the DHCP client daemon.
    #[serde(default = "NetworkConfig::default_restart")]
    pub restart: CommandSpec,
}

impl NetworkConfig {
    fn default_active() -> PathBuf {
        PathBuf::from("/etc/dhcpcd.conf")
    }

    fn default_backup() -> PathBuf {
        PathBuf::from("/etc/dhcpcd.conf.other")
    }

    fn default_temp() -> PathBuf {
        PathBuf::from("/etc/dhcpcd.conf.temp")
    }

    fn default_marker() -> String {
        "static ip_address".to_string()
    }

    fn default_restart() -> CommandSpec {
        CommandSpec::new("sudo", ["systemctl", "restart", "dhcpcd"])
    }

    /// Configuration rooted at `active`, with the backup and scratch files
    /// next to it using the `.other` and `.temp` suffixes.
    #[must_use]
    pub fn with_active_path(active: impl Into<PathBuf>) -> Self {
        let active = active.into();
        let mut backup = active.clone().into_os_string();
        backup.push(".other");
        let mut temp = active.clone().into_os_string();
        temp.push(".temp");

        Self {
            active_path: active,
            backup_path: backup.into(),
            temp_path: temp.into(),
            ..Self::default()
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            active_path: Self::default_active(),
            backup_path: Self::default_backup(),
            temp_path: Self::default_temp(),
            static_marker: Self::default_marker(),
            restart: Self::default_restart(),
        }
    }
}

/// Commands behind the passthrough endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Reboots the node.
    #[serde(default = "SystemConfig::default_reboot")]
    pub reboot: CommandSpec,

    /// Lists running containers.
    #[serde(default = "SystemConfig::default_container_status")]
    pub container_status: CommandSpec,
}

impl SystemConfig {
    fn default_reboot() -> CommandSpec {
        CommandSpec::new("sudo", ["reboot"])
    }

    fn default_container_status() -> CommandSpec {
        CommandSpec::new("docker", ["ps"])
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            reboot: Self::default_reboot(),
            container_status: Self::default_container_status(),
        }
    }
}

/// Settings shared by every external command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Maximum run time of a single command in seconds.
    #[serde(default = "CommandConfig::default_timeout")]
    pub timeout_seconds: u64,
}

impl CommandConfig {
    const fn default_timeout() -> u64 {
        30
    }

    /// Get the command timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: Self::default_timeout(),
        }
    }
}

/// Complete control layer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Event relay settings.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Network mode settings.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Passthrough command settings.
    #[serde(default)]
    pub system: SystemConfig,
    /// External command settings.
    #[serde(default)]
    pub command: CommandConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ControlConfig::default();
        assert_eq!(config.relay.queue_capacity, 1000);
        assert_eq!(config.relay.publisher.program, "salt-call");
        assert_eq!(config.network.active_path, PathBuf::from("/etc/dhcpcd.conf"));
        assert_eq!(
            config.network.backup_path,
            PathBuf::from("/etc/dhcpcd.conf.other")
        );
        assert_eq!(config.network.static_marker, "static ip_address");
        assert_eq!(config.command.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn sibling_paths() {
        let config = NetworkConfig::with_active_path("/tmp/x/dhcpcd.conf");
        assert_eq!(config.backup_path, PathBuf::from("/tmp/x/dhcpcd.conf.other"));
        assert_eq!(config.temp_path, PathBuf::from("/tmp/x/dhcpcd.conf.temp"));
        assert_eq!(config.static_marker, "static ip_address");
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: ControlConfig =
            serde_json::from_str(r#"{"relay": {"queue_capacity": 5}}"#).unwrap();
        assert_eq!(config.relay.queue_capacity, 5);
        assert_eq!(config.relay.publisher.args, vec!["event.send".to_string()]);
        assert_eq!(config.command.timeout_seconds, 30);
    }
}
