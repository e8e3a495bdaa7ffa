use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use crate::error::ConfigError;

/// Tunables shared by every router of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Minimum seconds between two re-announcements of the same destination.
    pub update_window: u64,
    /// Seconds between two rounds of self-originated probes.
    pub send_cycle: u64,
    /// Bound of each router's inbound probe queue.
    pub queue_capacity: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            update_window: 1,
            send_cycle: 1,
            queue_capacity: 1000,
        }
    }
}

impl ProtocolConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ProtocolConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.send_cycle == 0 {
            return Err(ConfigError::ZeroSendCycle);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }

    pub fn update_window(&self) -> Duration {
        Duration::from_secs(self.update_window)
    }

    pub fn send_cycle(&self) -> Duration {
        Duration::from_secs(self.send_cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ProtocolConfig = serde_json::from_str(r#"{ "send_cycle": 5 }"#).unwrap();
        assert_eq!(config.send_cycle, 5);
        assert_eq!(config.update_window, 1);
        assert_eq!(config.queue_capacity, 1000);
    }

    #[test]
    fn zero_queue_is_rejected() {
        let config = ProtocolConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroQueueCapacity));
    }

    #[test]
    fn zero_send_cycle_is_rejected() {
        let config = ProtocolConfig {
            send_cycle: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSendCycle));
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("hula-config-{}.json", std::process::id()));
        let config = ProtocolConfig {
            update_window: 3,
            send_cycle: 2,
            queue_capacity: 16,
        };
        config.save(&path).unwrap();
        let loaded = ProtocolConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
