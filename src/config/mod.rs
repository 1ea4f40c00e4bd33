//! Configuration system for Osviz

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every process in a table needs its own pid from 1000..=9999.
pub const MAX_CATALOG_LEN: usize = 9000;

/// Reasons a configuration is refused at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("simulator.total_memory_gb must be a positive number, got {0}")]
    TotalMemory(f64),
    #[error("simulator.core_count must be at least 1")]
    CoreCount,
    #[error("simulator.frequency_ghz must be a positive number, got {0}")]
    Frequency(f64),
    #[error("simulator.update_interval_ms must be greater than zero")]
    UpdateInterval,
    #[error("alerts.{name} must be in (0, 100], got {value}")]
    Threshold { name: &'static str, value: f64 },
    #[error("simulator.process_catalog has {0} names but only {max} pids are available", max = MAX_CATALOG_LEN)]
    CatalogSize(usize),
    #[error("chat typing delay range is inverted: min {min}ms > max {max}ms")]
    TypingDelay { min: u64, max: u64 },
}

/// Global application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub simulator: SimulatorConfig,
    pub alerts: AlertConfig,
    pub chat: ChatConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("osviz").join("config.toml"))
    }

    /// Reject values that would make percentage or alert math undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulator;
        if !(sim.total_memory_gb.is_finite() && sim.total_memory_gb > 0.0) {
            return Err(ConfigError::TotalMemory(sim.total_memory_gb));
        }
        if sim.core_count == 0 {
            return Err(ConfigError::CoreCount);
        }
        if !(sim.frequency_ghz.is_finite() && sim.frequency_ghz > 0.0) {
            return Err(ConfigError::Frequency(sim.frequency_ghz));
        }
        if sim.update_interval_ms == 0 {
            return Err(ConfigError::UpdateInterval);
        }
        if sim.process_catalog.len() > MAX_CATALOG_LEN {
            return Err(ConfigError::CatalogSize(sim.process_catalog.len()));
        }

        for (name, value) in [
            ("cpu_threshold", self.alerts.cpu_threshold),
            ("memory_threshold", self.alerts.memory_threshold),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                return Err(ConfigError::Threshold { name, value });
            }
        }

        if self.chat.typing_delay_min_ms > self.chat.typing_delay_max_ms {
            return Err(ConfigError::TypingDelay {
                min: self.chat.typing_delay_min_ms,
                max: self.chat.typing_delay_max_ms,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub update_interval_ms: u64,
    pub core_count: u32,
    pub frequency_ghz: f64,
    pub total_memory_gb: f64,
    pub max_processes: usize,
    pub process_catalog: Vec<String>,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 2000,
            core_count: 8,
            frequency_ghz: 3.5,
            total_memory_gb: 16.0,
            max_processes: 10,
            process_catalog: [
                "systemd",
                "kworker",
                "sshd",
                "Xorg",
                "pulseaudio",
                "firefox",
                "code",
                "node",
                "python3",
                "postgres",
                "nginx",
                "dockerd",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    pub cpu_threshold: f64,
    pub memory_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cpu_threshold: 85.0,
            memory_threshold: 85.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub typing_delay_min_ms: u64,
    pub typing_delay_max_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_min_ms: 1000,
            typing_delay_max_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: String,
    pub cpu_history_len: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "tokyo-night".to_string(),
            cpu_history_len: 60,
        }
    }
}

/// Write a default configuration file
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::default().save(path)?;
    println!("Created {}", path.display());
    Ok(())
}
