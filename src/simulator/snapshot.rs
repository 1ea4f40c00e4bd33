//! Simulated metrics data model.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

/// Complete value of the simulated metrics at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub disk: DiskMetrics,
    pub network: NetworkMetrics,
    /// Sorted by `cpu_percent`, highest first.
    pub processes: Vec<ProcessInfo>,
}

impl MetricsSnapshot {
    pub fn memory_percent(&self) -> f64 {
        self.memory.percent_used()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuMetrics {
    pub usage_percent: f64,
    pub core_count: u32,
    pub frequency_ghz: f64,
}

/// Installed and used memory. Available memory is derived on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMetrics {
    used_gb: f64,
    total_gb: f64,
}

impl MemoryMetrics {
    pub fn new(used_gb: f64, total_gb: f64) -> Self {
        Self { used_gb, total_gb }
    }

    pub fn used_gb(&self) -> f64 {
        self.used_gb
    }

    pub fn total_gb(&self) -> f64 {
        self.total_gb
    }

    pub fn available_gb(&self) -> f64 {
        self.total_gb - self.used_gb
    }

    pub fn percent_used(&self) -> f64 {
        (self.used_gb / self.total_gb) * 100.0
    }

    pub fn set_used_gb(&mut self, used_gb: f64) {
        self.used_gb = used_gb;
    }
}

impl Serialize for MemoryMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MemoryMetrics", 3)?;
        state.serialize_field("used_gb", &self.used_gb)?;
        state.serialize_field("total_gb", &self.total_gb)?;
        state.serialize_field("available_gb", &self.available_gb())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskMetrics {
    pub read_mbps: f64,
    pub write_mbps: f64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub sent_kbps: f64,
    pub received_kbps: f64,
}

/// One row of the simulated process table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: u32,
    pub cpu_percent: f64,
    pub memory_mb: f64,
    pub load: LoadTag,
    pub state: RunState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTag {
    Low,
    Medium,
    High,
}

impl LoadTag {
    /// Map an independent unit draw onto a tag.
    pub fn from_draw(draw: f64) -> Self {
        if draw > 0.8 {
            Self::High
        } else if draw > 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for LoadTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Ready,
    Waiting,
    Sleeping,
}

impl RunState {
    pub const ALL: [RunState; 4] = [
        RunState::Running,
        RunState::Ready,
        RunState::Waiting,
        RunState::Sleeping,
    ];

    /// Pick a state uniformly from a unit draw.
    pub fn from_draw(draw: f64) -> Self {
        let idx = ((draw * Self::ALL.len() as f64) as usize).min(Self::ALL.len() - 1);
        Self::ALL[idx]
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Ready => write!(f, "ready"),
            Self::Waiting => write!(f, "waiting"),
            Self::Sleeping => write!(f, "sleeping"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Cpu,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
}

/// Threshold crossing derived from a snapshot. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
}
