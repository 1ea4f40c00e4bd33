//! Simulated operating-system metrics.
//!
//! [`MetricsSimulator`] owns a single [`MetricsSnapshot`] and advances it with
//! bounded random walks on every [`tick`](MetricsSimulator::tick). Each tick
//! builds the next snapshot off to the side and swaps it in whole, so readers
//! only ever observe a fully updated snapshot or the previous one.

pub mod random;
pub mod report;
pub mod snapshot;

use std::collections::HashSet;
use thiserror::Error;

use crate::config::{AlertConfig, Config, ConfigError, SimulatorConfig};

pub use random::{RandomSource, StdRandom};
pub use snapshot::{
    AlertEvent, AlertKind, CpuMetrics, DiskMetrics, LoadTag, MemoryMetrics, MetricsSnapshot,
    NetworkMetrics, ProcessInfo, RunState, Severity,
};

pub const CPU_USAGE_MIN: f64 = 5.0;
pub const CPU_USAGE_MAX: f64 = 95.0;
const CPU_STEP: f64 = 5.0;

pub const MEMORY_USED_MIN_GB: f64 = 2.0;
pub const MEMORY_USED_MAX_GB: f64 = 14.0;
const MEMORY_STEP_GB: f64 = 0.25;

const DISK_READ_MAX_MBPS: f64 = 150.0;
const DISK_WRITE_MAX_MBPS: f64 = 100.0;
const NET_SENT_MAX_KBPS: f64 = 500.0;
const NET_RECEIVED_MAX_KBPS: f64 = 800.0;

const PID_MIN: u32 = 1000;
const PID_MAX: u32 = 9999;
/// Distinct pids available to one table.
pub const PID_SLOTS: u32 = PID_MAX - PID_MIN + 1;
const PROCESS_CPU_MAX: f64 = 25.0;
const PROCESS_MEMORY_MAX_MB: f64 = 1024.0;

const SEED_CPU_USAGE: f64 = 35.0;
const SEED_MEMORY_USED_GB: f64 = 8.5;
const SEED_DISK_USAGE: f64 = 45.0;

pub const CPU_ALERT_MESSAGE: &str =
    "High CPU usage detected! Consider closing unnecessary applications.";
pub const MEMORY_ALERT_MESSAGE: &str =
    "High memory usage detected! The system may start swapping to disk.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    #[error("invalid simulator configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("no process with pid {0} in the current table")]
    ProcessNotFound(u32),
}

pub struct MetricsSimulator {
    snapshot: MetricsSnapshot,
    settings: SimulatorConfig,
    thresholds: AlertConfig,
    rng: Box<dyn RandomSource>,
    ticks: u64,
}

impl MetricsSimulator {
    /// Build a simulator drawing from `StdRng`, seeded when the config asks for it.
    pub fn new(config: &Config) -> Result<Self, SimulatorError> {
        let rng = StdRandom::from_seed(config.simulator.seed);
        Self::with_random(config, Box::new(rng))
    }

    pub fn with_random(
        config: &Config,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, SimulatorError> {
        config.validate()?;

        let settings = config.simulator.clone();
        let (mem_min, mem_max) = memory_bounds(settings.total_memory_gb);

        let snapshot = MetricsSnapshot {
            cpu: CpuMetrics {
                usage_percent: SEED_CPU_USAGE,
                core_count: settings.core_count,
                frequency_ghz: settings.frequency_ghz,
            },
            memory: MemoryMetrics::new(
                SEED_MEMORY_USED_GB.clamp(mem_min, mem_max),
                settings.total_memory_gb,
            ),
            disk: DiskMetrics {
                read_mbps: 0.0,
                write_mbps: 0.0,
                usage_percent: SEED_DISK_USAGE,
            },
            network: NetworkMetrics {
                sent_kbps: 0.0,
                received_kbps: 0.0,
            },
            processes: Vec::new(),
        };

        tracing::debug!(
            cores = settings.core_count,
            total_memory_gb = settings.total_memory_gb,
            catalog = settings.process_catalog.len(),
            "metrics simulator initialised"
        );

        Ok(Self {
            snapshot,
            settings,
            thresholds: config.alerts.clone(),
            rng,
            ticks: 0,
        })
    }

    /// Advance every metric by one bounded random step.
    pub fn tick(&mut self) {
        let mut next = self.snapshot.clone();

        let cpu_delta = self.rng.uniform(-CPU_STEP, CPU_STEP);
        next.cpu.usage_percent =
            (next.cpu.usage_percent + cpu_delta).clamp(CPU_USAGE_MIN, CPU_USAGE_MAX);

        let (mem_min, mem_max) = memory_bounds(next.memory.total_gb());
        let mem_delta = self.rng.uniform(-MEMORY_STEP_GB, MEMORY_STEP_GB);
        next.memory
            .set_used_gb((next.memory.used_gb() + mem_delta).clamp(mem_min, mem_max));

        next.disk.read_mbps = self.rng.uniform(0.0, DISK_READ_MAX_MBPS);
        next.disk.write_mbps = self.rng.uniform(0.0, DISK_WRITE_MAX_MBPS);

        next.network.sent_kbps = self.rng.uniform(0.0, NET_SENT_MAX_KBPS);
        next.network.received_kbps = self.rng.uniform(0.0, NET_RECEIVED_MAX_KBPS);

        next.processes = self.generate_processes();

        self.snapshot = next;
        self.ticks += 1;

        tracing::debug!(
            tick = self.ticks,
            cpu = self.snapshot.cpu.usage_percent,
            memory_gb = self.snapshot.memory.used_gb(),
            "simulator tick"
        );
    }

    fn generate_processes(&mut self) -> Vec<ProcessInfo> {
        let mut taken = HashSet::with_capacity(self.settings.process_catalog.len());
        let mut processes: Vec<ProcessInfo> = self
            .settings
            .process_catalog
            .iter()
            .map(|name| {
                let drawn = (self.rng.uniform(PID_MIN as f64, PID_MAX as f64 + 1.0) as u32)
                    .clamp(PID_MIN, PID_MAX);
                let pid = next_free_pid(drawn, &taken);
                taken.insert(pid);
                ProcessInfo {
                    name: name.clone(),
                    pid,
                    cpu_percent: self.rng.uniform(0.0, PROCESS_CPU_MAX),
                    memory_mb: self.rng.uniform(0.0, PROCESS_MEMORY_MAX_MB),
                    load: LoadTag::from_draw(self.rng.uniform(0.0, 1.0)),
                    state: RunState::from_draw(self.rng.uniform(0.0, 1.0)),
                }
            })
            .collect();

        processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        processes.truncate(self.settings.max_processes);
        processes
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn update_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.settings.update_interval_ms)
    }

    /// Alerts raised by the current snapshot, CPU before memory.
    pub fn evaluate_alerts(&self) -> Vec<AlertEvent> {
        let mut alerts = Vec::with_capacity(2);

        if self.snapshot.cpu.usage_percent > self.thresholds.cpu_threshold {
            alerts.push(AlertEvent {
                kind: AlertKind::Cpu,
                severity: Severity::High,
                message: CPU_ALERT_MESSAGE.to_string(),
            });
        }

        if self.snapshot.memory_percent() > self.thresholds.memory_threshold {
            alerts.push(AlertEvent {
                kind: AlertKind::Memory,
                severity: Severity::High,
                message: MEMORY_ALERT_MESSAGE.to_string(),
            });
        }

        alerts
    }

    /// Find a process in the current table. Pids do not survive a tick.
    pub fn lookup_process(&self, pid: u32) -> Result<&ProcessInfo, SimulatorError> {
        self.snapshot
            .processes
            .iter()
            .find(|p| p.pid == pid)
            .ok_or(SimulatorError::ProcessNotFound(pid))
    }

    pub fn estimated_context_switches(&self) -> u64 {
        estimated_context_switches(self.snapshot.cpu.usage_percent)
    }
}

/// Narrative context-switch rate derived from CPU usage alone.
pub fn estimated_context_switches(usage_percent: f64) -> u64 {
    (usage_percent * 100.0).floor().max(0.0) as u64
}

/// First pid at or after `drawn` (wrapping within the pid range) not already in the table.
fn next_free_pid(drawn: u32, taken: &HashSet<u32>) -> u32 {
    (0..PID_SLOTS)
        .map(|step| PID_MIN + (drawn - PID_MIN + step) % PID_SLOTS)
        .find(|pid| !taken.contains(pid))
        .unwrap_or(drawn)
}

/// Used-memory range, capped at the installed total so available never goes negative.
fn memory_bounds(total_gb: f64) -> (f64, f64) {
    let max = MEMORY_USED_MAX_GB.min(total_gb);
    (MEMORY_USED_MIN_GB.min(max), max)
}

#[cfg(test)]
mod tests {
    use super::random::{MockRandomSource, ScriptedRandom};
    use super::*;

    fn simulator_with(config: &Config, rng: impl RandomSource + 'static) -> MetricsSimulator {
        MetricsSimulator::with_random(config, Box::new(rng)).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starts_from_seed_values() {
        let sim = simulator_with(&Config::default(), ScriptedRandom::constant(0.5));
        let snap = sim.snapshot();

        assert_eq!(snap.cpu.usage_percent, 35.0);
        assert_eq!(snap.cpu.core_count, 8);
        assert_eq!(snap.cpu.frequency_ghz, 3.5);
        assert_eq!(snap.memory.used_gb(), 8.5);
        assert_eq!(snap.memory.total_gb(), 16.0);
        assert_eq!(snap.memory.available_gb(), 7.5);
        assert_eq!(snap.disk.usage_percent, 45.0);
        assert_eq!(snap.disk.read_mbps, 0.0);
        assert_eq!(snap.network.received_kbps, 0.0);
        assert!(snap.processes.is_empty());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn refuses_invalid_config() {
        let mut config = Config::default();
        config.simulator.total_memory_gb = 0.0;
        let result = MetricsSimulator::with_random(&config, Box::new(ScriptedRandom::constant(0.5)));
        assert!(matches!(result, Err(SimulatorError::InvalidConfig(_))));

        let mut config = Config::default();
        config.alerts.cpu_threshold = 0.0;
        assert!(MetricsSimulator::new(&config).is_err());
    }

    #[test]
    fn tick_applies_scripted_draws() {
        let mut config = Config::default();
        config.simulator.process_catalog = vec!["init".to_string()];
        // cpu, memory, disk read, disk write, sent, received, then one process
        let draws = vec![0.9, 0.1, 0.2, 0.4, 0.6, 0.25, 0.0, 0.5, 0.25, 0.9, 0.3];
        let mut sim = simulator_with(&config, ScriptedRandom::new(draws));

        sim.tick();
        let snap = sim.snapshot();

        assert!(approx(snap.cpu.usage_percent, 39.0));
        assert!(approx(snap.memory.used_gb(), 8.3));
        assert_eq!(snap.memory.available_gb(), 16.0 - snap.memory.used_gb());
        assert!(approx(snap.disk.read_mbps, 30.0));
        assert!(approx(snap.disk.write_mbps, 40.0));
        assert!(approx(snap.network.sent_kbps, 300.0));
        assert!(approx(snap.network.received_kbps, 200.0));
        assert_eq!(snap.disk.usage_percent, 45.0);

        let process = &snap.processes[0];
        assert_eq!(process.name, "init");
        assert_eq!(process.pid, 1000);
        assert!(approx(process.cpu_percent, 12.5));
        assert!(approx(process.memory_mb, 256.0));
        assert_eq!(process.load, LoadTag::High);
        assert_eq!(process.state, RunState::Ready);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn tick_draws_once_per_field() {
        let config = Config::default();
        let catalog = config.simulator.process_catalog.len();
        let mut mock = MockRandomSource::new();
        mock.expect_uniform()
            .times(6 + catalog * 5)
            .returning(|low, high| (low + high) / 2.0);

        let mut sim = simulator_with(&config, mock);
        sim.tick();

        assert_eq!(sim.snapshot().cpu.usage_percent, 35.0);
    }

    #[test]
    fn upward_drift_is_clamped() {
        let mut sim = simulator_with(&Config::default(), ScriptedRandom::constant(0.999));
        for _ in 0..200 {
            sim.tick();
        }
        let snap = sim.snapshot();

        assert_eq!(snap.cpu.usage_percent, CPU_USAGE_MAX);
        assert_eq!(snap.memory.used_gb(), MEMORY_USED_MAX_GB);
        assert_eq!(snap.memory.available_gb(), 2.0);
    }

    #[test]
    fn downward_drift_is_clamped() {
        let mut sim = simulator_with(&Config::default(), ScriptedRandom::constant(0.0));
        for _ in 0..200 {
            sim.tick();
        }
        let snap = sim.snapshot();

        assert_eq!(snap.cpu.usage_percent, CPU_USAGE_MIN);
        assert_eq!(snap.memory.used_gb(), MEMORY_USED_MIN_GB);
        assert_eq!(snap.memory.available_gb(), 14.0);
    }

    #[test]
    fn small_machines_never_report_negative_available_memory() {
        let mut config = Config::default();
        config.simulator.total_memory_gb = 6.0;
        let mut sim = simulator_with(&config, ScriptedRandom::constant(0.999));

        assert_eq!(sim.snapshot().memory.used_gb(), 6.0);
        for _ in 0..50 {
            sim.tick();
        }
        assert_eq!(sim.snapshot().memory.used_gb(), 6.0);
        assert_eq!(sim.snapshot().memory.available_gb(), 0.0);
    }

    #[test]
    fn long_runs_stay_in_bounds() {
        let config = Config::default();
        let mut sim = MetricsSimulator::with_random(&config, Box::new(StdRandom::seeded(11))).unwrap();
        let expected_len = config
            .simulator
            .process_catalog
            .len()
            .min(config.simulator.max_processes);

        for _ in 0..2000 {
            sim.tick();
            let snap = sim.snapshot();

            assert!((CPU_USAGE_MIN..=CPU_USAGE_MAX).contains(&snap.cpu.usage_percent));
            assert!((MEMORY_USED_MIN_GB..=MEMORY_USED_MAX_GB).contains(&snap.memory.used_gb()));
            assert_eq!(
                snap.memory.available_gb(),
                snap.memory.total_gb() - snap.memory.used_gb()
            );
            assert!((0.0..DISK_READ_MAX_MBPS).contains(&snap.disk.read_mbps));
            assert!((0.0..DISK_WRITE_MAX_MBPS).contains(&snap.disk.write_mbps));
            assert!((0.0..NET_SENT_MAX_KBPS).contains(&snap.network.sent_kbps));
            assert!((0.0..NET_RECEIVED_MAX_KBPS).contains(&snap.network.received_kbps));

            assert_eq!(snap.processes.len(), expected_len);
            assert!(snap
                .processes
                .windows(2)
                .all(|w| w[0].cpu_percent >= w[1].cpu_percent));
            for p in &snap.processes {
                assert!((PID_MIN..=PID_MAX).contains(&p.pid));
                assert!((0.0..PROCESS_CPU_MAX).contains(&p.cpu_percent));
                assert!((0.0..PROCESS_MEMORY_MAX_MB).contains(&p.memory_mb));
            }
        }
    }

    #[test]
    fn table_shorter_than_limit_keeps_every_name() {
        let mut config = Config::default();
        config.simulator.max_processes = 50;
        let mut sim = MetricsSimulator::with_random(&config, Box::new(StdRandom::seeded(3))).unwrap();
        sim.tick();

        let mut names: Vec<_> = sim.snapshot().processes.iter().map(|p| p.name.clone()).collect();
        names.sort();
        let mut catalog = config.simulator.process_catalog.clone();
        catalog.sort();
        assert_eq!(names, catalog);
    }

    #[test]
    fn reading_twice_without_tick_is_stable() {
        let mut sim = MetricsSimulator::with_random(&Config::default(), Box::new(StdRandom::seeded(5))).unwrap();
        sim.tick();

        let first = sim.snapshot().clone();
        let second = sim.snapshot().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn no_alerts_at_seed_values() {
        let sim = simulator_with(&Config::default(), ScriptedRandom::constant(0.5));
        assert!(sim.evaluate_alerts().is_empty());
    }

    #[test]
    fn cpu_alert_is_independent_of_memory() {
        let mut config = Config::default();
        config.alerts.cpu_threshold = 30.0;
        let sim = simulator_with(&config, ScriptedRandom::constant(0.5));

        let alerts = sim.evaluate_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Cpu);
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[0].message, CPU_ALERT_MESSAGE);
    }

    #[test]
    fn memory_alert_is_independent_of_cpu() {
        // 8.5 of 16 GB is 53.125%
        let mut config = Config::default();
        config.alerts.memory_threshold = 50.0;
        let sim = simulator_with(&config, ScriptedRandom::constant(0.5));

        let alerts = sim.evaluate_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Memory);
        assert_eq!(alerts[0].message, MEMORY_ALERT_MESSAGE);
    }

    #[test]
    fn both_alerts_fire_cpu_first() {
        let mut config = Config::default();
        config.alerts.cpu_threshold = 30.0;
        config.alerts.memory_threshold = 50.0;
        let sim = simulator_with(&config, ScriptedRandom::constant(0.5));

        let kinds: Vec<_> = sim.evaluate_alerts().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::Cpu, AlertKind::Memory]);
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let mut config = Config::default();
        config.alerts.cpu_threshold = 35.0;
        let sim = simulator_with(&config, ScriptedRandom::constant(0.5));
        assert!(sim.evaluate_alerts().is_empty());
    }

    #[test]
    fn alerts_follow_drift_past_threshold() {
        let mut sim = simulator_with(&Config::default(), ScriptedRandom::constant(0.999));
        assert!(sim.evaluate_alerts().is_empty());

        for _ in 0..200 {
            sim.tick();
        }
        // cpu pinned at 95%, memory at 14/16 = 87.5%
        let kinds: Vec<_> = sim.evaluate_alerts().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::Cpu, AlertKind::Memory]);
    }

    #[test]
    fn lookup_finds_current_and_misses_stale_pids() {
        let mut config = Config::default();
        config.simulator.process_catalog = vec!["cron".to_string()];
        // second tick draws a different pid for the only process
        let mut draws = vec![0.5; 22];
        draws[6] = 0.0;
        let mut sim = simulator_with(&config, ScriptedRandom::new(draws));

        sim.tick();
        let found = sim.lookup_process(1000).unwrap().clone();
        assert_eq!(found, sim.snapshot().processes[0]);

        sim.tick();
        assert_eq!(
            sim.lookup_process(1000),
            Err(SimulatorError::ProcessNotFound(1000))
        );
        assert_eq!(sim.lookup_process(5500).unwrap().name, "cron");
    }

    #[test]
    fn colliding_pid_draws_get_distinct_pids() {
        let mut config = Config::default();
        config.simulator.process_catalog = vec!["alpha".to_string(), "beta".to_string()];
        // both processes draw pid 3250; alpha gets the higher cpu
        let draws = vec![
            0.5, 0.5, 0.5, 0.5, 0.5, 0.5, //
            0.25, 0.8, 0.5, 0.1, 0.1, //
            0.25, 0.2, 0.5, 0.1, 0.1,
        ];
        let mut sim = simulator_with(&config, ScriptedRandom::new(draws));
        sim.tick();

        let table: Vec<_> = sim
            .snapshot()
            .processes
            .iter()
            .map(|p| (p.name.as_str(), p.pid))
            .collect();
        assert_eq!(table, vec![("alpha", 3250), ("beta", 3251)]);

        for row in &sim.snapshot().processes {
            assert_eq!(sim.lookup_process(row.pid).unwrap(), row);
        }
    }

    #[test]
    fn pid_collision_wraps_at_top_of_range() {
        let mut taken = HashSet::new();
        taken.insert(PID_MAX);
        assert_eq!(next_free_pid(PID_MAX, &taken), PID_MIN);

        taken.insert(PID_MIN);
        assert_eq!(next_free_pid(PID_MAX, &taken), PID_MIN + 1);
        assert_eq!(next_free_pid(4000, &taken), 4000);
    }

    #[test]
    fn constant_draws_still_give_unique_pids() {
        let mut config = Config::default();
        config.simulator.max_processes = 20;
        let mut sim = simulator_with(&config, ScriptedRandom::constant(0.5));
        sim.tick();

        let pids: HashSet<u32> = sim.snapshot().processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids.len(), config.simulator.process_catalog.len());
    }

    #[test]
    fn lookup_before_first_tick_is_not_found() {
        let sim = simulator_with(&Config::default(), ScriptedRandom::constant(0.5));
        assert_eq!(
            sim.lookup_process(4242),
            Err(SimulatorError::ProcessNotFound(4242))
        );
    }

    #[test]
    fn context_switches_follow_cpu_usage() {
        let sim = simulator_with(&Config::default(), ScriptedRandom::constant(0.5));
        assert_eq!(sim.estimated_context_switches(), 3500);
        assert_eq!(estimated_context_switches(72.345), 7234);
        assert_eq!(estimated_context_switches(5.0), 500);
    }
}
