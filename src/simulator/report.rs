//! Headless snapshot reports for the `snapshot` command

use serde::Serialize;
use std::fmt::Write;

use super::{AlertEvent, MetricsSimulator, MetricsSnapshot};

/// Everything the simulator knows after a run of ticks.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub ticks: u64,
    pub snapshot: &'a MetricsSnapshot,
    pub memory_percent: f64,
    pub context_switches: u64,
    pub alerts: Vec<AlertEvent>,
}

impl<'a> Report<'a> {
    pub fn capture(simulator: &'a MetricsSimulator) -> Self {
        let snapshot = simulator.snapshot();
        Self {
            ticks: simulator.ticks(),
            snapshot,
            memory_percent: snapshot.memory_percent(),
            context_switches: simulator.estimated_context_switches(),
            alerts: simulator.evaluate_alerts(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let s = self.snapshot;
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "Snapshot after {} tick(s)", self.ticks);
        let _ = writeln!(out, "{}", "-".repeat(60));
        let _ = writeln!(
            out,
            "CPU      {:>5.1}%  {} cores @ {:.1} GHz  ~{} ctx switches/s",
            s.cpu.usage_percent, s.cpu.core_count, s.cpu.frequency_ghz, self.context_switches
        );
        let _ = writeln!(
            out,
            "Memory   {:.2} / {:.2} GB ({:.1}%), {:.2} GB available",
            s.memory.used_gb(),
            s.memory.total_gb(),
            self.memory_percent,
            s.memory.available_gb()
        );
        let _ = writeln!(
            out,
            "Disk     read {:.1} MB/s  write {:.1} MB/s  usage {:.1}%",
            s.disk.read_mbps, s.disk.write_mbps, s.disk.usage_percent
        );
        let _ = writeln!(
            out,
            "Network  sent {:.0} KB/s  received {:.0} KB/s",
            s.network.sent_kbps, s.network.received_kbps
        );

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<7} {:<12} {:>6} {:>9} {:<7} STATE",
            "PID", "NAME", "CPU%", "MEM MB", "LOAD"
        );
        for p in &s.processes {
            let _ = writeln!(
                out,
                "{:<7} {:<12} {:>6.1} {:>9.1} {:<7} {}",
                p.pid,
                p.name,
                p.cpu_percent,
                p.memory_mb,
                p.load.to_string(),
                p.state
            );
        }

        if !self.alerts.is_empty() {
            let _ = writeln!(out);
            for alert in &self.alerts {
                let _ = writeln!(out, "ALERT {}", alert.message);
            }
        }
        out
    }
}

/// Print a report for the current simulator state.
pub fn print_report(simulator: &MetricsSimulator, json: bool) -> anyhow::Result<()> {
    let report = Report::capture(simulator);
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::simulator::StdRandom;

    fn simulator(config: &Config, ticks: usize) -> MetricsSimulator {
        let mut sim =
            MetricsSimulator::with_random(config, Box::new(StdRandom::seeded(3))).unwrap();
        for _ in 0..ticks {
            sim.tick();
        }
        sim
    }

    #[test]
    fn text_report_lists_every_process() {
        let sim = simulator(&Config::default(), 4);
        let text = Report::capture(&sim).to_text();

        assert!(text.starts_with("Snapshot after 4 tick(s)"));
        for p in &sim.snapshot().processes {
            assert!(text.contains(&p.pid.to_string()));
        }
    }

    #[test]
    fn json_report_carries_alerts() {
        let mut config = Config::default();
        config.alerts.cpu_threshold = 1.0;
        config.alerts.memory_threshold = 1.0;
        let sim = simulator(&config, 1);

        let json: serde_json::Value =
            serde_json::from_str(&Report::capture(&sim).to_json().unwrap()).unwrap();

        assert_eq!(json["ticks"], 1);
        assert_eq!(json["alerts"][0]["kind"], "cpu");
        assert_eq!(json["alerts"][1]["kind"], "memory");
        assert_eq!(json["snapshot"]["processes"].as_array().unwrap().len(), 10);
    }
}
