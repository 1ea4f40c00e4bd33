//! Application state for the dashboard

use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::chat::ChatLog;
use crate::simulator::{AlertEvent, AlertKind, MetricsSnapshot, ProcessInfo, SimulatorError};
use crate::ui::theme::Theme;

/// Top-level application mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal dashboard view
    #[default]
    Dashboard,
    /// Typing into the chat input line
    ChatInput,
    /// Help overlay showing
    Help,
    /// Detail overlay for one process
    ProcessDetail { pid: u32 },
}

/// Which panel currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Processes,
    Chat,
}

impl FocusedPanel {
    pub fn next(self) -> Self {
        match self {
            Self::Processes => Self::Chat,
            Self::Chat => Self::Processes,
        }
    }
}

/// System metrics panel state
#[derive(Debug, Clone)]
pub struct MetricsPanelState {
    pub snapshot: Option<MetricsSnapshot>,
    pub cpu_history: VecDeque<f64>,
    pub history_len: usize,
    pub context_switches: u64,
    pub alerts: Vec<AlertEvent>,
    pub tick_count: u64,
}

impl MetricsPanelState {
    pub fn new(history_len: usize) -> Self {
        Self {
            snapshot: None,
            cpu_history: VecDeque::with_capacity(history_len),
            history_len,
            context_switches: 0,
            alerts: Vec::new(),
            tick_count: 0,
        }
    }

    pub fn record(&mut self, snapshot: MetricsSnapshot, context_switches: u64, tick_count: u64) {
        self.cpu_history.push_back(snapshot.cpu.usage_percent);
        while self.cpu_history.len() > self.history_len {
            self.cpu_history.pop_front();
        }
        self.snapshot = Some(snapshot);
        self.context_switches = context_switches;
        self.tick_count = tick_count;
    }

    pub fn processes(&self) -> &[ProcessInfo] {
        self.snapshot
            .as_ref()
            .map(|s| s.processes.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for MetricsPanelState {
    fn default() -> Self {
        Self::new(60)
    }
}

/// Process table panel state
#[derive(Debug, Clone, Default)]
pub struct ProcessPanelState {
    pub selected_index: usize,
    /// Row shown by the detail overlay, re-resolved every tick.
    pub detail: Option<ProcessInfo>,
}

/// Chat panel state
#[derive(Debug, Clone)]
pub struct ChatPanelState {
    pub log: ChatLog,
    pub input: String,
    /// Newest messages hidden while reading back through the transcript.
    pub scroll_back: usize,
}

impl ChatPanelState {
    /// Hide one more message from the bottom, keeping at least one visible.
    pub fn scroll_up(&mut self) {
        let max = self.log.messages().len().saturating_sub(1);
        self.scroll_back = (self.scroll_back + 1).min(max);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }
}

impl Default for ChatPanelState {
    fn default() -> Self {
        Self {
            log: ChatLog::new(),
            input: String::new(),
            scroll_back: 0,
        }
    }
}

/// What one simulator step hands to the dashboard.
#[derive(Debug, Clone)]
pub struct Sample {
    pub snapshot: MetricsSnapshot,
    pub alerts: Vec<AlertEvent>,
    pub context_switches: u64,
    pub ticks: u64,
}

/// Granular view state for all panels
#[derive(Debug, Clone, Default)]
pub struct PanelStates {
    pub metrics: MetricsPanelState,
    pub processes: ProcessPanelState,
    pub chat: ChatPanelState,
}

/// Notification to display
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: AppMode,
    pub panels: PanelStates,
    pub theme: Theme,
    pub notifications: Vec<Notification>,
    pub focus_panel: FocusedPanel,
}

impl AppState {
    pub fn new(theme: Theme, history_len: usize) -> Self {
        Self {
            mode: AppMode::Dashboard,
            panels: PanelStates {
                metrics: MetricsPanelState::new(history_len),
                ..Default::default()
            },
            theme,
            notifications: Vec::new(),
            focus_panel: FocusedPanel::Processes,
        }
    }

    pub fn add_notification(&mut self, message: String, level: NotificationLevel) {
        let notification = Notification {
            message,
            level,
            created_at: chrono::Utc::now(),
            duration_ms: 5000,
        };
        self.notifications.push(notification);
    }

    pub fn remove_expired_notifications(&mut self) {
        let now = chrono::Utc::now();
        self.notifications.retain(|n| {
            let elapsed = now.signed_duration_since(n.created_at).num_milliseconds() as u64;
            elapsed < n.duration_ms
        });
    }

    /// Fold a fresh sample into the panels.
    ///
    /// Only alert kinds that were not raised by the previous sample produce
    /// a notification. An open detail overlay is re-resolved through
    /// `lookup` and closes if its pid has left the table.
    pub fn apply_sample<F>(&mut self, sample: Sample, lookup: F)
    where
        F: FnOnce(u32) -> Result<ProcessInfo, SimulatorError>,
    {
        let previous: Vec<AlertKind> = self.panels.metrics.alerts.iter().map(|a| a.kind).collect();
        for alert in sample.alerts.iter().filter(|a| !previous.contains(&a.kind)) {
            self.add_notification(alert.message.clone(), NotificationLevel::Warning);
        }

        self.panels
            .metrics
            .record(sample.snapshot, sample.context_switches, sample.ticks);
        self.panels.metrics.alerts = sample.alerts;
        self.clamp_process_selection();

        if let AppMode::ProcessDetail { pid } = self.mode {
            match lookup(pid) {
                Ok(process) => self.panels.processes.detail = Some(process),
                Err(error) => self.close_detail(error),
            }
        }
    }

    /// Leave the detail overlay after a failed lookup.
    pub fn close_detail(&mut self, error: SimulatorError) {
        tracing::debug!(%error, "process lookup missed");
        let message = match error {
            SimulatorError::ProcessNotFound(pid) => {
                format!("Process {} is no longer present", pid)
            }
            other => other.to_string(),
        };
        self.mode = AppMode::Dashboard;
        self.panels.processes.detail = None;
        self.add_notification(message, NotificationLevel::Info);
    }

    /// Keep the process selection inside the current table.
    pub fn clamp_process_selection(&mut self) {
        let max = self.panels.metrics.processes().len().saturating_sub(1);
        if self.panels.processes.selected_index > max {
            self.panels.processes.selected_index = max;
        }
    }
}

/// Thread-safe state store
pub struct StateStore {
    state: Arc<RwLock<AppState>>,
}

impl StateStore {
    pub fn new(initial: AppState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    /// Atomic state mutation
    pub fn update<F, R>(&self, mutator: F) -> R
    where
        F: FnOnce(&mut AppState) -> R,
    {
        let mut state = self.state.write();
        mutator(&mut state)
    }

    /// Read current state
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, AppState> {
        self.state.read()
    }

    /// Get a clone of the current state
    pub fn snapshot(&self) -> AppState {
        self.state.read().clone()
    }
}

impl Clone for StateStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::simulator::{MetricsSimulator, Severity, StdRandom};

    fn ticked_snapshot(ticks: usize) -> MetricsSnapshot {
        let mut sim =
            MetricsSimulator::with_random(&Config::default(), Box::new(StdRandom::seeded(1)))
                .unwrap();
        for _ in 0..ticks {
            sim.tick();
        }
        sim.snapshot().clone()
    }

    #[test]
    fn cpu_history_is_bounded() {
        let mut metrics = MetricsPanelState::new(3);
        for tick in 1..=5 {
            let mut snapshot = ticked_snapshot(1);
            snapshot.cpu.usage_percent = tick as f64;
            metrics.record(snapshot, 0, tick);
        }

        assert_eq!(metrics.cpu_history, VecDeque::from(vec![3.0, 4.0, 5.0]));
        assert_eq!(metrics.tick_count, 5);
    }

    #[test]
    fn selection_is_clamped_to_table() {
        let mut state = AppState::new(Theme::default(), 60);
        state.panels.processes.selected_index = 40;
        state.clamp_process_selection();
        assert_eq!(state.panels.processes.selected_index, 0);

        state.panels.metrics.record(ticked_snapshot(2), 0, 2);
        state.panels.processes.selected_index = 40;
        state.clamp_process_selection();
        assert_eq!(state.panels.processes.selected_index, 9);
    }

    fn sample(snapshot: MetricsSnapshot, kinds: &[AlertKind]) -> Sample {
        let alerts = kinds
            .iter()
            .map(|&kind| AlertEvent {
                kind,
                severity: Severity::High,
                message: format!("{:?} is high", kind),
            })
            .collect();
        Sample {
            snapshot,
            alerts,
            context_switches: 4200,
            ticks: 1,
        }
    }

    fn no_lookup(pid: u32) -> Result<ProcessInfo, SimulatorError> {
        panic!("unexpected lookup of {pid} outside the detail overlay")
    }

    fn warnings(state: &AppState) -> Vec<&str> {
        state
            .notifications
            .iter()
            .filter(|n| n.level == NotificationLevel::Warning)
            .map(|n| n.message.as_str())
            .collect()
    }

    #[test]
    fn alert_that_stays_raised_notifies_once() {
        let mut state = AppState::new(Theme::default(), 60);

        state.apply_sample(sample(ticked_snapshot(1), &[AlertKind::Cpu]), no_lookup);
        state.apply_sample(sample(ticked_snapshot(2), &[AlertKind::Cpu]), no_lookup);
        assert_eq!(warnings(&state), vec!["Cpu is high"]);

        state.apply_sample(
            sample(ticked_snapshot(3), &[AlertKind::Cpu, AlertKind::Memory]),
            no_lookup,
        );
        assert_eq!(warnings(&state), vec!["Cpu is high", "Memory is high"]);
        assert_eq!(state.panels.metrics.alerts.len(), 2);
        assert_eq!(state.panels.metrics.context_switches, 4200);
    }

    #[test]
    fn cleared_alert_notifies_again_when_raised() {
        let mut state = AppState::new(Theme::default(), 60);

        state.apply_sample(sample(ticked_snapshot(1), &[AlertKind::Memory]), no_lookup);
        state.apply_sample(sample(ticked_snapshot(2), &[]), no_lookup);
        assert!(state.panels.metrics.alerts.is_empty());

        state.apply_sample(sample(ticked_snapshot(3), &[AlertKind::Memory]), no_lookup);
        assert_eq!(warnings(&state), vec!["Memory is high", "Memory is high"]);
    }

    #[test]
    fn stale_detail_pid_closes_overlay() {
        let mut state = AppState::new(Theme::default(), 60);
        let snapshot = ticked_snapshot(1);
        state.panels.processes.detail = Some(snapshot.processes[0].clone());
        state.mode = AppMode::ProcessDetail { pid: 4242 };

        state.apply_sample(sample(snapshot, &[]), |pid| {
            Err(SimulatorError::ProcessNotFound(pid))
        });

        assert_eq!(state.mode, AppMode::Dashboard);
        assert!(state.panels.processes.detail.is_none());
        let last = state.notifications.last().unwrap();
        assert_eq!(last.message, "Process 4242 is no longer present");
        assert_eq!(last.level, NotificationLevel::Info);
    }

    #[test]
    fn live_detail_pid_refreshes_row() {
        let mut state = AppState::new(Theme::default(), 60);
        let first = ticked_snapshot(1);
        let second = ticked_snapshot(2);
        let stale = first.processes[0].clone();
        let fresh = second.processes[0].clone();

        state.panels.processes.detail = Some(stale);
        state.mode = AppMode::ProcessDetail { pid: fresh.pid };

        let row = fresh.clone();
        state.apply_sample(sample(second, &[]), move |pid| {
            assert_eq!(pid, row.pid);
            Ok(row)
        });

        assert_eq!(state.mode, AppMode::ProcessDetail { pid: fresh.pid });
        assert_eq!(state.panels.processes.detail, Some(fresh));
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn chat_scroll_is_bounded_by_transcript() {
        let mut chat = ChatPanelState::default();
        chat.scroll_up();
        assert_eq!(chat.scroll_back, 0);

        let seq = chat.log.submit("what is a deadlock");
        chat.log.deliver(seq, "a cycle of waiting");
        for _ in 0..10 {
            chat.scroll_up();
        }
        assert_eq!(chat.scroll_back, 1);

        chat.scroll_down();
        chat.scroll_down();
        assert_eq!(chat.scroll_back, 0);
    }

    #[test]
    fn store_clones_share_state() {
        let store = StateStore::new(AppState::new(Theme::default(), 60));
        let other = store.clone();

        other.update(|s| s.focus_panel = s.focus_panel.next());
        assert_eq!(store.read().focus_panel, FocusedPanel::Chat);
    }
}
