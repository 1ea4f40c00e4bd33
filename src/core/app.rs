//! Main application orchestrator

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Stdout;
use tokio::sync::mpsc;

use crate::chat;
use crate::config::Config;
use crate::core::events::{Event, EventHandler, EventResult, KeyBinding, KeyBindings};
use crate::core::state::{AppMode, AppState, FocusedPanel, Sample, StateStore};
use crate::responder::QueryResponder;
use crate::simulator::{MetricsSimulator, SimulatorError};
use crate::ui::renderer::Renderer;
use crate::ui::theme::Theme;

pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: StateStore,
    event_tx: mpsc::UnboundedSender<Event>,
    simulator: MetricsSimulator,
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let simulator =
            MetricsSimulator::new(&config).context("failed to start the metrics simulator")?;

        // Initialize terminal
        let backend = CrosstermBackend::new(std::io::stdout());
        let terminal = Terminal::new(backend)?;

        let theme = Theme::from_name(&config.display.theme);
        tracing::info!(theme = %theme.name, "starting dashboard");
        let state = StateStore::new(AppState::new(theme, config.display.cpu_history_len));

        // Placeholder sender - replaced in run()
        let (event_tx, _) = mpsc::unbounded_channel::<Event>();

        Ok(Self {
            terminal,
            state,
            event_tx,
            simulator,
            config,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.setup_terminal()?;

        // Populate the process table before the first frame
        self.refresh_metrics();

        let (mut event_handler, event_tx) = EventHandler::new();
        self.event_tx = event_tx.clone();

        EventHandler::spawn_sources(event_tx, self.simulator.update_interval());

        self.render()?;

        let result = self.event_loop(&mut event_handler).await;

        self.shutdown()?;
        result
    }

    fn setup_terminal(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide,
        )?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show,
        )?;
        Ok(())
    }

    async fn event_loop(&mut self, event_handler: &mut EventHandler) -> Result<()> {
        while let Some(event) = event_handler.next().await {
            match self.handle_event(event)? {
                EventResult::Continue => {}
                EventResult::Quit => break,
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<EventResult> {
        match event {
            Event::Key(key) => Ok(self.handle_key(key)),
            Event::Resize => {
                self.render()?;
                Ok(EventResult::Continue)
            }
            Event::Tick => {
                self.state.update(|s| s.remove_expired_notifications());
                self.render()?;
                Ok(EventResult::Continue)
            }
            Event::SimTick => {
                self.refresh_metrics();
                Ok(EventResult::Continue)
            }
            Event::ChatReply { seq, query } => {
                // Answer against the snapshot current when the delay ends
                let reply = QueryResponder::respond(&query, self.simulator.snapshot());
                self.state.update(|s| s.panels.chat.log.deliver(seq, reply));
                Ok(EventResult::Continue)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        let mode = self.state.read().mode.clone();

        match mode {
            AppMode::Dashboard => self.handle_dashboard_key(key),
            AppMode::ChatInput => self.handle_chat_key(key),
            AppMode::Help => self.handle_overlay_key(key, &[KeyBindings::help()]),
            AppMode::ProcessDetail { .. } => {
                self.handle_overlay_key(key, &[KeyBindings::enter()])
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> EventResult {
        if KeyBindings::quit().matches(&key) || KeyBindings::quit_alt().matches(&key) {
            return EventResult::Quit;
        }

        if KeyBindings::help().matches(&key) {
            self.state.update(|s| s.mode = AppMode::Help);
        } else if KeyBindings::chat().matches(&key) {
            self.state.update(|s| {
                s.focus_panel = FocusedPanel::Chat;
                s.mode = AppMode::ChatInput;
            });
        } else if KeyBindings::tab().matches(&key) {
            self.state.update(|s| s.focus_panel = s.focus_panel.next());
        } else if KeyBindings::up().matches(&key) || KeyBindings::vim_up().matches(&key) {
            self.navigate_up();
        } else if KeyBindings::down().matches(&key) || KeyBindings::vim_down().matches(&key) {
            self.navigate_down();
        } else if KeyBindings::enter().matches(&key) {
            let focus = self.state.read().focus_panel;
            match focus {
                FocusedPanel::Processes => self.open_process_detail(),
                FocusedPanel::Chat => self.state.update(|s| s.mode = AppMode::ChatInput),
            }
        }

        EventResult::Continue
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> EventResult {
        if KeyBindings::quit_alt().matches(&key) {
            return EventResult::Quit;
        }

        if KeyBindings::escape().matches(&key) {
            self.state.update(|s| s.mode = AppMode::Dashboard);
            return EventResult::Continue;
        }

        if KeyBindings::enter().matches(&key) {
            self.submit_query();
            return EventResult::Continue;
        }

        match key.code {
            KeyCode::Char(c) => self.state.update(|s| s.panels.chat.input.push(c)),
            KeyCode::Backspace => {
                self.state.update(|s| {
                    s.panels.chat.input.pop();
                });
            }
            _ => {}
        }
        EventResult::Continue
    }

    fn handle_overlay_key(&mut self, key: KeyEvent, extra_close: &[KeyBinding]) -> EventResult {
        if KeyBindings::escape().matches(&key)
            || KeyBindings::quit().matches(&key)
            || extra_close.iter().any(|b| b.matches(&key))
        {
            self.state.update(|s| {
                s.mode = AppMode::Dashboard;
                s.panels.processes.detail = None;
            });
        }
        EventResult::Continue
    }

    fn navigate_up(&mut self) {
        self.state.update(|s| match s.focus_panel {
            FocusedPanel::Processes => {
                s.panels.processes.selected_index =
                    s.panels.processes.selected_index.saturating_sub(1);
            }
            FocusedPanel::Chat => s.panels.chat.scroll_up(),
        });
    }

    fn navigate_down(&mut self) {
        self.state.update(|s| match s.focus_panel {
            FocusedPanel::Processes => {
                s.panels.processes.selected_index += 1;
                s.clamp_process_selection();
            }
            FocusedPanel::Chat => s.panels.chat.scroll_down(),
        });
    }

    fn submit_query(&mut self) {
        let query = self.state.update(|s| std::mem::take(&mut s.panels.chat.input));
        let query = query.trim().to_string();
        if query.is_empty() {
            return;
        }

        let seq = self.state.update(|s| {
            s.panels.chat.scroll_back = 0;
            s.panels.chat.log.submit(query.clone())
        });
        let delay = chat::typing_delay(&self.config.chat, &mut rand::thread_rng());
        tracing::info!(seq, delay_ms = delay.as_millis() as u64, "query submitted");

        EventHandler::schedule_reply(self.event_tx.clone(), delay, seq, query);
    }

    fn open_process_detail(&mut self) {
        let pid = {
            let state = self.state.read();
            state
                .panels
                .metrics
                .processes()
                .get(state.panels.processes.selected_index)
                .map(|p| p.pid)
        };
        let Some(pid) = pid else {
            return;
        };

        match self.simulator.lookup_process(pid) {
            Ok(process) => {
                let process = process.clone();
                self.state.update(|s| {
                    s.panels.processes.detail = Some(process);
                    s.mode = AppMode::ProcessDetail { pid };
                });
            }
            Err(e) => self.notify_missing_process(e),
        }
    }

    fn notify_missing_process(&mut self, error: SimulatorError) {
        self.state.update(|s| s.close_detail(error));
    }

    fn refresh_metrics(&mut self) {
        self.simulator.tick();

        let sample = Sample {
            snapshot: self.simulator.snapshot().clone(),
            alerts: self.simulator.evaluate_alerts(),
            context_switches: self.simulator.estimated_context_switches(),
            ticks: self.simulator.ticks(),
        };

        for alert in &sample.alerts {
            tracing::warn!(kind = ?alert.kind, "{}", alert.message);
        }

        // The detail overlay follows its pid across table regenerations
        let simulator = &self.simulator;
        self.state.update(|s| {
            s.apply_sample(sample, |pid| simulator.lookup_process(pid).cloned())
        });
    }

    fn render(&mut self) -> Result<()> {
        let state = self.state.snapshot();
        self.terminal.draw(|frame| {
            Renderer::render(frame, &state);
        })?;
        Ok(())
    }
}
