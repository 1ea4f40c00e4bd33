//! Unified event handling system

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// All possible events in the system
#[derive(Debug, Clone)]
pub enum Event {
    // Input events
    Key(KeyEvent),
    Resize,

    // System events
    Tick,    // Render tick (~30fps)
    SimTick, // Simulator step at the configured interval

    // A delayed chat reply is due
    ChatReply { seq: u64, query: String },
}

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> (Self, mpsc::UnboundedSender<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }

    /// Start all event source tasks
    pub fn spawn_sources(event_tx: mpsc::UnboundedSender<Event>, sim_interval: Duration) {
        // Terminal input events
        tokio::spawn(Self::terminal_events(event_tx.clone()));

        // Render tick (33ms = ~30fps for TUI)
        tokio::spawn(Self::tick_events(
            event_tx.clone(),
            Duration::from_millis(33),
            Event::Tick,
        ));

        tokio::spawn(Self::tick_events(event_tx, sim_interval, Event::SimTick));
    }

    async fn terminal_events(tx: mpsc::UnboundedSender<Event>) {
        use crossterm::event::{self, Event as CrosstermEvent};
        use futures::StreamExt;

        let mut reader = event::EventStream::new();
        while let Some(event_result) = reader.next().await {
            let app_event = match event_result {
                Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                Ok(CrosstermEvent::Resize(..)) => Event::Resize,
                _ => continue,
            };
            if tx.send(app_event).is_err() {
                break;
            }
        }
    }

    async fn tick_events(tx: mpsc::UnboundedSender<Event>, interval: Duration, event: Event) {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if tx.send(event.clone()).is_err() {
                break;
            }
        }
    }

    /// Send `ChatReply` once the typing delay has elapsed.
    pub fn schedule_reply(
        tx: mpsc::UnboundedSender<Event>,
        delay: Duration,
        seq: u64,
        query: String,
    ) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::ChatReply { seq, query });
        });
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key binding helper
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.code == self.key && event.modifiers == self.modifiers
    }
}

/// Standard key bindings
pub struct KeyBindings;

impl KeyBindings {
    pub fn quit() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('q'))
    }

    pub fn quit_alt() -> KeyBinding {
        KeyBinding::ctrl(KeyCode::Char('c'))
    }

    pub fn help() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('?'))
    }

    pub fn chat() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('i'))
    }

    pub fn escape() -> KeyBinding {
        KeyBinding::new(KeyCode::Esc)
    }

    pub fn enter() -> KeyBinding {
        KeyBinding::new(KeyCode::Enter)
    }

    pub fn tab() -> KeyBinding {
        KeyBinding::new(KeyCode::Tab)
    }

    pub fn up() -> KeyBinding {
        KeyBinding::new(KeyCode::Up)
    }

    pub fn down() -> KeyBinding {
        KeyBinding::new(KeyCode::Down)
    }

    pub fn vim_up() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('k'))
    }

    pub fn vim_down() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('j'))
    }
}
