//! Footer widget with keybindings

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::state::{AppMode, AppState, FocusedPanel};
use crate::ui::theme::Theme;

pub struct Footer<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

/// Key hints shown for a mode and focus.
pub fn bindings_for(mode: &AppMode, focus: FocusedPanel) -> Vec<(&'static str, &'static str)> {
    match mode {
        AppMode::Dashboard => {
            let enter = match focus {
                FocusedPanel::Processes => ("Enter", "Details"),
                FocusedPanel::Chat => ("Enter", "Type"),
            };
            vec![
                ("Tab", "Focus"),
                ("↑/↓", "Navigate"),
                enter,
                ("i", "Ask"),
                ("?", "Help"),
                ("q", "Quit"),
            ]
        }
        AppMode::ChatInput => vec![("Enter", "Send"), ("Esc", "Done")],
        AppMode::Help => vec![("Esc", "Close"), ("q", "Close")],
        AppMode::ProcessDetail { .. } => vec![("Esc", "Close"), ("Enter", "Close")],
    }
}

impl<'a> Widget for Footer<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, self.theme.styles.footer);

        let bindings = bindings_for(&self.state.mode, self.state.focus_panel);

        let mut spans = Vec::new();
        for (i, (key, action)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", self.theme.styles.keybind));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                self.theme.styles.keybind_key,
            ));
            spans.push(Span::styled(
                format!(" {}", action),
                self.theme.styles.keybind,
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));
    }
}
