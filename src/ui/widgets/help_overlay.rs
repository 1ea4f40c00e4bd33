//! Help overlay widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::ui::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "General",
        &[
            ("q", "Quit"),
            ("Ctrl+C", "Quit from any mode"),
            ("?", "Toggle help"),
            ("Tab", "Switch between processes and chat"),
        ],
    ),
    (
        "Processes",
        &[
            ("↑/k", "Select previous process"),
            ("↓/j", "Select next process"),
            ("Enter", "Show process details"),
        ],
    ),
    (
        "Assistant",
        &[
            ("i", "Ask a question"),
            ("Enter", "Send the question"),
            ("Esc", "Leave the input line"),
            ("↑/↓", "Scroll the transcript"),
        ],
    ),
    (
        "Try asking",
        &[
            ("", "what is my cpu usage"),
            ("", "explain virtual memory"),
            ("", "show top processes"),
            ("", "what is a deadlock"),
        ],
    ),
];

pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 3 {
            return;
        }
        Clear.render(area, buf);

        let block = Block::default()
            .title(Span::styled(" OSVIZ Help ", self.theme.styles.panel_title))
            .borders(Borders::ALL)
            .border_style(self.theme.styles.panel_border_focused)
            .style(Style::default().bg(self.theme.colors.bg_secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;

        for (section, bindings) in SECTIONS {
            if y >= inner.bottom() {
                break;
            }

            let header = Line::from(vec![Span::styled(
                format!("─── {} ", section),
                Style::default()
                    .fg(self.theme.colors.accent_primary)
                    .add_modifier(Modifier::BOLD),
            )]);
            buf.set_line(inner.x + 1, y, &header, inner.width.saturating_sub(2));
            y += 1;

            for (key, desc) in bindings.iter() {
                if y >= inner.bottom() {
                    break;
                }

                let line = Line::from(vec![
                    Span::styled(format!("  {:>8}  ", key), self.theme.styles.keybind_key),
                    Span::styled(*desc, self.theme.styles.keybind),
                ]);
                buf.set_line(inner.x + 1, y, &line, inner.width.saturating_sub(2));
                y += 1;
            }

            y += 1;
        }

        let hint = " Press Esc or ? to close ";
        let width = (hint.len() as u16).min(area.width);
        let footer = Span::styled(hint, Style::default().fg(self.theme.colors.fg_muted));
        buf.set_span(
            area.x + area.width.saturating_sub(width) / 2,
            area.bottom().saturating_sub(1),
            &footer,
            width,
        );
    }
}
