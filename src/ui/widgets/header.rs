//! Header widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::state::AppState;
use crate::ui::theme::Theme;

pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl<'a> Widget for Header<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, self.theme.styles.header);

        let metrics = &self.state.panels.metrics;
        let separator = || Span::styled(" │ ", Style::default().fg(self.theme.colors.fg_muted));

        let mut spans = vec![
            Span::styled(
                " OSVIZ ",
                Style::default()
                    .fg(self.theme.colors.accent_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            separator(),
            Span::styled(
                "simulated system",
                Style::default().fg(self.theme.colors.fg_primary),
            ),
            separator(),
            Span::styled(
                format!("tick {}", metrics.tick_count),
                Style::default().fg(self.theme.colors.fg_secondary),
            ),
        ];

        if let Some(snapshot) = &metrics.snapshot {
            spans.push(separator());
            spans.push(Span::styled(
                format!(
                    "{} cores @ {:.1} GHz",
                    snapshot.cpu.core_count, snapshot.cpu.frequency_ghz
                ),
                Style::default().fg(self.theme.colors.info),
            ));
        }

        if !metrics.alerts.is_empty() {
            spans.push(separator());
            spans.push(Span::styled(
                format!("⚠ {}", metrics.alerts.len()),
                self.theme.styles.load_high,
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // Clock on the right
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        let time_span = Span::styled(&time, Style::default().fg(self.theme.colors.fg_muted));
        let time_x = area.x + area.width.saturating_sub(time.len() as u16 + 1);
        buf.set_span(time_x, area.y, &time_span, time.len() as u16);
    }
}
