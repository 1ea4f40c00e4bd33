//! Active threshold alerts

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::core::state::AppState;
use crate::ui::theme::Theme;

pub struct AlertsPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> AlertsPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl<'a> Widget for AlertsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let alerts = &self.state.panels.metrics.alerts;
        let border_style = if alerts.is_empty() {
            self.theme.styles.panel_border
        } else {
            self.theme.styles.load_high
        };

        let block = Block::default()
            .title(Span::styled(" ALERTS ", self.theme.styles.panel_title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.colors.bg_primary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        if alerts.is_empty() {
            let ok = Span::styled("✓ All clear", self.theme.styles.load_low);
            buf.set_span(inner.x, inner.y, &ok, inner.width);
            return;
        }

        for (i, alert) in alerts.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.bottom() {
                break;
            }
            let line = Line::from(vec![
                Span::styled("⚠ ", self.theme.styles.load_high),
                Span::styled(
                    alert.message.as_str(),
                    Style::default().fg(self.theme.colors.fg_primary),
                ),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
