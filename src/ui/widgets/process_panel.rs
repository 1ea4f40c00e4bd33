//! Process table with selection

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Row, StatefulWidget, Table, TableState, Widget},
};

use crate::core::state::{AppState, FocusedPanel};
use crate::ui::theme::Theme;

pub struct ProcessPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> ProcessPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl<'a> Widget for ProcessPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.state.focus_panel == FocusedPanel::Processes;
        let border_style = if focused {
            self.theme.styles.panel_border_focused
        } else {
            self.theme.styles.panel_border
        };

        let processes = self.state.panels.metrics.processes();

        let block = Block::default()
            .title(Span::styled(
                format!(" PROCESSES ({}) ", processes.len()),
                self.theme.styles.panel_title,
            ))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.colors.bg_primary));

        let header = Row::new(["PID", "NAME", "CPU%", "MEM MB", "LOAD", "STATE"]).style(
            Style::default()
                .fg(self.theme.colors.fg_muted)
                .add_modifier(Modifier::BOLD),
        );

        let rows = processes.iter().map(|p| {
            Row::new(vec![
                Span::raw(p.pid.to_string()),
                Span::raw(p.name.clone()),
                Span::raw(format!("{:.1}", p.cpu_percent)),
                Span::raw(format!("{:.1}", p.memory_mb)),
                Span::styled(p.load.to_string(), self.theme.load_style(p.load)),
                Span::raw(p.state.to_string()),
            ])
            .style(self.theme.styles.list_item)
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .highlight_style(if focused {
                self.theme.styles.list_item_selected
            } else {
                self.theme.styles.list_item
            })
            .highlight_symbol("▶ ");

        let mut table_state = TableState::default();
        if !processes.is_empty() {
            table_state.select(Some(self.state.panels.processes.selected_index));
        }
        StatefulWidget::render(table, area, buf, &mut table_state);
    }
}
