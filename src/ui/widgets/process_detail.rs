//! Detail overlay for a single process

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::simulator::ProcessInfo;
use crate::ui::theme::Theme;

pub struct ProcessDetail<'a> {
    process: &'a ProcessInfo,
    theme: &'a Theme,
}

impl<'a> ProcessDetail<'a> {
    pub fn new(process: &'a ProcessInfo, theme: &'a Theme) -> Self {
        Self { process, theme }
    }
}

impl<'a> Widget for ProcessDetail<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.process.name),
                self.theme.styles.panel_title,
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.styles.panel_border_focused)
            .style(Style::default().bg(self.theme.colors.bg_secondary));

        let key = Style::default().fg(self.theme.colors.fg_muted);
        let value = Style::default().fg(self.theme.colors.fg_primary);
        let p = self.process;

        let field = |label: &'static str, text: String, style: Style| {
            Line::from(vec![
                Span::styled(format!("{:>8}  ", label), key),
                Span::styled(text, style),
            ])
        };

        let lines = vec![
            field("PID", p.pid.to_string(), value),
            field("Name", p.name.clone(), value),
            field("CPU", format!("{:.1}%", p.cpu_percent), value),
            field("Memory", format!("{:.1} MB", p.memory_mb), value),
            field("Load", p.load.to_string(), self.theme.load_style(p.load)),
            field("State", p.state.to_string(), value),
            Line::default(),
            Line::from(Span::styled(
                "Closes when the process leaves the table. Esc to close.",
                key,
            )),
        ];

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
