//! System metrics panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::core::state::AppState;
use crate::ui::theme::Theme;

const BAR_WIDTH: usize = 12;
const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub struct MetricsPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MetricsPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

/// Fixed-width fill bar for a percentage, clamped to 0..=100.
pub fn usage_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64) as usize;
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Sparkline over the most recent `width` percentages.
pub fn sparkline(history: impl DoubleEndedIterator<Item = f64>, width: usize) -> String {
    let mut recent: Vec<f64> = history.rev().take(width).collect();
    recent.reverse();
    recent
        .into_iter()
        .map(|v| {
            let idx = ((v.clamp(0.0, 100.0) * 7.0) / 100.0) as usize;
            SPARK_CHARS[idx.min(7)]
        })
        .collect()
}

impl<'a> Widget for MetricsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(" SYSTEM ", self.theme.styles.panel_title))
            .borders(Borders::ALL)
            .border_style(self.theme.styles.panel_border)
            .style(Style::default().bg(self.theme.colors.bg_primary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let metrics = &self.state.panels.metrics;
        let Some(snapshot) = &metrics.snapshot else {
            let waiting = Span::styled(
                "Waiting for first sample…",
                Style::default().fg(self.theme.colors.fg_muted),
            );
            buf.set_span(inner.x, inner.y, &waiting, inner.width);
            return;
        };

        let label_style = Style::default().fg(self.theme.colors.fg_secondary);
        let mut lines: Vec<Line> = Vec::new();

        // CPU with sparkline
        let cpu = snapshot.cpu.usage_percent;
        let cpu_label = format!("CPU {:>5.1}% ", cpu);
        let spark_width = (inner.width as usize).saturating_sub(cpu_label.len() + 1);
        lines.push(Line::from(vec![
            Span::styled(cpu_label, self.theme.usage_style(cpu)),
            Span::styled(
                sparkline(metrics.cpu_history.iter().copied(), spark_width),
                self.theme.styles.sparkline,
            ),
        ]));

        let mem = snapshot.memory_percent();
        lines.push(Line::from(vec![
            Span::styled("MEM ", label_style),
            Span::styled(usage_bar(mem, BAR_WIDTH), self.theme.usage_style(mem)),
            Span::styled(
                format!(
                    " {:.2}/{:.1} GB ({:.1}%)",
                    snapshot.memory.used_gb(),
                    snapshot.memory.total_gb(),
                    mem
                ),
                label_style,
            ),
        ]));

        let disk = &snapshot.disk;
        lines.push(Line::from(vec![
            Span::styled("DSK ", label_style),
            Span::styled(
                usage_bar(disk.usage_percent, BAR_WIDTH),
                self.theme.usage_style(disk.usage_percent),
            ),
            Span::styled(
                format!(
                    " {:>4.1}%  R {:.1} MB/s  W {:.1} MB/s",
                    disk.usage_percent, disk.read_mbps, disk.write_mbps
                ),
                label_style,
            ),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "NET ↑ {:.0} KB/s  ↓ {:.0} KB/s",
                snapshot.network.sent_kbps, snapshot.network.received_kbps
            ),
            label_style,
        )));

        lines.push(Line::from(vec![
            Span::styled("CTX ", label_style),
            Span::styled(
                format!("~{} switches/s", metrics.context_switches),
                Style::default().fg(self.theme.colors.info),
            ),
        ]));

        for (i, line) in lines.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.bottom() {
                break;
            }
            buf.set_line(inner.x, y, line, inner.width);
        }
    }
}
