//! Main UI renderer

use ratatui::{
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::state::{AppMode, AppState, NotificationLevel};
use crate::ui::layout::LayoutManager;
use crate::ui::widgets::*;

pub struct Renderer;

impl Renderer {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let area = frame.area();
        let theme = &state.theme;

        // Clear background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.colors.bg_primary)),
            area,
        );

        let layout = LayoutManager::compute(area);

        frame.render_widget(Header::new(state, theme), layout.header);
        frame.render_widget(Footer::new(state, theme), layout.footer);

        frame.render_widget(MetricsPanel::new(state, theme), layout.metrics_panel);
        frame.render_widget(AlertsPanel::new(state, theme), layout.alerts_panel);
        frame.render_widget(ProcessPanel::new(state, theme), layout.process_panel);
        frame.render_widget(ChatPanel::new(state, theme), layout.chat_panel);

        match &state.mode {
            AppMode::Help => {
                frame.render_widget(HelpOverlay::new(theme), layout.overlay_area);
            }
            AppMode::ProcessDetail { .. } => {
                if let Some(process) = &state.panels.processes.detail {
                    let detail_area = crate::ui::layout::centered_rect(40, 40, area);
                    frame.render_widget(ProcessDetail::new(process, theme), detail_area);
                }
            }
            AppMode::Dashboard | AppMode::ChatInput => {}
        }

        Self::render_notifications(frame, state);
    }

    fn render_notifications(frame: &mut Frame, state: &AppState) {
        let theme = &state.theme;
        let area = frame.area();

        // Stacked in the top-right corner
        let mut y = 2;
        for notification in state.notifications.iter().take(3) {
            if y >= area.height {
                break;
            }

            let (style, icon) = match notification.level {
                NotificationLevel::Info => (theme.styles.notification_info, "ℹ"),
                NotificationLevel::Warning => (theme.styles.notification_warning, "⚠"),
            };

            let msg = format!(" {} {} ", icon, notification.message);
            let width = (msg.width() as u16).min(area.width.saturating_sub(2)).min(60);
            let x = area.width.saturating_sub(width + 2);

            frame.render_widget(
                Paragraph::new(Span::styled(msg, style))
                    .style(Style::default().bg(theme.colors.bg_tertiary)),
                Rect {
                    x,
                    y,
                    width,
                    height: 1,
                },
            );

            y += 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::simulator::{MetricsSimulator, StdRandom};
    use crate::ui::theme::Theme;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for row in buffer.content.chunks(buffer.area.width as usize) {
            for cell in row {
                text.push_str(cell.symbol());
            }
            text.push('\n');
        }
        text
    }

    fn sampled_state() -> AppState {
        let mut sim =
            MetricsSimulator::with_random(&Config::default(), Box::new(StdRandom::seeded(9)))
                .unwrap();
        sim.tick();
        let mut state = AppState::new(Theme::default(), 60);
        state.panels.metrics.record(
            sim.snapshot().clone(),
            sim.estimated_context_switches(),
            sim.ticks(),
        );
        state
    }

    #[test]
    fn dashboard_shows_every_panel() {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let state = sampled_state();

        terminal
            .draw(|frame| Renderer::render(frame, &state))
            .unwrap();
        let text = buffer_text(&terminal);

        for title in ["OSVIZ", "SYSTEM", "ALERTS", "PROCESSES (10)", "OS TUTOR", "CPU", "MEM"] {
            assert!(text.contains(title), "missing {title}");
        }
    }

    #[test]
    fn help_overlay_draws_over_dashboard() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut state = sampled_state();
        state.mode = AppMode::Help;

        terminal
            .draw(|frame| Renderer::render(frame, &state))
            .unwrap();

        assert!(buffer_text(&terminal).contains("OSVIZ Help"));
    }

    #[test]
    fn scrolled_chat_hides_newest_messages() {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let mut state = sampled_state();
        let chat = &mut state.panels.chat;
        let seq = chat.log.submit("first question");
        chat.log.deliver(seq, "first answer");
        let seq = chat.log.submit("second question");
        chat.log.deliver(seq, "second answer");
        chat.scroll_up();

        terminal
            .draw(|frame| Renderer::render(frame, &state))
            .unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("second question"));
        assert!(!text.contains("second answer"));
        assert!(text.contains("↓ 1 newer"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut state = sampled_state();
        state.add_notification("Process 4242 is no longer present".into(), NotificationLevel::Info);

        for (width, height) in [(20, 6), (80, 11), (80, 3), (1, 1)] {
            for mode in [AppMode::Dashboard, AppMode::Help] {
                state.mode = mode;
                let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
                terminal
                    .draw(|frame| Renderer::render(frame, &state))
                    .unwrap();
            }
        }
    }
}
