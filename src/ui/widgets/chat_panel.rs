//! Assistant chat transcript and input line

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::chat::{ChatMessage, Speaker};
use crate::core::state::{AppMode, AppState, FocusedPanel};
use crate::ui::theme::Theme;

const USER_PREFIX: &str = "you › ";
const ASSISTANT_PREFIX: &str = "os  › ";

pub struct ChatPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> ChatPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

/// Wrap one message to `width` columns. The speaker prefix goes on the
/// first line only; every other line, including later paragraphs, is
/// indented under it.
pub fn wrap_message(message: &ChatMessage, width: usize) -> Vec<String> {
    let prefix = match message.speaker {
        Speaker::User => USER_PREFIX,
        Speaker::Assistant => ASSISTANT_PREFIX,
    };
    let indent = " ".repeat(textwrap::core::display_width(prefix));
    let width = width.max(indent.len() + 1);

    let mut lines = Vec::new();
    for (i, paragraph) in message.text.split('\n').enumerate() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let first = if i == 0 { prefix } else { indent.as_str() };
        let options = textwrap::Options::new(width)
            .initial_indent(first)
            .subsequent_indent(&indent);
        lines.extend(
            textwrap::wrap(paragraph, options)
                .into_iter()
                .map(|l| l.into_owned()),
        );
    }
    lines
}

/// Keep the tail of `input` that fits in `width` columns.
pub fn visible_input(input: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = input.len();
    for (idx, ch) in input.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &input[start..]
}

impl<'a> Widget for ChatPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.state.focus_panel == FocusedPanel::Chat;
        let typing = self.state.mode == AppMode::ChatInput;
        let border_style = if focused || typing {
            self.theme.styles.panel_border_focused
        } else {
            self.theme.styles.panel_border
        };

        let chat = &self.state.panels.chat;
        let title = match chat.log.messages().last() {
            Some(last) => format!(" OS TUTOR · {} ", last.timestamp.format("%H:%M")),
            None => " OS TUTOR ".to_string(),
        };

        let block = Block::default()
            .title(Span::styled(title, self.theme.styles.panel_title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.colors.bg_primary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 {
            return;
        }

        let width = inner.width as usize;

        // Transcript, newest at the bottom
        let mut lines: Vec<Line> = Vec::new();
        if chat.log.messages().is_empty() {
            lines.push(Line::from(Span::styled(
                "Ask about CPU, memory, processes, disks, networking or OS theory. Type 'help' for topics.",
                Style::default().fg(self.theme.colors.fg_muted),
            )));
        }
        // `scroll_back` hides that many of the newest messages
        let messages = chat.log.messages();
        let shown = messages.len() - chat.scroll_back.min(messages.len());
        for message in &messages[..shown] {
            let style = match message.speaker {
                Speaker::User => self.theme.styles.chat_user,
                Speaker::Assistant => self.theme.styles.chat_assistant,
            };
            for text in wrap_message(message, width) {
                lines.push(Line::from(Span::styled(text, style)));
            }
            lines.push(Line::default());
        }
        if chat.scroll_back > 0 {
            lines.push(Line::from(Span::styled(
                format!("↓ {} newer", chat.scroll_back),
                Style::default().fg(self.theme.colors.fg_muted),
            )));
        } else if chat.log.pending() > 0 {
            lines.push(Line::from(Span::styled(
                format!("{}thinking…", ASSISTANT_PREFIX),
                self.theme
                    .styles
                    .chat_assistant
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        let transcript_height = (inner.height - 1) as usize;
        let start = lines.len().saturating_sub(transcript_height);
        for (i, line) in lines[start..].iter().enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }

        // Input line
        let input_y = inner.bottom() - 1;
        let prompt = "> ";
        let prompt_style = if typing {
            self.theme.styles.keybind_key
        } else {
            Style::default().fg(self.theme.colors.fg_muted)
        };
        let field_width = width.saturating_sub(prompt.len() + 1);
        let mut spans = vec![
            Span::styled(prompt, prompt_style),
            Span::styled(
                visible_input(&chat.input, field_width),
                Style::default().fg(self.theme.colors.fg_primary),
            ),
        ];
        if typing {
            spans.push(Span::styled("▏", self.theme.styles.keybind_key));
        } else if chat.input.is_empty() {
            spans.push(Span::styled(
                "press i to ask",
                Style::default().fg(self.theme.colors.fg_muted),
            ));
        }
        buf.set_line(inner.x, input_y, &Line::from(spans), inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(speaker: Speaker, text: &str) -> ChatMessage {
        ChatMessage {
            speaker,
            text: text.to_string(),
            timestamp: chrono::Local::now(),
        }
    }

    #[test]
    fn prefix_only_on_first_line() {
        let msg = message(Speaker::Assistant, "first paragraph\n\n• bullet one");
        let lines = wrap_message(&msg, 40);

        assert_eq!(lines[0], "os  › first paragraph");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "      • bullet one");
    }

    #[test]
    fn long_text_wraps_within_width() {
        let msg = message(Speaker::User, "explain how virtual memory paging works please");
        let lines = wrap_message(&msg, 20);

        assert!(lines.len() > 1);
        assert!(lines[0].starts_with(USER_PREFIX));
        for line in &lines {
            assert!(textwrap::core::display_width(line) <= 20, "{line:?}");
        }
    }

    #[test]
    fn input_shows_its_tail() {
        assert_eq!(visible_input("hello world", 5), "world");
        assert_eq!(visible_input("hi", 5), "hi");
        assert_eq!(visible_input("日本語", 4), "本語");
    }
}
