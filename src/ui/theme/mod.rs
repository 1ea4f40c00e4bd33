//! Color palettes for the dashboard

use ratatui::style::{Color, Modifier, Style};

use crate::simulator::LoadTag;

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub styles: ThemeStyles,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
}

#[derive(Debug, Clone)]
pub struct ThemeStyles {
    pub header: Style,
    pub footer: Style,
    pub panel_title: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub list_item: Style,
    pub list_item_selected: Style,
    pub load_low: Style,
    pub load_medium: Style,
    pub load_high: Style,
    pub sparkline: Style,
    pub keybind: Style,
    pub keybind_key: Style,
    pub chat_user: Style,
    pub chat_assistant: Style,
    pub notification_info: Style,
    pub notification_warning: Style,
}

fn hex(rgb: u32) -> Color {
    Color::from_u32(rgb)
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "solarized" | "solarized-dark" => Self::solarized(),
            "gruvbox" => Self::gruvbox(),
            _ => Self::tokyo_night(), // Default
        }
    }

    /// Tokyo Night theme (default)
    pub fn tokyo_night() -> Self {
        let colors = ThemeColors {
            bg_primary: hex(0x1a1b26),
            bg_secondary: hex(0x24283b),
            bg_tertiary: hex(0x292e42),

            fg_primary: hex(0xc0caf5),
            fg_secondary: hex(0xa9b1d6),
            fg_muted: hex(0x565f89),

            accent_primary: hex(0x7aa2f7),
            accent_secondary: hex(0xbb9af7),

            success: hex(0x9ece6a),
            warning: hex(0xe0af68),
            error: hex(0xf7768e),
            info: hex(0x7dcfff),

            border: hex(0x292e42),
            border_focused: hex(0x7aa2f7),
            selection: hex(0x343b58),
        };

        Self::from_colors("Tokyo Night", colors)
    }

    pub fn solarized() -> Self {
        let colors = ThemeColors {
            bg_primary: hex(0x002b36),
            bg_secondary: hex(0x073642),
            bg_tertiary: hex(0x0a4050),

            fg_primary: hex(0x93a1a1),
            fg_secondary: hex(0x839496),
            fg_muted: hex(0x586e75),

            accent_primary: hex(0x268bd2),
            accent_secondary: hex(0x6c71c4),

            success: hex(0x859900),
            warning: hex(0xb58900),
            error: hex(0xdc322f),
            info: hex(0x2aa198),

            border: hex(0x073642),
            border_focused: hex(0x268bd2),
            selection: hex(0x0d4a5a),
        };

        Self::from_colors("Solarized", colors)
    }

    pub fn gruvbox() -> Self {
        let colors = ThemeColors {
            bg_primary: hex(0x282828),
            bg_secondary: hex(0x3c3836),
            bg_tertiary: hex(0x504945),

            fg_primary: hex(0xebdbb2),
            fg_secondary: hex(0xd5c4a1),
            fg_muted: hex(0xa89984),

            accent_primary: hex(0x83a598),
            accent_secondary: hex(0xd3869b),

            success: hex(0xb8bb26),
            warning: hex(0xfabd2f),
            error: hex(0xfb4934),
            info: hex(0x83a598),

            border: hex(0x504945),
            border_focused: hex(0x83a598),
            selection: hex(0x665c54),
        };

        Self::from_colors("Gruvbox", colors)
    }

    fn from_colors(name: &str, colors: ThemeColors) -> Self {
        let styles = ThemeStyles {
            header: Style::default()
                .bg(colors.bg_secondary)
                .fg(colors.fg_primary),
            footer: Style::default().bg(colors.bg_secondary).fg(colors.fg_muted),
            panel_title: Style::default()
                .fg(colors.accent_primary)
                .add_modifier(Modifier::BOLD),
            panel_border: Style::default().fg(colors.border),
            panel_border_focused: Style::default().fg(colors.border_focused),
            list_item: Style::default().fg(colors.fg_primary),
            list_item_selected: Style::default()
                .fg(colors.fg_primary)
                .bg(colors.selection)
                .add_modifier(Modifier::BOLD),
            load_low: Style::default().fg(colors.success),
            load_medium: Style::default().fg(colors.warning),
            load_high: Style::default().fg(colors.error),
            sparkline: Style::default().fg(colors.accent_primary),
            keybind: Style::default().fg(colors.fg_muted),
            keybind_key: Style::default()
                .fg(colors.accent_secondary)
                .add_modifier(Modifier::BOLD),
            chat_user: Style::default()
                .fg(colors.accent_secondary)
                .add_modifier(Modifier::BOLD),
            chat_assistant: Style::default().fg(colors.fg_secondary),
            notification_info: Style::default().fg(colors.info),
            notification_warning: Style::default().fg(colors.warning),
        };

        Self {
            name: name.to_string(),
            colors,
            styles,
        }
    }
}

impl Theme {
    pub fn load_style(&self, load: LoadTag) -> Style {
        match load {
            LoadTag::Low => self.styles.load_low,
            LoadTag::Medium => self.styles.load_medium,
            LoadTag::High => self.styles.load_high,
        }
    }

    /// Style for a utilisation percentage, warming up past 60 and 85.
    pub fn usage_style(&self, percent: f64) -> Style {
        if percent > 85.0 {
            self.styles.load_high
        } else if percent > 60.0 {
            self.styles.load_medium
        } else {
            self.styles.load_low
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::tokyo_night()
    }
}
