//! Layout management system

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed layout rects for all panels
#[derive(Debug, Clone, Default)]
pub struct ComputedLayout {
    pub header: Rect,
    pub footer: Rect,
    pub metrics_panel: Rect,
    pub alerts_panel: Rect,
    pub process_panel: Rect,
    pub chat_panel: Rect,
    pub overlay_area: Rect,
}

pub struct LayoutManager;

impl LayoutManager {
    /// Compute all panel rects for the terminal area
    pub fn compute(area: Rect) -> ComputedLayout {
        // Main vertical split: header, body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(10),   // Body
                Constraint::Length(1), // Footer
            ])
            .split(area);

        // Body: system column | chat
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Min(30)])
            .split(main_chunks[1]);

        let system_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // Metrics
                Constraint::Length(4), // Alerts
                Constraint::Min(5),    // Processes
            ])
            .split(body_chunks[0]);

        ComputedLayout {
            header: main_chunks[0],
            footer: main_chunks[2],
            metrics_panel: system_chunks[0],
            alerts_panel: system_chunks[1],
            process_panel: system_chunks[2],
            chat_panel: body_chunks[1],
            overlay_area: centered_rect(60, 60, area),
        }
    }
}

/// Create a centered rect with given percentage width/height
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
