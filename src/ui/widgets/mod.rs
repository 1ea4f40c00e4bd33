//! UI Widgets

pub mod alerts_panel;
pub mod chat_panel;
pub mod footer;
pub mod header;
pub mod help_overlay;
pub mod metrics_panel;
pub mod process_detail;
pub mod process_panel;

pub use alerts_panel::AlertsPanel;
pub use chat_panel::ChatPanel;
pub use footer::Footer;
pub use header::Header;
pub use help_overlay::HelpOverlay;
pub use metrics_panel::MetricsPanel;
pub use process_detail::ProcessDetail;
pub use process_panel::ProcessPanel;
