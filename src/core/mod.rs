//! Dashboard orchestration: event loop and application state

pub mod app;
pub mod events;
pub mod state;
