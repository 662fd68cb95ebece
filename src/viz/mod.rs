//! Terminal rendering of the environments.
//!
//! The environments never depend on this module. It reads their public state to
//! draw a scene and drives them with a [`Policy`](crate::policy::Policy).

mod app;
mod components;
mod input;
mod tui;

pub use app::{App, View};
pub use components::{ClassroomPanel, Scene, SceneConfig, Sprite};
pub use tui::RenderContext;

/// Capture `log` records for the Logs tab
pub fn init() -> Result<(), log::SetLoggerError> {
    tui_logger::init_logger(log::LevelFilter::Debug)?;
    tui_logger::set_default_level(log::LevelFilter::Debug);
    Ok(())
}
