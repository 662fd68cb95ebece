pub mod classroom_panel;
pub mod help;
pub mod log;
pub mod scene;

use crossterm::event::Event;
use ratatui::widgets::WidgetRef;

pub use classroom_panel::ClassroomPanel;
pub use self::log::Logs;
pub use scene::{Scene, SceneConfig, Sprite};

/// A stateful widget that consumes terminal events
pub trait Component: WidgetRef {
    /// **Returns** whether the event was handled
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}
