use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, widgets::*};
use tui_logger::{TuiLoggerSmartWidget, TuiWidgetEvent, TuiWidgetState};

use super::Component;
use crate::viz::input::pressed_key;

/// Episode log: the records captured by [`crate::viz::init`], grouped by module
pub struct Logs {
    state: TuiWidgetState,
}

impl Logs {
    pub fn new() -> Self {
        Self {
            state: TuiWidgetState::new().set_default_display_level(log::LevelFilter::Debug),
        }
    }

    fn widget_event(key: KeyCode) -> Option<TuiWidgetEvent> {
        let event = match key {
            KeyCode::Esc => TuiWidgetEvent::EscapeKey,
            KeyCode::PageUp => TuiWidgetEvent::PrevPageKey,
            KeyCode::PageDown => TuiWidgetEvent::NextPageKey,
            KeyCode::Up => TuiWidgetEvent::UpKey,
            KeyCode::Down => TuiWidgetEvent::DownKey,
            KeyCode::Left => TuiWidgetEvent::LeftKey,
            KeyCode::Right => TuiWidgetEvent::RightKey,
            KeyCode::Char('+') => TuiWidgetEvent::PlusKey,
            KeyCode::Char('-') => TuiWidgetEvent::MinusKey,
            KeyCode::Char('s') => TuiWidgetEvent::HideKey,
            KeyCode::Char('f') => TuiWidgetEvent::FocusKey,
            _ => return None,
        };
        Some(event)
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetRef for Logs {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Episode log");
        let inner = block.inner(area);
        block.render(area, buf);

        TuiLoggerSmartWidget::default()
            .style(Style::default().white())
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .style_debug(Style::default().dark_gray())
            .output_separator(' ')
            .state(&self.state)
            .render(inner, buf);
    }
}

impl Component for Logs {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match pressed_key(event).and_then(Self::widget_event) {
            Some(widget_event) => {
                self.state.transition(widget_event);
                true
            }
            None => false,
        }
    }
}
