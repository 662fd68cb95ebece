use crossterm::event::{Event, KeyCode, KeyEventKind};

/// What a key press asks the [`App`](super::App) to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Command {
    Quit,
    ToggleHelp,
    NextTab,
    /// Replace the policy's next decision with the environment's manual action
    Override,
}

impl Command {
    pub(super) fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Self::Quit),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ToggleHelp),
            KeyCode::Tab => Some(Self::NextTab),
            KeyCode::Char(' ') | KeyCode::Up => Some(Self::Override),
            _ => None,
        }
    }
}

/// The [`KeyCode`] of a key press, ignoring releases and repeats
pub(super) fn pressed_key(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key.code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyEventState, KeyModifiers};

    use super::*;

    #[test]
    fn only_presses_are_read() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        assert_eq!(pressed_key(&press), Some(KeyCode::Char(' ')), "press read");

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(pressed_key(&release), None, "release ignored");
        assert_eq!(pressed_key(&Event::FocusGained), None, "non-key ignored");
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::Tab), Some(Command::NextTab));
        assert_eq!(Command::from_key(KeyCode::Up), Some(Command::Override));
        assert_eq!(Command::from_key(KeyCode::Char('x')), None, "unbound key");
    }
}
