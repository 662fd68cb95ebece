use std::{
    io::{self, stdout, Stdout},
    panic,
};

use crossterm as ct;
use ct::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

/// A type alias for the terminal type used in this application
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal for as long as a scene is being drawn
///
/// Construction switches to the alternate screen and raw mode. Dropping the
/// context, or panicking while it is alive, restores the terminal.
pub struct RenderContext {
    terminal: Tui,
}

impl RenderContext {
    pub fn acquire() -> io::Result<Self> {
        init_panic_hook();
        ct::execute!(stdout(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self { terminal })
    }

    /// Draw a single frame
    pub fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        let _ = restore();
    }
}

/// Restore the terminal to its original state
fn restore() -> io::Result<()> {
    ct::execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Setup panic hook
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
