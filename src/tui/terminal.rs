use std::{
    io::{self, Stdout},
    sync::Once,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::view::{self, DialogFrame};

static RESTORE_ON_PANIC: Once = Once::new();

/// Alternate screen in raw mode that a dialog is drawn on. The previous terminal state comes
/// back when the screen is dropped or the thread panics outside a validator.
pub(super) struct DialogScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl DialogScreen {
    pub(super) fn open() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            leave_screen();
            return Err(err).context("failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout())).map_err(|err| {
            leave_screen();
            anyhow::Error::new(err).context("failed to initialize terminal")
        })?;
        RESTORE_ON_PANIC.call_once(chain_panic_hook);
        Ok(Self { terminal })
    }

    pub(super) fn render(&mut self, dialog: &DialogFrame<'_>) -> Result<()> {
        self.terminal
            .draw(|frame| view::draw(frame, dialog))
            .context("failed to draw dialog")?;
        Ok(())
    }
}

impl Drop for DialogScreen {
    fn drop(&mut self) {
        leave_screen();
    }
}

fn chain_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Validator panics are caught and turned into an invalid field; the dialog stays up.
        if crate::form::is_validating() {
            return;
        }
        leave_screen();
        previous(info);
    }));
}

fn leave_screen() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}
