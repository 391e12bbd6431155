use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Set while raw mode and the alternate screen are active, so the panic hook
/// and the normal exit path restore the terminal only once.
static ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn init() -> io::Result<Tui> {
    execute!(io::stdout(), EnterAlternateScreen, Hide)?;
    enable_raw_mode()?;
    ACTIVE.store(true, Ordering::SeqCst);
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

/// Claim the teardown. Only the first caller after [`init`] gets `true`.
fn take_active() -> bool {
    ACTIVE.swap(false, Ordering::SeqCst)
}

pub fn restore() -> io::Result<()> {
    if !take_active() {
        return Ok(());
    }
    disable_raw_mode()?;
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    Ok(())
}

/// Tear the terminal down and bring it back up at its current size.
pub fn reinit() -> io::Result<Tui> {
    restore()?;
    init()
}
