//! Terminal setup and teardown around the dashboard.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::store::TaskStore;
use crate::tui::app::App;

/// Initialise the terminal, run the dashboard until the user quits, and
/// restore the terminal even when the app loop failed or panicked.
pub fn run_tui(store: &mut TaskStore) -> io::Result<()> {
    chain_panic_hook(|| {
        let _ = reset_terminal();
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(count = store.len(), "starting dashboard");
    let mut app = App::new(store);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn reset_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

/// Run `restore` ahead of the previously installed panic hook, so the
/// panic message lands on a usable screen.
fn chain_panic_hook<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn panic_hook_restores_before_reporting() {
        let restored = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&restored);
        chain_panic_hook(move || flag.store(true, Ordering::SeqCst));

        let result = std::panic::catch_unwind(|| panic!("render failed"));
        drop(std::panic::take_hook());

        assert!(result.is_err());
        assert!(restored.load(Ordering::SeqCst));
    }
}
