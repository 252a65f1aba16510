//! Board TUI entry point and setup.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::api::client::TaskApi;
use crate::board::Board;
use crate::config::Session;
use crate::project::Project;
use crate::tui::board::BoardApp;

/// Initialise and run the board terminal user interface.
pub fn run_board_tui(
    api: &dyn TaskApi,
    board: Board,
    projects: Vec<Project>,
    session: Option<Session>,
) -> io::Result<()> {
    restore_on_panic();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = BoardApp::new(api, board, projects, session);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "board terminal loop failed");
    }
    result
}

/// Leave raw mode and the alternate screen before a panic message is printed.
fn restore_on_panic() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}
