//! # TB - Task Board Client
//!
//! A terminal client for a project task tracker: a Kanban board of a project's
//! tasks in five status columns, plus a CLI for scripting the same operations.
//!
//! ## Key Features
//!
//! - **Kanban Board**: Backlog → Open → In Progress → On Hold → Completed, one column per status
//! - **Optimistic Moves**: Cards move immediately; a refused move reloads the board from the server
//! - **Task Forms**: Title, description, status, tags, due date and assignees with validation
//! - **Edit Rights**: Creators and project managers edit everything, others change status only
//! - **Contexts**: Several servers side by side, each with its own session and default project
//!
//! ## Quick Start
//!
//! ```bash
//! # Point the client at a server and log in
//! tb context set work --server https://admin.example.org/api --project 1
//! tb login --user ama
//!
//! # Open the board
//! tb board
//!
//! # Or script it
//! tb add "Export member list" --tag backend --due "in 3d"
//! tb move 42 in-progress
//! tb list --status open
//! ```
//!
//! ## Key Commands
//!
//! - `tb board` - Interactive board for the context's project
//! - `tb list` / `tb view <id>` - Read tasks
//! - `tb add <title>` / `tb update <id>` - Create and edit tasks
//! - `tb move <id> <status>` - Change a task's column
//! - `tb delete <id>` - Delete after confirmation
//!
//! Configuration lives in `~/.taskboard/config.toml`. The board writes its log to
//! `~/.taskboard/taskboard.log` so the terminal stays clean.

use std::io;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod form;
pub mod notify;
pub mod project;
pub mod task;
pub mod util;
pub mod api {
    pub mod client;
    pub mod http;
    #[cfg(test)]
    pub mod memory;
}
pub mod tui {
    pub mod board;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::{config_dir, ClientConfig};

/// Install the tracing subscriber.
///
/// The board owns the terminal, so it logs to a file; every other command
/// logs to stderr.
fn init_tracing(level: &str, to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if to_file {
        let dir = config_dir();
        let file = std::fs::create_dir_all(&dir).and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("taskboard.log"))
        });
        match file {
            Ok(file) => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(Mutex::new(file))
                            .with_ansi(false),
                    )
                    .init();
                return;
            }
            Err(e) => eprintln!("Warning: cannot open log file in {}: {}", dir.display(), e),
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let mut ws = Workspace::load(config_path, cli.context.clone())?;

    match cli.command {
        Commands::Board { project } => cmd_board(&ws, project),

        Commands::List { project, status, tags } => {
            let project = ws.project(project)?;
            cmd_list(&ws.api()?, project, status, &tags)
        }

        Commands::View { id } => cmd_view(&ws.api()?, id),

        Commands::Add { title, project, desc, status, tags, due, assignees } => {
            let project = ws.project(project)?;
            cmd_add(&ws.api()?, project, title, desc, status, tags, due, assignees).map(|_| ())
        }

        Commands::Update {
            id, title, desc, status, tags, clear_tags, due, clear_due, assignees, clear_assignees,
        } => cmd_update(
            &ws.api()?, ws.session(), id, title, desc, status, tags, clear_tags, due, clear_due,
            assignees, clear_assignees,
        ),

        Commands::Move { id, status } => cmd_move(&ws.api()?, id, status).map(|_| ()),

        Commands::Delete { id, yes } => {
            let stdin = io::stdin();
            cmd_delete(&ws.api()?, id, yes, &mut stdin.lock()).map(|_| ())
        }

        Commands::Projects => cmd_projects(&ws.api()?),

        Commands::Login { user, password } => cmd_login(&mut ws, &user, password),

        Commands::Logout => cmd_logout(&mut ws),

        Commands::Context { action } => cmd_context(&mut ws, action),

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, matches!(cli.command, Commands::Board { .. }));

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
