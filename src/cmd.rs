//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and their handlers, from
//! session management to task CRUD and the board TUI. Handlers that talk to
//! the backend take a `&dyn TaskApi` so they run unchanged against a fake.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context as _, Result};
use chrono::{Local, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::api::client::TaskApi;
use crate::api::http::{login, HttpApi};
use crate::board::{Board, DeleteOutcome, MoveOutcome, NoOp};
use crate::config::{ClientConfig, Context, Session};
use crate::fields::*;
use crate::form::{EditRights, TaskFormData};
use crate::notify::{ToastLevel, Toasts};
use crate::task::{ProjectId, TaskId, UserId};
use crate::tui::run::run_board_tui;
use crate::util::{format_due_relative, format_tags, print_table};

#[derive(Subcommand)]
pub enum Commands {
    /// Open the task board.
    Board {
        /// Project ID. Defaults to the context's project.
        #[arg(long)]
        project: Option<ProjectId>,
    },

    /// List tasks of a project, grouped by status.
    List {
        #[arg(long)]
        project: Option<ProjectId>,
        /// Only this status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Only tasks carrying this tag. May be repeated.
        #[arg(long = "tag", value_enum)]
        tags: Vec<Tag>,
    },

    /// View a single task.
    View {
        id: TaskId,
    },

    /// Create a task.
    Add {
        /// Short title for the task.
        title: String,
        #[arg(long)]
        project: Option<ProjectId>,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Initial status.
        #[arg(long, value_enum, default_value_t = Status::Backlog)]
        status: Status,
        /// Tag. May be repeated.
        #[arg(long = "tag", value_enum)]
        tags: Vec<Tag>,
        /// Due date: YYYY-MM-DD, "YYYY-MM-DD HH:MM", "tomorrow", "in Nd", ...
        #[arg(long)]
        due: Option<String>,
        /// Assignee user ID. May be repeated.
        #[arg(long = "assignee")]
        assignees: Vec<UserId>,
    },

    /// Update fields on a task.
    Update {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Replace tags with these. May be repeated.
        #[arg(long = "tag", value_enum)]
        tags: Vec<Tag>,
        /// Remove all tags.
        #[arg(long)]
        clear_tags: bool,
        #[arg(long)]
        due: Option<String>,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
        /// Replace assignees with these user IDs. May be repeated.
        #[arg(long = "assignee")]
        assignees: Vec<UserId>,
        /// Remove all assignees.
        #[arg(long)]
        clear_assignees: bool,
    },

    /// Move a task to another status column.
    Move {
        id: TaskId,
        #[arg(value_enum)]
        status: Status,
    },

    /// Delete a task.
    Delete {
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// List projects and their developers.
    Projects,

    /// Log in to the context's server and store the session.
    Login {
        #[arg(long)]
        user: String,
        /// Password. Read from TB_PASSWORD or stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the stored session.
    Logout,

    /// Manage server contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ContextAction {
    /// Create or update a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
        /// Default project for the board.
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// Make a context current.
    Use {
        name: String,
    },
    /// List contexts.
    List,
    /// Remove a context.
    Remove {
        name: String,
    },
}

/// Loaded configuration plus the context selected on the command line.
pub struct Workspace {
    pub config_path: PathBuf,
    pub config: ClientConfig,
    pub context_name: Option<String>,
}

impl Workspace {
    pub fn load(config_path: PathBuf, context_name: Option<String>) -> Result<Self> {
        let config = ClientConfig::load(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        Ok(Workspace { config_path, config, context_name })
    }

    pub fn context(&self) -> Result<&Context> {
        self.config.resolve(self.context_name.as_deref()).ok_or_else(|| match self.context_name {
            Some(ref n) => anyhow!("No context named \"{}\".", n),
            None => anyhow!("No current context. Run `tb context set <name> --server <url>`."),
        })
    }

    pub fn api(&self) -> Result<HttpApi> {
        Ok(HttpApi::from_context(self.context()?, &self.config.api)?)
    }

    pub fn session(&self) -> Option<&Session> {
        self.context().ok().and_then(|c| c.user.as_ref())
    }

    /// Explicit project, else the context default.
    pub fn project(&self, explicit: Option<ProjectId>) -> Result<ProjectId> {
        explicit
            .or_else(|| self.context().ok().and_then(|c| c.project))
            .ok_or_else(|| anyhow!("No project given. Pass --project or run `tb context set <name> --project <id>`."))
    }

    pub fn toasts(&self) -> Toasts {
        Toasts::new(Duration::from_secs(self.config.ui.toast_seconds))
    }
}

/// Print and drop every toast the board raised.
fn flush_toasts(board: &mut Board) {
    for toast in board.toasts_mut().drain() {
        match toast.level {
            ToastLevel::Info => println!("{}", toast.message),
            ToastLevel::Error => eprintln!("Error: {}", toast.message),
        }
    }
}

/// Open the board TUI.
pub fn cmd_board(ws: &Workspace, project: Option<ProjectId>) -> Result<()> {
    let api = ws.api()?;
    let project_id = ws.project(project)?;
    let projects = api.list_projects().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not list projects");
        Vec::new()
    });
    let mut board = Board::new(project_id, ws.toasts());
    board.load(&api);
    run_board_tui(&api, board, projects, ws.session().cloned())?;
    Ok(())
}

pub fn cmd_list(api: &dyn TaskApi, project: ProjectId, status: Option<Status>, tags: &[Tag]) -> Result<()> {
    let mut board = Board::new(project, Toasts::default());
    if !board.load(api) {
        flush_toasts(&mut board);
        bail!("could not load tasks for project {}", project);
    }

    let mut rows = Vec::new();
    for column in Status::ALL {
        if status.is_some_and(|s| s != column) {
            continue;
        }
        rows.extend(
            board
                .column(column)
                .into_iter()
                .filter(|t| tags.iter().all(|tag| t.tags.contains(tag))),
        );
    }

    if rows.is_empty() {
        println!("No tasks.");
    } else {
        print_table(&rows);
    }
    Ok(())
}

pub fn cmd_view(api: &dyn TaskApi, id: TaskId) -> Result<()> {
    let t = api.get_task(id)?;
    let today = Local::now().date_naive();
    println!("Task #{}: {}", t.id, t.title);
    println!("  Status:    {}", format_status(t.status));
    println!("  Project:   {}", t.project_id);
    println!("  Tags:      {}", if t.tags.is_empty() { "-".to_string() } else { format_tags(&t.tags) });
    println!(
        "  Due:       {}",
        match t.due_date {
            Some(d) => format!("{} ({})", d.with_timezone(&Local).format("%Y-%m-%d %H:%M"), format_due_relative(Some(d), today)),
            None => "-".to_string(),
        }
    );
    let assignees: Vec<&str> = t.assignees.iter().map(|a| a.name.as_str()).collect();
    println!("  Assignees: {}", if assignees.is_empty() { "-".to_string() } else { assignees.join(", ") });
    println!("  Creator:   {}", t.created_by_id);
    println!("  Created:   {}", t.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    println!("  Updated:   {}", t.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    if let Some(desc) = t.description.as_deref() {
        println!();
        println!("{}", desc);
    }
    Ok(())
}

/// Warn about assignees outside the project roster. The backend decides.
fn check_roster(api: &dyn TaskApi, project: ProjectId, assignees: &BTreeSet<UserId>) {
    if assignees.is_empty() {
        return;
    }
    if let Ok(p) = api.get_project(project) {
        let ids: Vec<UserId> = assignees.iter().copied().collect();
        let on_roster = p.roster_filter(&ids);
        for id in ids.iter().filter(|id| !on_roster.contains(id)) {
            eprintln!("Warning: user {} is not a developer on project '{}'", id, p.name);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    api: &dyn TaskApi,
    project: ProjectId,
    title: String,
    desc: Option<String>,
    status: Status,
    tags: Vec<Tag>,
    due: Option<String>,
    assignees: Vec<UserId>,
) -> Result<TaskId> {
    let mut form = TaskFormData::new(status);
    form.title = title;
    form.description = desc.unwrap_or_default();
    form.tags = tags.into_iter().collect();
    form.due = due.unwrap_or_default();
    form.assignees = assignees.into_iter().collect();

    // Validate before the roster lookup so a bad form sends nothing.
    form.to_new_task(project, Utc::now())?;
    check_roster(api, project, &form.assignees);

    let mut board = Board::new(project, Toasts::default());
    let result = board.submit_form(api, &form, EditRights::FULL, Utc::now());
    board.toasts_mut().clear();
    let id = result?;
    println!("Created task {}", id);
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    api: &dyn TaskApi,
    session: Option<&Session>,
    id: TaskId,
    title: Option<String>,
    desc: Option<String>,
    status: Option<Status>,
    tags: Vec<Tag>,
    clear_tags: bool,
    due: Option<String>,
    clear_due: bool,
    assignees: Vec<UserId>,
    clear_assignees: bool,
) -> Result<()> {
    let task = api.get_task(id)?;
    let rights = EditRights::for_task(session, Some(&task));
    let mut form = TaskFormData::from_task(&task);

    let touches_details = title.is_some() || desc.is_some() || !tags.is_empty() || clear_tags
        || due.is_some() || clear_due || !assignees.is_empty() || clear_assignees;
    if touches_details && !rights.details {
        bail!("Only the task's creator or a project manager can change its details; status can still be changed.");
    }

    if let Some(t) = title {
        form.title = t;
    }
    if let Some(d) = desc {
        form.description = d;
    }
    if let Some(s) = status {
        form.status = s;
    }
    if clear_tags {
        form.tags.clear();
    }
    if !tags.is_empty() {
        form.tags = tags.into_iter().collect();
    }
    if clear_due {
        form.due.clear();
    }
    if let Some(d) = due {
        form.due = d;
    }
    if clear_assignees {
        form.assignees.clear();
    }
    if !assignees.is_empty() {
        form.assignees = assignees.into_iter().collect();
        check_roster(api, task.project_id, &form.assignees);
    }

    let mut board = Board::new(task.project_id, Toasts::default());
    let result = board.submit_form(api, &form, rights, Utc::now());
    board.toasts_mut().clear();
    result?;
    println!("Updated task {}", id);
    Ok(())
}

pub fn cmd_move(api: &dyn TaskApi, id: TaskId, status: Status) -> Result<MoveOutcome> {
    let task = api.get_task(id)?;
    let mut board = Board::new(task.project_id, Toasts::default());
    if !board.load(api) {
        flush_toasts(&mut board);
        bail!("could not load tasks for project {}", task.project_id);
    }
    let outcome = board.move_to(api, id, status);
    flush_toasts(&mut board);
    match outcome {
        MoveOutcome::NoOp(NoOp::SamePosition) | MoveOutcome::NoOp(NoOp::Reorder) => {
            println!("Task {} is already {}", id, format_status(status));
        }
        MoveOutcome::NoOp(_) => bail!("Task {} not found on its project board", id),
        MoveOutcome::Reverted => bail!("Task {} was not moved", id),
        MoveOutcome::Confirmed => {}
    }
    Ok(outcome)
}

/// Delete after confirmation read from `input` unless `yes` is set.
pub fn cmd_delete(api: &dyn TaskApi, id: TaskId, yes: bool, input: &mut dyn BufRead) -> Result<bool> {
    let task = api.get_task(id)?;
    let mut board = Board::new(task.project_id, Toasts::default());
    board.load(api);
    if !board.request_delete(id) {
        flush_toasts(&mut board);
        bail!("Task {} not found on its project board", id);
    }

    if !yes {
        print!("Delete task {} '{}'? This cannot be undone. [y/N] ", id, task.title);
        io::stdout().flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            board.cancel_delete();
            println!("Cancelled.");
            return Ok(false);
        }
    }

    let outcome = board.confirm_delete(api);
    flush_toasts(&mut board);
    match outcome {
        DeleteOutcome::Deleted => Ok(true),
        _ => bail!("Task {} was not deleted", id),
    }
}

pub fn cmd_projects(api: &dyn TaskApi) -> Result<()> {
    let projects = api.list_projects()?;
    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }
    println!("{:<6} {:<28} {}", "ID", "Name", "Developers");
    for p in projects {
        let devs: Vec<String> = p.developers.iter().map(|d| format!("{} ({})", d.name, d.id)).collect();
        println!("{:<6} {:<28} {}", p.id, p.name, if devs.is_empty() { "-".to_string() } else { devs.join(", ") });
    }
    Ok(())
}

pub fn cmd_login(ws: &mut Workspace, user: &str, password: Option<String>) -> Result<()> {
    let ctx = ws.context()?.clone();
    if ctx.server.is_empty() {
        bail!(
            "No server URL set for context \"{}\". Run `tb context set {} --server <url>`.",
            ctx.name, ctx.name
        );
    }

    let password = match password.or_else(|| std::env::var("TB_PASSWORD").ok()) {
        Some(p) => p,
        None => {
            print!("Password: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let timeout = Duration::from_secs(ws.config.api.timeout_seconds);
    let resp = login(&ctx.server, user, &password, timeout)?;
    let session = Session {
        user_id: resp.user.id,
        username: resp.user.username.clone(),
        roles: resp.user.all_roles(),
    };

    let ctx_mut = ws
        .config
        .get_mut(&ctx.name)
        .ok_or_else(|| anyhow!("Context disappeared"))?;
    ctx_mut.token = resp.token;
    ctx_mut.user = Some(session);
    ws.config.save(&ws.config_path)?;

    println!("Logged in as {}.", resp.user.username);
    println!("Session saved to context \"{}\".", ctx.name);
    Ok(())
}

pub fn cmd_logout(ws: &mut Workspace) -> Result<()> {
    let name = ws.context()?.name.clone();
    let ctx = ws
        .config
        .get_mut(&name)
        .ok_or_else(|| anyhow!("Context not found."))?;
    ctx.token.clear();
    ctx.user = None;
    ws.config.save(&ws.config_path)?;
    println!("Logged out from context \"{}\".", name);
    Ok(())
}

pub fn cmd_context(ws: &mut Workspace, action: ContextAction) -> Result<()> {
    match action {
        ContextAction::Set { name, server, project } => {
            let mut ctx = ws
                .config
                .resolve(Some(&name))
                .cloned()
                .unwrap_or_else(|| Context::new(&name));
            if let Some(s) = server {
                if ctx.server != s {
                    // A session belongs to the server that issued it.
                    ctx.token.clear();
                    ctx.user = None;
                }
                ctx.server = s;
            }
            if project.is_some() {
                ctx.project = project;
            }
            ws.config.upsert_context(ctx);
            if ws.config.current_context.is_empty() {
                ws.config.current_context = name.clone();
            }
            ws.config.save(&ws.config_path)?;
            println!("Context \"{}\" saved.", name);
        }
        ContextAction::Use { name } => {
            if ws.config.resolve(Some(&name)).is_none() {
                bail!("No context named \"{}\".", name);
            }
            ws.config.current_context = name.clone();
            ws.config.save(&ws.config_path)?;
            println!("Switched to context \"{}\".", name);
        }
        ContextAction::List => {
            if ws.config.contexts.is_empty() {
                println!("No contexts.");
            }
            for c in &ws.config.contexts {
                let marker = if c.name == ws.config.current_context { "*" } else { " " };
                let user = c.user.as_ref().map(|u| u.username.as_str()).unwrap_or("-");
                let project = c.project.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
                println!("{} {:<16} {:<40} user={} project={}", marker, c.name, c.server, user, project);
            }
        }
        ContextAction::Remove { name } => {
            if !ws.config.remove_context(&name) {
                bail!("No context named \"{}\".", name);
            }
            ws.config.save(&ws.config_path)?;
            println!("Removed context \"{}\".", name);
        }
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = crate::cli::Cli::command();
    generate(shell, &mut cmd, "tb", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryApi;

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::load(dir.path().join("config.toml"), None).unwrap();
        (dir, ws)
    }

    #[test]
    fn test_move_confirmed() {
        let api = MemoryApi::new().with_task(1, "Deployments page", Status::Open);
        assert_eq!(cmd_move(&api, 1, Status::Completed).unwrap(), MoveOutcome::Confirmed);
        assert_eq!(api.stored(1).unwrap().status, Status::Completed);
    }

    #[test]
    fn test_move_rejected_is_an_error() {
        let api = MemoryApi::new().with_task(1, "Deployments page", Status::Open);
        api.fail_update.set(true);
        assert!(cmd_move(&api, 1, Status::InProgress).is_err());
        assert_eq!(api.stored(1).unwrap().status, Status::Open);
    }

    #[test]
    fn test_move_to_same_status_sends_no_patch() {
        let api = MemoryApi::new().with_task(1, "a", Status::OnHold);
        let outcome = cmd_move(&api, 1, Status::OnHold).unwrap();
        assert!(matches!(outcome, MoveOutcome::NoOp(_)));
        assert!(api.requests.borrow().iter().all(|r| !r.starts_with("PATCH")));
    }

    #[test]
    fn test_add_with_past_due_sends_nothing() {
        let api = MemoryApi::new();
        let err = cmd_add(
            &api,
            1,
            "Report".into(),
            None,
            Status::Backlog,
            vec![],
            Some("yesterday".into()),
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Due date cannot be in the past");
        assert_eq!(api.request_count(), 0);
    }

    #[test]
    fn test_add_with_unreachable_due_is_refused() {
        let api = MemoryApi::new();
        let err = cmd_add(
            &api,
            1,
            "Report".into(),
            None,
            Status::Backlog,
            vec![],
            Some("in 100000000d".into()),
            vec![],
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Unrecognised due date"));
        assert_eq!(api.request_count(), 0);
    }

    #[test]
    fn test_add_creates_task() {
        let api = MemoryApi::new();
        let id = cmd_add(
            &api,
            1,
            "Audit log filters".into(),
            Some("by actor".into()),
            Status::Open,
            vec![Tag::Frontend],
            None,
            vec![10],
        )
        .unwrap();
        let t = api.stored(id).unwrap();
        assert_eq!(t.status, Status::Open);
        assert_eq!(t.description.as_deref(), Some("by actor"));
        assert_eq!(t.assignee_ids().into_iter().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_update_details_needs_rights() {
        let api = MemoryApi::new().with_task(1, "a", Status::Open);
        let outsider = Session { user_id: 99, username: "x".into(), roles: vec![] };
        let err = cmd_update(
            &api,
            Some(&outsider),
            1,
            Some("b".into()),
            None,
            None,
            vec![],
            false,
            None,
            false,
            vec![],
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("status can still be changed"));

        cmd_update(
            &api,
            Some(&outsider),
            1,
            None,
            None,
            Some(Status::OnHold),
            vec![],
            false,
            None,
            false,
            vec![],
            false,
        )
        .unwrap();
        assert_eq!(api.stored(1).unwrap().status, Status::OnHold);
        assert_eq!(api.stored(1).unwrap().title, "a");
    }

    #[test]
    fn test_update_by_creator() {
        let api = MemoryApi::new().with_task(1, "a", Status::Open);
        let creator = Session { user_id: 10, username: "ama".into(), roles: vec![] };
        cmd_update(
            &api,
            Some(&creator),
            1,
            Some("Renamed".into()),
            None,
            None,
            vec![Tag::Qa],
            false,
            Some("in 3d".into()),
            false,
            vec![],
            false,
        )
        .unwrap();
        let t = api.stored(1).unwrap();
        assert_eq!(t.title, "Renamed");
        assert!(t.tags.contains(&Tag::Qa));
        assert!(t.due_date.is_some());
    }

    #[test]
    fn test_delete_prompt() {
        let api = MemoryApi::new().with_task(1, "a", Status::Open);
        let mut no = io::Cursor::new(b"n\n".to_vec());
        assert!(!cmd_delete(&api, 1, false, &mut no).unwrap());
        assert!(api.stored(1).is_some());

        let mut yes = io::Cursor::new(b"y\n".to_vec());
        assert!(cmd_delete(&api, 1, false, &mut yes).unwrap());
        assert!(api.stored(1).is_none());
    }

    #[test]
    fn test_context_set_use_remove() {
        let (_dir, mut ws) = workspace();
        cmd_context(&mut ws, ContextAction::Set {
            name: "local".into(),
            server: Some("http://localhost:3000".into()),
            project: Some(4),
        }).unwrap();
        assert_eq!(ws.config.current_context, "local");
        assert_eq!(ws.project(None).unwrap(), 4);
        assert_eq!(ws.project(Some(7)).unwrap(), 7);

        cmd_context(&mut ws, ContextAction::Set { name: "prod".into(), server: None, project: None }).unwrap();
        cmd_context(&mut ws, ContextAction::Use { name: "prod".into() }).unwrap();
        assert!(ws.project(None).is_err());
        assert!(cmd_context(&mut ws, ContextAction::Use { name: "nope".into() }).is_err());

        let reloaded = ClientConfig::load(&ws.config_path).unwrap();
        assert_eq!(reloaded.current_context, "prod");
        assert_eq!(reloaded.contexts.len(), 2);

        cmd_context(&mut ws, ContextAction::Remove { name: "prod".into() }).unwrap();
        assert!(ws.context().is_err());
    }

    #[test]
    fn test_changing_server_drops_session() {
        let (_dir, mut ws) = workspace();
        let mut ctx = Context::new("local");
        ctx.server = "http://a".into();
        ctx.token = "t".into();
        ctx.user = Some(Session { user_id: 1, username: "u".into(), roles: vec![] });
        ws.config.upsert_context(ctx);
        cmd_context(&mut ws, ContextAction::Set { name: "local".into(), server: Some("http://b".into()), project: None }).unwrap();
        let ctx = ws.config.resolve(Some("local")).unwrap();
        assert!(ctx.token.is_empty());
        assert!(ctx.user.is_none());
    }

    #[test]
    fn test_logout_clears_session() {
        let (_dir, mut ws) = workspace();
        let mut ctx = Context::new("local");
        ctx.token = "t".into();
        ctx.user = Some(Session { user_id: 1, username: "u".into(), roles: vec![] });
        ws.config.upsert_context(ctx);
        ws.config.current_context = "local".into();
        cmd_logout(&mut ws).unwrap();
        assert!(ws.session().is_none());
        assert!(ws.context().unwrap().token.is_empty());
    }
}
