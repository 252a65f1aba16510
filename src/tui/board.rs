//! Kanban board interface.
//!
//! Tasks are laid out in one column per status. Moving a card with
//! Ctrl+Left/Right is the keyboard form of a drag: the card jumps columns
//! immediately, the screen is redrawn, and only then is the status sent to
//! the backend.

use std::io;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::api::client::TaskApi;
use crate::board::{Board, DragEnd, MoveOutcome, NoOp, PendingMove, Slot};
use crate::config::Session;
use crate::fields::{format_status, format_tag, Status, Tag};
use crate::form::EditRights;
use crate::notify::ToastLevel;
use crate::project::{next_project, Project};
use crate::task::{Task, TaskId};
use crate::tui::colors::{status_color, text_on, DARK_RED, GOLD};
use crate::tui::enums::{AppState, FormField};
use crate::tui::task_form::TaskForm;
use crate::tui::utils::centered_rect;
use crate::util::{format_due_relative, format_tags};

const COLUMNS: usize = Status::ALL.len();

/// Board application state.
pub struct BoardApp<'a> {
    api: &'a dyn TaskApi,
    board: Board,
    projects: Vec<Project>,
    session: Option<Session>,
    state: AppState,
    /// State to return to when the delete confirmation is dismissed.
    return_state: AppState,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: [usize; COLUMNS],
    form: Option<TaskForm>,
    filter_active: bool,
    filter_text: String,
    status_message: String,
    /// Move applied locally, sent after the next redraw.
    pending_move: Option<PendingMove>,
    quit: bool,
}

impl<'a> BoardApp<'a> {
    pub fn new(api: &'a dyn TaskApi, board: Board, projects: Vec<Project>, session: Option<Session>) -> Self {
        BoardApp {
            api,
            board,
            projects,
            session,
            state: AppState::Board,
            return_state: AppState::Board,
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; COLUMNS],
            form: None,
            filter_active: false,
            filter_text: String::new(),
            status_message: String::new(),
            pending_move: None,
            quit: false,
        }
    }

    fn current_project(&self) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == self.board.project_id())
    }

    fn project_name(&self) -> String {
        self.current_project()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Project {}", self.board.project_id()))
    }

    fn matches_filter(&self, task: &Task) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let needle = self.filter_text.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.tags.iter().any(|t| format_tag(*t).to_lowercase().contains(&needle))
            || task.assignees.iter().any(|a| a.name.to_lowercase().contains(&needle))
    }

    /// Visible task ids of one column.
    fn column_ids(&self, column: usize) -> Vec<TaskId> {
        let status = match Status::from_column(column) {
            Some(s) => s,
            None => return Vec::new(),
        };
        self.board
            .column(status)
            .into_iter()
            .filter(|t| self.matches_filter(t))
            .map(|t| t.id)
            .collect()
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.column_ids(self.selected_column).get(self.selected_card).copied()
    }

    /// Ensure selected card index is valid for the selected column.
    fn clamp_selection(&mut self) {
        let len = self.column_ids(self.selected_column).len();
        if len == 0 {
            self.selected_card = 0;
            self.column_scroll_offsets[self.selected_column] = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    /// Put the selection on `id` wherever it now lives.
    fn select_task(&mut self, id: TaskId) {
        if let Some(task) = self.board.get(id) {
            self.selected_column = task.status.column();
            self.selected_card = self
                .column_ids(self.selected_column)
                .iter()
                .position(|&t| t == id)
                .unwrap_or(0);
        }
        self.clamp_selection();
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn rights_for(&self, task: Option<&Task>) -> EditRights {
        EditRights::for_task(self.session.as_ref(), task)
    }

    /// Move the selected card one column left or right.
    fn move_card(&mut self, right: bool) {
        let id = match self.selected_task_id() {
            Some(id) => id,
            None => return,
        };
        let target = if right {
            self.selected_column + 1
        } else {
            match self.selected_column.checked_sub(1) {
                Some(c) => c,
                None => return,
            }
        };
        let status = match Status::from_column(target) {
            Some(s) => s,
            None => return,
        };
        let source = match self.board.slot_of(id) {
            Some(s) => s,
            None => return,
        };
        let drag = DragEnd {
            task_id: id,
            source,
            destination: Some(Slot { status, index: self.board.column(status).len() }),
        };
        if let Ok(pending) = self.board.begin_move(drag) {
            self.pending_move = Some(pending);
            self.select_task(id);
        }
    }

    /// Try to move the selected card up or down within its column.
    fn reorder_card(&mut self, down: bool) {
        let id = match self.selected_task_id() {
            Some(id) => id,
            None => return,
        };
        let source = match self.board.slot_of(id) {
            Some(s) => s,
            None => return,
        };
        let index = if down { source.index + 1 } else { source.index.saturating_sub(1) };
        let drag = DragEnd { task_id: id, source, destination: Some(Slot { status: source.status, index }) };
        match self.board.begin_move(drag) {
            Err(NoOp::Reorder) => self.set_status_message("Reordering within a column is not supported"),
            Err(_) => {}
            Ok(pending) => self.pending_move = Some(pending),
        }
    }

    /// Send a move that was applied locally on the previous frame.
    fn flush_pending_move(&mut self) {
        if let Some(pending) = self.pending_move.take() {
            let id = pending.task_id;
            let outcome = self.board.finish_move(self.api, pending);
            if outcome == MoveOutcome::Reverted {
                self.select_task(id);
            }
        }
    }

    fn reload(&mut self) {
        if self.board.load(self.api) {
            self.set_status_message("Reloaded");
        }
        self.clamp_selection();
    }

    fn cycle_project(&mut self) {
        let next = match next_project(&self.projects, self.board.project_id()) {
            Some(p) => p.id,
            None => {
                self.set_status_message("No other projects");
                return;
            }
        };
        self.board.set_project(self.api, next);
        self.selected_column = 0;
        self.selected_card = 0;
        self.column_scroll_offsets = [0; COLUMNS];
        let name = self.project_name();
        self.set_status_message(format!("Switched to {}", name));
    }

    fn open_new_form(&mut self) {
        let status = Status::from_column(self.selected_column).unwrap_or_default();
        self.form = Some(TaskForm::new(status, self.current_project()));
        self.state = AppState::Form;
    }

    fn open_edit_form(&mut self) {
        let id = match self.selected_task_id() {
            Some(id) => id,
            None => return,
        };
        if let Some(task) = self.board.get(id) {
            let rights = self.rights_for(Some(task));
            self.form = Some(TaskForm::from_task(task, rights, self.current_project()));
            self.state = AppState::Form;
            if !rights.details {
                self.set_status_message("Only status can be changed on this task");
            }
        }
    }

    fn submit_form(&mut self) {
        let (data, rights) = match self.form.as_ref() {
            Some(f) => (f.to_data(), f.rights),
            None => return,
        };
        match self.board.submit_form(self.api, &data, rights, Utc::now()) {
            Ok(id) => {
                self.form = None;
                self.state = AppState::Board;
                self.select_task(id);
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    fn request_delete(&mut self, id: TaskId) {
        if self.board.request_delete(id) {
            self.return_state = self.state;
            self.state = AppState::ConfirmDelete;
        }
    }

    fn confirm_delete(&mut self) {
        self.board.confirm_delete(self.api);
        // Every dialog closes, whether or not the delete went through.
        self.form = None;
        self.state = AppState::Board;
        self.clamp_selection();
    }

    /// Handle one key press. Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.state {
            AppState::Board => self.handle_board_key(key),
            AppState::Detail => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.state = AppState::Board,
                    KeyCode::Char('e') => self.open_edit_form(),
                    _ => {}
                }
                false
            }
            AppState::Form => {
                self.handle_form_key(key);
                false
            }
            AppState::ConfirmDelete => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete(),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        self.board.cancel_delete();
                        self.state = self.return_state;
                    }
                    _ => {}
                }
                false
            }
            AppState::Help => {
                self.state = AppState::Board;
                false
            }
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> bool {
        if self.filter_active {
            match key.code {
                KeyCode::Esc => {
                    self.filter_active = false;
                    self.filter_text.clear();
                    self.clear_status_message();
                }
                KeyCode::Enter => {
                    self.filter_active = false;
                    if self.filter_text.is_empty() {
                        self.set_status_message("Filter cleared");
                    } else {
                        let shown: usize = (0..COLUMNS).map(|c| self.column_ids(c).len()).sum();
                        self.set_status_message(format!("Filter: '{}' ({} tasks shown)", self.filter_text, shown));
                    }
                }
                KeyCode::Backspace => {
                    self.filter_text.pop();
                }
                KeyCode::Char(c) => self.filter_text.push(c),
                _ => {}
            }
            self.clamp_selection();
            return false;
        }

        self.clear_status_message();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,

            // Card movement between columns (check first, before regular navigation)
            KeyCode::Left if ctrl => self.move_card(false),
            KeyCode::Right if ctrl => self.move_card(true),
            KeyCode::Up if shift => self.reorder_card(false),
            KeyCode::Down if shift => self.reorder_card(true),

            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLUMNS - 1 {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Up => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
            KeyCode::Down => {
                let len = self.column_ids(self.selected_column).len();
                if len > 0 && self.selected_card < len - 1 {
                    self.selected_card += 1;
                }
            }

            KeyCode::Enter => {
                if self.selected_task_id().is_some() {
                    self.state = AppState::Detail;
                }
            }
            KeyCode::Char('n') => self.open_new_form(),
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    self.request_delete(id);
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('p') => self.cycle_project(),
            KeyCode::Char('/') => {
                self.filter_active = true;
                self.set_status_message("Filter: type to search title/tags/assignees, Enter to apply, Esc to cancel");
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let form = match self.form.as_mut() {
            Some(f) => f,
            None => {
                self.state = AppState::Board;
                return;
            }
        };
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.state = AppState::Board;
            }
            KeyCode::Char('d') if ctrl => {
                if let Some(id) = form.task_id {
                    self.request_delete(id);
                }
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && self.handle_key(key) {
                    self.quit = true;
                }
            }
        }
        Ok(())
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quit {
            self.board.toasts_mut().expire(Instant::now());
            terminal.draw(|f| self.render(f))?;

            if self.pending_move.is_some() {
                self.flush_pending_move();
                continue;
            }
            self.handle_input()?;
        }
        Ok(())
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::Detail => self.render_task_detail(f),
            AppState::Form => self.render_form(f),
            AppState::ConfirmDelete => {
                if self.return_state == AppState::Form {
                    self.render_form(f);
                }
                self.render_confirm(f);
            }
            AppState::Help => self.render_help(f),
            AppState::Board => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let user = self
            .session
            .as_ref()
            .map(|s| s.username.clone())
            .unwrap_or_else(|| "not logged in".to_string());
        let header = Line::from(vec![
            Span::styled("TASK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Project: {}  User: {}", self.project_name(), user),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]);
        let block = Paragraph::new(header)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = (0..COLUMNS)
            .map(|_| Constraint::Ratio(1, COLUMNS as u32))
            .collect();
        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize) {
        let status = match Status::from_column(column_index) {
            Some(s) => s,
            None => return,
        };
        let cards = self.column_ids(column_index);
        let is_selected = column_index == self.selected_column;
        let accent = status_color(status);

        let border_style = if is_selected {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", format_status(status), cards.len()))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if cards.is_empty() {
            return;
        }

        let card_height = 5;
        let available_height = inner.height as usize;
        let visible_cards = (available_height / card_height).max(1);

        let scroll_offset = if is_selected {
            let start_visible = self.column_scroll_offsets[column_index];
            if self.selected_card < start_visible {
                self.selected_card
            } else if self.selected_card >= start_visible + visible_cards {
                self.selected_card + 1 - visible_cards
            } else {
                start_visible
            }
        } else {
            self.column_scroll_offsets[column_index].min(cards.len().saturating_sub(1))
        };
        self.column_scroll_offsets[column_index] = scroll_offset;

        let mut current_y = 0;
        let mut rendered = 0;
        for (card_index, &id) in cards.iter().enumerate().skip(scroll_offset) {
            if current_y + card_height > available_height {
                break;
            }
            if let Some(task) = self.board.get(id) {
                let card_area = Rect {
                    x: inner.x,
                    y: inner.y + current_y as u16,
                    width: inner.width,
                    height: card_height as u16,
                };
                let highlighted = is_selected && card_index == self.selected_card;
                self.render_card(f, card_area, task, accent, highlighted);
                current_y += card_height;
                rendered += 1;
            }
        }

        if scroll_offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", scroll_offset))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y, width: inner.width, height: 1 });
        }
        let remaining = cards.len().saturating_sub(scroll_offset + rendered);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect {
                x: inner.x,
                y: inner.y + inner.height - 1,
                width: inner.width,
                height: 1,
            });
        }
    }

    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, accent: Color, highlighted: bool) {
        let style = if highlighted {
            Style::default().bg(accent).fg(text_on(accent)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };

        let today = Local::now().date_naive();
        let mut lines = vec![Line::from(format!("#{}  {}", task.id, format_due_relative(task.due_date, today)))];

        // Simple word wrapping, two lines at most
        let width = area.width.saturating_sub(2) as usize;
        let mut current = String::new();
        let mut title_lines = Vec::new();
        for word in task.title.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                title_lines.push(std::mem::take(&mut current));
                current = word.to_string();
                if title_lines.len() >= 2 {
                    break;
                }
            }
        }
        if !current.is_empty() && title_lines.len() < 2 {
            title_lines.push(current);
        }
        lines.extend(title_lines.into_iter().map(Line::from));

        let tags = if task.tags.is_empty() { "-".to_string() } else { format_tags(&task.tags) };
        lines.push(Line::from(tags));

        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .wrap(Wrap { trim: true });
        f.render_widget(card, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let accent = Status::from_column(self.selected_column).map(status_color).unwrap_or(Color::Blue);

        let (text, bg) = if self.filter_active {
            (format!("Filter: {} | Enter to apply, Esc to cancel", self.filter_text), accent)
        } else if let Some(toast) = self.board.toasts().current(Instant::now()) {
            let bg = match toast.level {
                ToastLevel::Info => accent,
                ToastLevel::Error => DARK_RED,
            };
            (toast.message.clone(), bg)
        } else if !self.status_message.is_empty() {
            (self.status_message.clone(), accent)
        } else {
            let total: usize = (0..COLUMNS).map(|c| self.column_ids(c).len()).sum();
            let filter = if self.filter_text.is_empty() {
                String::new()
            } else {
                format!(" [Filter: {}]", self.filter_text)
            };
            (
                format!("Tasks: {}{} | Ctrl+←/→: Move | n: New | e: Edit | x: Delete | r: Reload | p: Project | h: Help", total, filter),
                accent,
            )
        };

        let bar = Paragraph::new(text)
            .style(Style::default().bg(bg).fg(text_on(bg)))
            .alignment(Alignment::Left);
        f.render_widget(bar, area);
    }

    fn render_task_detail(&self, f: &mut Frame) {
        let task = match self.selected_task_id().and_then(|id| self.board.get(id)) {
            Some(t) => t,
            None => return,
        };
        let area = centered_rect(80, 80, f.area());
        f.render_widget(Clear, area);

        let today = Local::now().date_naive();
        let due = match task.due_date {
            Some(d) => format!("{} ({})", d.with_timezone(&Local).format("%Y-%m-%d %H:%M"), format_due_relative(Some(d), today)),
            None => "-".to_string(),
        };
        let assignees: Vec<&str> = task.assignees.iter().map(|a| a.name.as_str()).collect();
        let creator = self
            .current_project()
            .map(|p| p.developer_name(task.created_by_id))
            .unwrap_or_else(|| format!("#{}", task.created_by_id));

        let lines = vec![
            Line::from(Span::styled(format!("Task #{}: {}", task.id, task.title), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(format!("Status:     {}", format_status(task.status))),
            Line::from(format!("Tags:       {}", if task.tags.is_empty() { "-".to_string() } else { format_tags(&task.tags) })),
            Line::from(format!("Due:        {}", due)),
            Line::from(format!("Assignees:  {}", if assignees.is_empty() { "-".to_string() } else { assignees.join(", ") })),
            Line::from(format!("Created by: {}", creator)),
            Line::from(format!("Updated:    {}", task.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"))),
            Line::from(""),
            Line::from("Description:"),
            Line::from(task.description.clone().unwrap_or_else(|| "-".to_string())),
        ];

        let accent = status_color(task.status);
        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task Details (Enter to close, e to edit)")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    fn render_form(&self, f: &mut Frame) {
        let form = match self.form.as_ref() {
            Some(form) => form,
            None => return,
        };
        let area = centered_rect(70, 80, f.area());
        f.render_widget(Clear, area);

        let title = if form.is_edit() { "Edit Task" } else { "New Task" };
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(4), // Description
                Constraint::Length(3), // Status
                Constraint::Length(3), // Tags
                Constraint::Length(3), // Due
                Constraint::Min(3),    // Assignees
                Constraint::Length(2), // Error / instructions
            ])
            .split(inner);

        let field_block = |field: FormField| {
            let focused = form.current_field == field;
            let editable = form.is_editable(field);
            let style = match (focused, editable) {
                (true, _) => Style::default().fg(GOLD),
                (false, false) => Style::default().fg(Color::DarkGray),
                (false, true) => Style::default(),
            };
            let label = if editable {
                field.label().to_string()
            } else {
                format!("{} (read-only)", field.label())
            };
            Block::default().borders(Borders::ALL).title(label).border_style(style)
        };
        let text_of = |field: FormField, input: &crate::tui::input::InputField| {
            if form.current_field == field && form.is_editable(field) {
                input.display_with_cursor()
            } else {
                input.value.clone()
            }
        };

        f.render_widget(
            Paragraph::new(text_of(FormField::Title, &form.title)).block(field_block(FormField::Title)),
            rows[0],
        );
        f.render_widget(
            Paragraph::new(text_of(FormField::Description, &form.description))
                .block(field_block(FormField::Description))
                .wrap(Wrap { trim: false }),
            rows[1],
        );
        f.render_widget(
            Paragraph::new(format!("< {} >", format_status(form.selected_status())))
                .block(field_block(FormField::Status)),
            rows[2],
        );

        let tag_spans: Vec<Span> = Tag::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, &tag)| {
                let mark = if form.has_tag(tag) { "[x]" } else { "[ ]" };
                let mut style = Style::default();
                if form.current_field == FormField::Tags && form.tag_cursor == i {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                vec![Span::styled(format!("{} {}", mark, format_tag(tag)), style), Span::raw("  ")]
            })
            .collect();
        f.render_widget(
            Paragraph::new(Line::from(tag_spans)).block(field_block(FormField::Tags)),
            rows[3],
        );

        f.render_widget(
            Paragraph::new(text_of(FormField::Due, &form.due)).block(field_block(FormField::Due)),
            rows[4],
        );

        let assignee_lines: Vec<Line> = if form.roster.is_empty() {
            vec![Line::from("No developers on this project")]
        } else {
            form.roster
                .iter()
                .enumerate()
                .map(|(i, user)| {
                    let mark = if form.has_assignee(user) { "[x]" } else { "[ ]" };
                    let mut style = Style::default();
                    if form.current_field == FormField::Assignees && form.assignee_cursor == i {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Line::from(Span::styled(format!("{} {}", mark, user.name), style))
                })
                .collect()
        };
        f.render_widget(
            Paragraph::new(assignee_lines).block(field_block(FormField::Assignees)),
            rows[5],
        );

        let footer = match form.error {
            Some(ref err) => Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
            None => {
                let delete_hint = if form.is_edit() { " | Ctrl+D: Delete" } else { "" };
                Line::from(format!(
                    "Tab/↑↓: Field | ←/→: Change | Space: Toggle | Enter: Save | Esc: Cancel{}",
                    delete_hint
                ))
            }
        };
        f.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), rows[6]);
    }

    fn render_confirm(&self, f: &mut Frame) {
        let title = self
            .board
            .pending_delete()
            .and_then(|id| self.board.get(id))
            .map(|t| format!("Delete task #{} '{}'", t.id, t.title))
            .unwrap_or_default();

        let area = centered_rect(50, 25, f.area());
        f.render_widget(Clear, area);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Are you sure you want to:", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(title),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title("Confirm Delete")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(DARK_RED)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 70, f.area());
        f.render_widget(Clear, area);
        let lines: Vec<Line> = [
            "←/→          Select column",
            "↑/↓          Select card",
            "Ctrl+←/→     Move card to the previous/next status",
            "Shift+↑/↓    Reorder (not supported)",
            "Enter        Task details",
            "n            New task in this column",
            "e            Edit task",
            "x / Del      Delete task",
            "r            Reload from server",
            "p            Next project",
            "/            Filter by title, tag or assignee",
            "q / Esc      Quit",
            "",
            "Press any key to close",
        ]
        .iter()
        .map(|l| Line::from(*l))
        .collect();
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().bg(Color::Black));
        f.render_widget(help, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryApi;
    use crate::notify::Toasts;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn app(api: &MemoryApi) -> BoardApp<'_> {
        let mut board = Board::new(1, Toasts::default());
        board.load(api);
        let projects = api.list_projects().unwrap();
        let session = Session { user_id: 10, username: "ama".into(), roles: vec![] };
        BoardApp::new(api, board, projects, Some(session))
    }

    #[test]
    fn test_ctrl_right_applies_before_sending() {
        let api = MemoryApi::new().with_task(1, "Member directory", Status::Open);
        let mut app = app(&api);
        app.selected_column = Status::Open.column();

        app.handle_key(ctrl(KeyCode::Right));
        assert_eq!(app.board.get(1).unwrap().status, Status::InProgress);
        assert_eq!(api.stored(1).unwrap().status, Status::Open);
        assert_eq!(app.selected_column, Status::InProgress.column());

        app.flush_pending_move();
        assert_eq!(api.stored(1).unwrap().status, Status::InProgress);
    }

    #[test]
    fn test_failed_move_returns_card() {
        let api = MemoryApi::new().with_task(1, "Member directory", Status::Open);
        let mut app = app(&api);
        app.selected_column = Status::Open.column();
        api.fail_update.set(true);

        app.handle_key(ctrl(KeyCode::Right));
        app.flush_pending_move();
        assert_eq!(app.board.get(1).unwrap().status, Status::Open);
        assert_eq!(app.selected_column, Status::Open.column());
    }

    #[test]
    fn test_shift_reorder_is_reported() {
        let api = MemoryApi::new()
            .with_task(1, "a", Status::Open)
            .with_task(2, "b", Status::Open);
        let mut app = app(&api);
        app.selected_column = Status::Open.column();
        app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT));
        assert_eq!(app.status_message, "Reordering within a column is not supported");
        assert!(app.pending_move.is_none());
    }

    #[test]
    fn test_new_task_through_form() {
        let api = MemoryApi::new();
        let mut app = app(&api);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Form);

        // Empty title keeps the form open and sends nothing.
        let before = api.request_count();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Form);
        assert_eq!(api.request_count(), before);
        assert_eq!(app.form.as_ref().unwrap().error.as_deref(), Some("Title is required"));

        for c in "Expenses CSV".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Board);
        assert_eq!(app.board.tasks().len(), 1);
        assert_eq!(app.board.tasks()[0].status, Status::Backlog);
    }

    #[test]
    fn test_delete_from_form_closes_everything() {
        let api = MemoryApi::new().with_task(1, "a", Status::Backlog);
        let mut app = app(&api);
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.state, AppState::Form);
        app.handle_key(ctrl(KeyCode::Char('d')));
        assert_eq!(app.state, AppState::ConfirmDelete);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Form);

        app.handle_key(ctrl(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Board);
        assert!(app.form.is_none());
        assert!(app.board.tasks().is_empty());
    }

    #[test]
    fn test_filter_limits_columns() {
        let api = MemoryApi::new()
            .with_task(1, "Audit log", Status::Open)
            .with_task(2, "Push prompts", Status::Open);
        let mut app = app(&api);
        app.handle_key(key(KeyCode::Char('/')));
        for c in "push".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.column_ids(Status::Open.column()), vec![2]);
    }

    #[test]
    fn test_renders_columns() {
        let api = MemoryApi::new().with_task(1, "Parish list", Status::OnHold);
        let mut app = app(&api);
        let mut terminal = Terminal::new(TestBackend::new(150, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("On Hold (1)"));
        assert!(text.contains("Parish list"));
        assert!(text.contains("Parish Portal"));
    }
}
