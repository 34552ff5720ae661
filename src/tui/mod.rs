// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A thin ratatui + crossterm view over [`Session`]. Key presses turn into session calls; the
//! resulting effects are handed to the [`Executor`], and finished work is drained from the
//! completion channel before every frame.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::api::Transport;
use crate::model::{Author, Citation};
use crate::navigator::{NavigatorPhase, PendingSelection};
use crate::render;
use crate::runtime::Executor;
use crate::session::{Action, Completion, Effect, Interaction, Session};

mod theme;

use theme::TuiTheme;

const FOOTER_BRAND: &str = "K-9";
const TOAST_TTL: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the interactive terminal UI until the user quits.
///
/// `notice` is shown once as a toast (e.g. a preferences file that could not be read).
pub fn run<T: Transport>(
    session: Session,
    executor: Executor<T>,
    mut completions: UnboundedReceiver<Completion>,
    notice: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let (theme, theme_error) = match TuiTheme::from_env(session.theme()) {
        Ok(theme) => (theme, None),
        Err(err) => (TuiTheme::default().with_mode(session.theme()), Some(err.to_string())),
    };

    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(session, theme);
    if let Some(message) = notice.or(theme_error) {
        app.set_toast(message);
    }

    while !app.should_quit {
        app.drain(&mut completions);
        app.sync();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let effects = app.handle_key(key);
                    if let Err(err) = executor.dispatch(effects) {
                        app.set_toast(format!("Preferences not saved: {err}"));
                    }
                }
            }
        }
    }

    if app.session.stop() {
        info!("cancelled in-flight request on exit");
    }
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Length(1)])
        .split(area);
    let (conversation_area, input_area, footer_area) = (layout[0], layout[1], layout[2]);

    let inner_width = conversation_area.width.saturating_sub(2) as usize;
    let inner_height = conversation_area.height.saturating_sub(2) as usize;
    let lines = conversation_lines(app, inner_width);
    let bottom = lines.len().saturating_sub(inner_height);
    app.scroll_back = app.scroll_back.min(bottom);
    let top = bottom - app.scroll_back;
    let title = match app.scroll_back {
        0 => view_title("Conversation", None),
        back => view_title("Conversation", Some(&format!("(+{back} below)"))),
    };
    let conversation = Paragraph::new(lines)
        .style(app.theme.base_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(app.theme.panel_border_style(!app.has_overlay())),
        )
        .scroll((clamp_to_u16(top), 0));
    frame.render_widget(conversation, conversation_area);

    let input_title = if app.session.is_busy() {
        view_title("Waiting for K-9", Some("Esc to stop"))
    } else {
        view_title("Message", Some("/search /preview /ingest /stats"))
    };
    let input_style = if app.session.is_busy() { app.theme.dim_style() } else { app.theme.base_style() };
    let input = Paragraph::new(app.input.clone()).style(input_style).block(
        Block::default().borders(Borders::ALL).title(input_title).border_style(app.theme.dim_style()),
    );
    frame.render_widget(input, input_area);
    if !app.has_overlay() && !app.session.is_busy() {
        let typed = clamp_to_u16(app.input.chars().count());
        let max_x = input_area.width.saturating_sub(2);
        frame.set_cursor_position((input_area.x + 1 + typed.min(max_x), input_area.y + 1));
    }

    let toast = app.active_toast().map(ToOwned::to_owned);
    frame.render_widget(Paragraph::new(footer_line(app, toast.as_deref())), footer_area);

    if app.menu.is_some() {
        render_menu(frame, app, conversation_area);
    }
    if app.show_help {
        render_help(frame, app, area);
    }
    if app.session.memory().is_open() {
        render_memory(frame, app, conversation_area);
    }
    if app.session.navigator().is_open() {
        render_picker(frame, app, conversation_area);
    }
    if app.session.pending_interaction().is_some() {
        render_interaction(frame, app, area);
    }
}

include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    session: Session,
    theme: TuiTheme,
    input: String,
    prompt_input: String,
    prompt_seen: Option<Interaction>,
    picker_state: ListState,
    picker_path: Option<String>,
    crumb_cursor: Option<usize>,
    memory_state: ListState,
    menu: Option<usize>,
    show_help: bool,
    citation_cursor: Option<usize>,
    scroll_back: usize,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(session: Session, theme: TuiTheme) -> Self {
        Self {
            session,
            theme,
            input: String::new(),
            prompt_input: String::new(),
            prompt_seen: None,
            picker_state: ListState::default(),
            picker_path: None,
            crumb_cursor: None,
            memory_state: ListState::default(),
            menu: None,
            show_help: false,
            citation_cursor: None,
            scroll_back: 0,
            toast: None,
            should_quit: false,
        }
    }

    fn drain(&mut self, completions: &mut UnboundedReceiver<Completion>) {
        while let Ok(completion) = completions.try_recv() {
            if self.session.apply(completion) {
                self.scroll_back = 0;
            }
        }
    }

    /// Reconciles view-local state with whatever the session changed since the last frame.
    fn sync(&mut self) {
        if self.theme.mode() != self.session.theme() {
            self.theme = self.theme.with_mode(self.session.theme());
        }

        let pending = self.session.pending_interaction().cloned();
        if pending != self.prompt_seen {
            self.prompt_input = match &pending {
                Some(Interaction::Prompt { default, .. }) => default.clone(),
                _ => String::new(),
            };
            self.prompt_seen = pending;
        }

        let listed_path = self.session.navigator().state().map(|state| state.current_path.clone());
        if listed_path != self.picker_path {
            self.picker_path = listed_path;
            self.crumb_cursor = None;
            let has_entries =
                self.session.navigator().state().is_some_and(|state| !state.entries.is_empty());
            self.picker_state.select(has_entries.then_some(0));
        }

        let file_count = self.session.memory().files().len();
        match self.memory_state.selected() {
            _ if file_count == 0 => self.memory_state.select(None),
            None => self.memory_state.select(Some(0)),
            Some(idx) if idx >= file_count => self.memory_state.select(Some(file_count - 1)),
            Some(_) => {}
        }

        let citation_count = self.citations().len();
        if self.citation_cursor.is_some_and(|idx| idx >= citation_count) {
            self.citation_cursor = None;
        }
    }

    fn has_overlay(&self) -> bool {
        self.menu.is_some()
            || self.show_help
            || self.session.navigator().is_open()
            || self.session.memory().is_open()
            || self.session.pending_interaction().is_some()
    }

    /// Citations of the most recent turn that carries any.
    fn citations(&self) -> &[Citation] {
        self.session
            .log()
            .turns()
            .iter()
            .rev()
            .map(|turn| turn.citations())
            .find(|citations| !citations.is_empty())
            .unwrap_or_default()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return Vec::new();
        }

        let effects = if self.session.pending_interaction().is_some() {
            self.handle_interaction_key(key.code)
        } else if self.session.navigator().is_open() {
            self.handle_picker_key(key.code)
        } else if self.session.memory().is_open() {
            self.handle_memory_key(key.code)
        } else if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            Vec::new()
        } else if let Some(cursor) = self.menu {
            self.handle_menu_key(key.code, cursor)
        } else if ctrl {
            self.handle_ctrl_key(key.code)
        } else {
            self.handle_main_key(key.code)
        };
        self.sync();
        effects
    }

    fn handle_main_key(&mut self, code: KeyCode) -> Vec<Effect> {
        match code {
            KeyCode::Enter => {
                let effects = self.session.submit(&self.input);
                if !effects.is_empty() {
                    self.input.clear();
                    self.scroll_back = 0;
                    self.citation_cursor = None;
                }
                effects
            }
            KeyCode::Esc => {
                if self.session.stop() {
                    self.set_toast("Generation stopped");
                }
                Vec::new()
            }
            KeyCode::F(1) => {
                self.show_help = true;
                Vec::new()
            }
            KeyCode::F(2) => {
                if self.session.is_busy() {
                    self.set_toast("Busy: press Esc to stop the current request first");
                } else {
                    self.menu = Some(0);
                }
                Vec::new()
            }
            KeyCode::Tab => {
                self.cycle_citation(true);
                Vec::new()
            }
            KeyCode::BackTab => {
                self.cycle_citation(false);
                Vec::new()
            }
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(5);
                Vec::new()
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(5);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.input.pop();
                Vec::new()
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_ctrl_key(&mut self, code: KeyCode) -> Vec<Effect> {
        match code {
            KeyCode::Char('t') => self.session.dispatch(Action::ToggleTheme),
            KeyCode::Char('y') => {
                self.yank_citation_path();
                Vec::new()
            }
            KeyCode::Char('p') => match self.selected_citation().map(|citation| citation.path.clone()) {
                Some(path) => {
                    self.scroll_back = 0;
                    self.session.preview_citation(&path)
                }
                None => {
                    self.set_toast("No citation selected (Tab to select)");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode, cursor: usize) -> Vec<Effect> {
        match code {
            KeyCode::Up => {
                self.menu = Some(cursor.checked_sub(1).unwrap_or(Action::ALL.len() - 1));
                Vec::new()
            }
            KeyCode::Down => {
                self.menu = Some((cursor + 1) % Action::ALL.len());
                Vec::new()
            }
            KeyCode::Enter => {
                self.menu = None;
                self.scroll_back = 0;
                self.session.dispatch(Action::ALL[cursor])
            }
            KeyCode::Esc | KeyCode::F(2) => {
                self.menu = None;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_interaction_key(&mut self, code: KeyCode) -> Vec<Effect> {
        let confirm = match self.session.pending_interaction() {
            Some(Interaction::Confirm { .. }) => true,
            Some(Interaction::Prompt { .. }) => false,
            None => return Vec::new(),
        };

        if confirm {
            return match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.session.resolve_confirm(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.session.resolve_confirm(false)
                }
                _ => Vec::new(),
            };
        }

        match code {
            KeyCode::Enter => {
                let answer = std::mem::take(&mut self.prompt_input);
                self.session.resolve_prompt(Some(answer))
            }
            KeyCode::Esc => self.session.resolve_prompt(None),
            KeyCode::Backspace => {
                self.prompt_input.pop();
                Vec::new()
            }
            KeyCode::Char(ch) => {
                self.prompt_input.push(ch);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> Vec<Effect> {
        if let Some(cursor) = self.crumb_cursor {
            let crumbs = self.session.navigator().crumbs();
            return match code {
                KeyCode::Left => {
                    self.crumb_cursor = Some(cursor.saturating_sub(1));
                    Vec::new()
                }
                KeyCode::Right => {
                    self.crumb_cursor = Some((cursor + 1).min(crumbs.len().saturating_sub(1)));
                    Vec::new()
                }
                KeyCode::Enter => {
                    self.crumb_cursor = None;
                    match crumbs.get(cursor) {
                        Some(crumb) => self.session.jump_to_breadcrumb(&crumb.path),
                        None => Vec::new(),
                    }
                }
                KeyCode::Tab => {
                    self.crumb_cursor = None;
                    Vec::new()
                }
                KeyCode::Esc => {
                    self.session.cancel_picker();
                    Vec::new()
                }
                _ => Vec::new(),
            };
        }

        let entry_count = self.session.navigator().state().map_or(0, |state| state.entries.len());
        match code {
            KeyCode::Up => {
                move_cursor(&mut self.picker_state, entry_count, -1);
                Vec::new()
            }
            KeyCode::Down => {
                move_cursor(&mut self.picker_state, entry_count, 1);
                Vec::new()
            }
            KeyCode::Enter => {
                let entry = self
                    .picker_state
                    .selected()
                    .and_then(|idx| self.session.navigator().state()?.entries.get(idx).cloned());
                match entry {
                    Some(entry) => self.session.descend(&entry),
                    None => Vec::new(),
                }
            }
            KeyCode::Backspace => self.session.ascend(),
            KeyCode::Tab => {
                let crumbs = self.session.navigator().crumbs();
                self.crumb_cursor = crumbs.len().checked_sub(1);
                Vec::new()
            }
            KeyCode::Char('s') => self.session.confirm_selection(),
            KeyCode::Esc => {
                self.session.cancel_picker();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_memory_key(&mut self, code: KeyCode) -> Vec<Effect> {
        let file_count = self.session.memory().files().len();
        match code {
            KeyCode::Up => {
                move_cursor(&mut self.memory_state, file_count, -1);
                Vec::new()
            }
            KeyCode::Down => {
                move_cursor(&mut self.memory_state, file_count, 1);
                Vec::new()
            }
            KeyCode::Char('d') => {
                let path = self
                    .memory_state
                    .selected()
                    .and_then(|idx| self.session.memory().files().get(idx))
                    .map(|file| file.path.clone());
                if let Some(path) = path {
                    self.session.request_delete(&path);
                }
                Vec::new()
            }
            KeyCode::Char('r') => self.session.refresh_memory(),
            KeyCode::Char('R') => self.session.dispatch(Action::Reset),
            KeyCode::Esc => {
                self.session.close_memory();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn cycle_citation(&mut self, forward: bool) {
        let count = self.citations().len();
        if count == 0 {
            self.citation_cursor = None;
            return;
        }
        self.citation_cursor = Some(match (self.citation_cursor, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(idx), true) => (idx + 1) % count,
            (Some(idx), false) => idx.checked_sub(1).unwrap_or(count - 1),
        });
    }

    fn selected_citation(&self) -> Option<&Citation> {
        self.citations().get(self.citation_cursor?)
    }

    fn yank_citation_path(&mut self) {
        let path = self
            .selected_citation()
            .or_else(|| self.citations().last())
            .map(|citation| citation.path.clone());
        let Some(path) = path else {
            self.set_toast("No citation to yank");
            return;
        };

        match copy_to_clipboard(&path) {
            Ok(backend) => self.set_toast(format!("Yanked {path} ({backend})")),
            Err(err) => self.set_toast(format!("Clipboard error: {err}")),
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn active_toast(&self) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|toast| toast.expires_at > Instant::now())
            .map(|toast| toast.message.as_str())
    }
}

fn move_cursor(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(next as usize));
}

fn selection_title(selection: Option<PendingSelection>) -> &'static str {
    match selection {
        Some(PendingSelection::Ingest) => "Select a folder to ingest",
        Some(PendingSelection::CreateFolder) => "Where should the folder go?",
        Some(PendingSelection::CreateFile) => "Where should the file go?",
        None => "Select a folder",
    }
}

fn author_label(author: Author) -> &'static str {
    match author {
        Author::User => "you",
        Author::Agent => FOOTER_BRAND,
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}
