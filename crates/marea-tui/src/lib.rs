// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use log::debug;
use marea_app::{
    ModalMode, Quote, QuoteCommand, QuoteEvent, QuoteField, QuoteId, QuoteStatus, QuotesState,
};
use marea_print::DocumentKind;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// Side effects the view cannot perform on its own.
pub trait AppRuntime {
    /// Renders `quote` as `kind` and presents it; returns the spooled file.
    fn print(&mut self, kind: DocumentKind, quote: &Quote) -> Result<PathBuf>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ViewData {
    selected_row: usize,
    search_mode: bool,
    field_index: usize,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut QuotesState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut QuotesState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(QuoteCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn bump_status_token(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn emit_status(
    state: &mut QuotesState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(QuoteCommand::SetStatus(message.into()));
    bump_status_token(view_data, internal_tx);
}

/// Dispatches `command` and arms the clear timer when it produced a status.
fn dispatch(
    state: &mut QuotesState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: QuoteCommand,
) -> Vec<QuoteEvent> {
    let events = state.dispatch(command);
    let touched_status = events
        .iter()
        .any(|event| matches!(event, QuoteEvent::StatusUpdated(_) | QuoteEvent::Rejected(_)));
    if touched_status {
        bump_status_token(view_data, internal_tx);
    }
    events
}

/// Returns `true` when the app should quit.
fn handle_key_event<R: AppRuntime>(
    state: &mut QuotesState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.modal.is_open() {
        handle_form_key(state, view_data, internal_tx, key);
        return false;
    }

    if view_data.search_mode {
        handle_search_key(state, view_data, internal_tx, key);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => move_selection(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_selection(state, view_data, -1),
        KeyCode::Char('g') | KeyCode::Home => view_data.selected_row = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.selected_row = state.visible().len().saturating_sub(1);
        }
        KeyCode::Char('/') => view_data.search_mode = true,
        KeyCode::Esc if !state.search.is_empty() => {
            dispatch(
                state,
                view_data,
                internal_tx,
                QuoteCommand::SetSearch(String::new()),
            );
            clamp_selection(state, view_data);
        }
        KeyCode::Char('a') => {
            view_data.field_index = 0;
            dispatch(state, view_data, internal_tx, QuoteCommand::OpenCreate);
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = selected_id(state, view_data, internal_tx) {
                view_data.field_index = 0;
                dispatch(state, view_data, internal_tx, QuoteCommand::OpenEdit(id));
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = selected_id(state, view_data, internal_tx) {
                dispatch(state, view_data, internal_tx, QuoteCommand::Delete(id));
                clamp_selection(state, view_data);
            }
        }
        KeyCode::Char('x') => {
            if let Some(id) = selected_id(state, view_data, internal_tx) {
                dispatch(state, view_data, internal_tx, QuoteCommand::Archive(id));
            }
        }
        KeyCode::Char('p') => {
            print_selected(state, runtime, view_data, internal_tx, DocumentKind::ClientQuote);
        }
        KeyCode::Char('w') => {
            print_selected(state, runtime, view_data, internal_tx, DocumentKind::WorkOrder);
        }
        KeyCode::Char('?') => view_data.help_visible = true,
        _ => {}
    }
    false
}

fn handle_form_key(
    state: &mut QuotesState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field = focused_field(view_data);
    match key.code {
        KeyCode::Esc => {
            dispatch(state, view_data, internal_tx, QuoteCommand::Cancel);
            view_data.field_index = 0;
        }
        KeyCode::Enter => {
            let events = dispatch(state, view_data, internal_tx, QuoteCommand::Submit);
            if !state.modal.is_open() {
                view_data.field_index = 0;
            }
            for event in events {
                if let QuoteEvent::QuoteCreated(id) | QuoteEvent::QuoteUpdated(id) = event {
                    select_quote(state, view_data, id);
                }
            }
            clamp_selection(state, view_data);
        }
        KeyCode::Tab | KeyCode::Down => move_field_cursor(view_data, 1),
        KeyCode::BackTab | KeyCode::Up => move_field_cursor(view_data, -1),
        KeyCode::Left if !field.is_text() => {
            dispatch(state, view_data, internal_tx, QuoteCommand::CycleStatus(-1));
        }
        KeyCode::Right | KeyCode::Char(' ') if !field.is_text() => {
            dispatch(state, view_data, internal_tx, QuoteCommand::CycleStatus(1));
        }
        KeyCode::Backspace if field.is_text() => {
            let mut value = state.modal.draft().fields.text(field).to_owned();
            if value.pop().is_some() {
                dispatch(
                    state,
                    view_data,
                    internal_tx,
                    QuoteCommand::SetField(field, value),
                );
            }
        }
        KeyCode::Char(ch) if field.is_text() && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut value = state.modal.draft().fields.text(field).to_owned();
            value.push(ch);
            dispatch(
                state,
                view_data,
                internal_tx,
                QuoteCommand::SetField(field, value),
            );
        }
        _ => {}
    }
}

fn handle_search_key(
    state: &mut QuotesState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => view_data.search_mode = false,
        KeyCode::Backspace => {
            let mut term = state.search.clone();
            if term.pop().is_some() {
                dispatch(state, view_data, internal_tx, QuoteCommand::SetSearch(term));
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut term = state.search.clone();
            term.push(ch);
            dispatch(state, view_data, internal_tx, QuoteCommand::SetSearch(term));
        }
        _ => {}
    }
    clamp_selection(state, view_data);
}

fn print_selected<R: AppRuntime>(
    state: &mut QuotesState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: DocumentKind,
) {
    let Some(quote) = state.visible().get(view_data.selected_row).map(|quote| (*quote).clone())
    else {
        emit_status(
            state,
            view_data,
            internal_tx,
            "nothing to print -- select a quote first",
        );
        return;
    };
    match runtime.print(kind, &quote) {
        Ok(path) => {
            debug!("{} for quote {} at {}", kind.label(), quote.id, path.display());
            emit_status(
                state,
                view_data,
                internal_tx,
                format!(
                    "{} for quote {} sent to print: {}",
                    kind.label(),
                    quote.id,
                    path.display()
                ),
            );
        }
        Err(error) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("print failed: {error:#}"),
        ),
    }
}

fn selected_id(
    state: &mut QuotesState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) -> Option<QuoteId> {
    let id = state
        .visible()
        .get(view_data.selected_row)
        .map(|quote| quote.id);
    if id.is_none() {
        emit_status(
            state,
            view_data,
            internal_tx,
            "no quote selected -- press a to add one",
        );
    }
    id
}

fn select_quote(state: &QuotesState, view_data: &mut ViewData, id: QuoteId) {
    if let Some(index) = state.visible().iter().position(|quote| quote.id == id) {
        view_data.selected_row = index;
    }
}

fn move_selection(state: &QuotesState, view_data: &mut ViewData, delta: isize) {
    let len = state.visible().len();
    if len == 0 {
        view_data.selected_row = 0;
        return;
    }
    let max = len - 1;
    view_data.selected_row = view_data.selected_row.saturating_add_signed(delta).min(max);
}

fn clamp_selection(state: &QuotesState, view_data: &mut ViewData) {
    let len = state.visible().len();
    view_data.selected_row = view_data.selected_row.min(len.saturating_sub(1));
}

fn focused_field(view_data: &ViewData) -> QuoteField {
    QuoteField::ALL
        .get(view_data.field_index)
        .copied()
        .unwrap_or(QuoteField::Reception)
}

fn move_field_cursor(view_data: &mut ViewData, delta: isize) {
    let count = QuoteField::ALL.len() as isize;
    let next = (view_data.field_index as isize + delta).rem_euclid(count);
    view_data.field_index = next as usize;
}

fn render(frame: &mut ratatui::Frame<'_>, state: &QuotesState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state, view_data))
        .block(Block::default().title("marea").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if state.modal.is_open() {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let form = Paragraph::new(render_form_text(state, view_data)).block(
            Block::default()
                .title(form_title(state.modal.mode()))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(form, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn header_text(state: &QuotesState, view_data: &ViewData) -> String {
    let cursor = if view_data.search_mode { "_" } else { "" };
    if state.search.is_empty() && !view_data.search_mode {
        return format!("quotes: {}", state.store.len());
    }
    format!(
        "quotes: {} | client search: {}{cursor}",
        state.store.len(),
        state.search
    )
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &QuotesState,
    view_data: &ViewData,
) {
    let header_cells = QuoteField::ALL.iter().map(|field| {
        Cell::from(field.label()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let visible = state.visible();
    let rows = visible.iter().enumerate().map(|(row_index, quote)| {
        let mut style = Style::default();
        if quote.status == QuoteStatus::Archived {
            style = style.fg(Color::DarkGray);
        }
        if row_index == view_data.selected_row {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        let cells = table_cells(quote).into_iter().map(Cell::from);
        Row::new(cells).style(style)
    });

    let widths = vec![Constraint::Min(8); QuoteField::ALL.len()];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(format!("quotes ({}/{})", visible.len(), state.store.len()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn table_cells(quote: &Quote) -> Vec<String> {
    let fields = quote.fields();
    QuoteField::ALL
        .iter()
        .map(|field| match field {
            QuoteField::Status => quote.status.label().to_owned(),
            _ => fields.text(*field).to_owned(),
        })
        .collect()
}

fn form_title(mode: ModalMode) -> String {
    match mode {
        ModalMode::Editing(id) => format!("edit quote {id}"),
        ModalMode::Creating | ModalMode::Closed => "new quote".to_owned(),
    }
}

fn render_form_text(state: &QuotesState, view_data: &ViewData) -> String {
    let fields = &state.modal.draft().fields;
    let mut lines = QuoteField::ALL
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let marker = if index == view_data.field_index { ">" } else { " " };
            let value = if field.is_text() {
                fields.text(*field).to_owned()
            } else {
                format!("< {} >", fields.status.label())
            };
            format!("{marker} {}: {value}", field.label())
        })
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push("tab/shift+tab field | left/right status | enter save | esc cancel".to_owned());
    lines.join("\n")
}

fn status_text(state: &QuotesState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let (mode, default) = if state.modal.is_open() {
        (
            "FORM",
            format!(
                "field {}/{} | enter save | esc cancel",
                view_data.field_index + 1,
                QuoteField::ALL.len()
            ),
        )
    } else if view_data.search_mode {
        ("SEARCH", "type client | enter/esc done".to_owned())
    } else {
        (
            "NAV",
            "j/k | / search | a add | e edit | d del | x archive | p quote | w order | ? | q"
                .to_owned(),
        )
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {default}"),
        None => format!("{mode} | {default}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k or up/down move | g/G first/last | / client search | esc clear search | q quit\n\
edit: a add | e/enter edit | d delete | x archive\n\
print: p client quote | w mechanic work order\n\
form: tab/down next field | shift+tab/up previous | left/right/space status | enter save | esc cancel\n\
search: type to filter by client | backspace erase | enter/esc done"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
