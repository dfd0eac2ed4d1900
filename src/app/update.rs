use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};

use crate::app::keymap::KeyAction;
use crate::app::sync::Request;
use crate::app::worker::Worker;
use crate::app::{AppState, InputMode};
use crate::ui;

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
pub enum KeyOutcome {
    Nothing,
    Send(Request),
    Quit,
}

/// Draw, poll input, and apply worker responses until the user quits.
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: AppState, worker: Worker) -> Result<()> {
    worker.submit(app.mount());

    loop {
        while let Some(response) = worker.try_next() {
            if let Some(next) = app.apply_response(response) {
                worker.submit(next);
            }
        }
        if app.notifier.expire(Instant::now()) {
            app.mark_dirty();
        }
        if app.take_dirty() {
            terminal.draw(|f| ui::render(f, &mut app))?;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key(&mut app, key) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Send(request) => worker.submit(request),
                        KeyOutcome::Nothing => {}
                    }
                }
                Event::Resize(_, _) => app.mark_dirty(),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Route a key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => {
            handle_search_key(app, key.code);
            KeyOutcome::Nothing
        }
        InputMode::Dialog => handle_dialog_key(app, key),
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    let Some(action) = app.keymap.resolve(&key) else {
        return KeyOutcome::Nothing;
    };
    let rpp = app.rows_per_page.max(1) as isize;
    match action {
        KeyAction::Quit => return KeyOutcome::Quit,
        KeyAction::AddService => app.open_create(),
        KeyAction::EditSelection => app.open_edit_selected(),
        KeyAction::DeleteSelection => {
            if let Some(req) = app.delete_selected() {
                return KeyOutcome::Send(req);
            }
        }
        KeyAction::Refresh => return KeyOutcome::Send(app.refresh()),
        KeyAction::StartSearch => {
            app.search_query.clear();
            app.input_mode = InputMode::Search;
            app.selected_index = 0;
            app.mark_dirty();
        }
        KeyAction::ToggleKeybindsPane => {
            app.show_keybinds = !app.show_keybinds;
            app.mark_dirty();
        }
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::PageUp => app.move_selection(-rpp),
        KeyAction::PageDown => app.move_selection(rpp),
        KeyAction::Ignore => {}
    }
    KeyOutcome::Nothing
}

/// Search narrows the table as the query is typed; Esc clears it.
fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_query.clear();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => app.search_query.push(c),
        _ => return,
    }
    app.selected_index = 0;
    app.mark_dirty();
}

fn handle_dialog_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => {
            if let Some(req) = app.submit() {
                return KeyOutcome::Send(req);
            }
        }
        KeyCode::Tab | KeyCode::Down => app.edit_dialog(|d| d.focus_next()),
        KeyCode::BackTab | KeyCode::Up => app.edit_dialog(|d| d.focus_prev()),
        KeyCode::Backspace => app.edit_dialog(|d| d.backspace()),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit_dialog(|d| d.clear_field())
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit_dialog(|d| d.push_char(c))
        }
        _ => {}
    }
    KeyOutcome::Nothing
}
