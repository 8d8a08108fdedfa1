use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::export::ExportFormat;

/// Handle a key event, dispatching on the current mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::ExportPrompt { .. } => handle_prompt_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Right | KeyCode::Enter | KeyCode::Char('l') => app.expand_selected(),
        KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h') => app.collapse_selected(),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.begin_export(ExportFormat::Tar),
        KeyCode::Char('g') | KeyCode::Char('G') => app.begin_export(ExportFormat::TarGz),
        KeyCode::Char('z') | KeyCode::Char('Z') => app.begin_export(ExportFormat::TarZst),
        KeyCode::Char('p') | KeyCode::Char('P') => app.begin_export(ExportFormat::Patch),
        KeyCode::Char('?') => app.open_help(),
        _ => {}
    }
}

fn handle_prompt_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_export_name(),
        KeyCode::Esc => app.cancel_export_prompt(),
        KeyCode::Char(c) => app.dialog_input_char(c),
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => app.close_help(),
        KeyCode::Down | KeyCode::Char('j') => {
            app.help_state.scroll_offset = app.help_state.scroll_offset.saturating_add(1);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.help_state.scroll_offset = app.help_state.scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
}
