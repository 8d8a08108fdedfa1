use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode, KEY_HINTS};
use crate::components::dialog::DialogWidget;
use crate::components::help::HelpWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::theme::ThemeColors;

/// Render the application UI: tree panel, status bar, and any modal overlay.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let tree_area = chunks[0];

    // Keep the cursor inside the window before drawing; account for borders.
    let visible_height = tree_area.height.saturating_sub(2) as usize;
    app.tree_state.update_scroll(visible_height);

    let block = Block::default()
        .title(format!(" {} ", app.tree_state.root.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg));
    let tree_widget = TreeWidget::new(&app.tree_state, theme).block(block);
    frame.render_widget(tree_widget, tree_area);

    let path_str = app.tree_state.root.path.display().to_string();
    let mut status_bar = StatusBarWidget::new(
        &path_str,
        app.tree_state.selected_index + 1,
        app.tree_state.flat_items.len(),
        KEY_HINTS,
        theme,
    );
    if let Some((msg, is_error)) = &app.status_message {
        status_bar = status_bar.status_message(msg, *is_error);
    }
    frame.render_widget(status_bar, chunks[1]);

    match app.mode {
        AppMode::ExportPrompt { .. } => {
            let dialog = DialogWidget::new(&app.mode, &app.dialog_state, theme);
            frame.render_widget(dialog, frame.area());
        }
        AppMode::Help => {
            let help = HelpWidget::new(&app.help_state, theme);
            frame.render_widget(help, frame.area());
        }
        AppMode::Normal => {}
    }
}
