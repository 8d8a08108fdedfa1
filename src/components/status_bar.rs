use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar widget: browsed root on the left, cursor position and key
/// hints on the right, or a transient status message across the full width.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    position: String,
    hints: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, row: usize, total: usize, hints: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            position: format!("{}/{}", row.min(total), total),
            hints,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };

            // Pad or truncate message to fill full width
            let display: String = if msg.chars().count() >= width {
                msg.chars().take(width).collect()
            } else {
                format!("{:<width$}", msg, width = width)
            };

            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [path] [position] [key hints]
        let hints_len = self.hints.chars().count() + 2;
        let position_len = self.position.chars().count() + 2;
        let remaining = width.saturating_sub(hints_len + position_len);

        let path_display = if self.path_str.chars().count() > remaining {
            let tail: String = self
                .path_str
                .chars()
                .rev()
                .take(remaining.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            self.path_str.to_string()
        };

        let gap = remaining.saturating_sub(path_display.chars().count());

        let spans = vec![
            Span::styled(
                path_display,
                Style::default().fg(self.theme.status_fg),
            ),
            Span::raw(" ".repeat(gap)),
            Span::styled(
                format!(" {} ", self.position),
                Style::default().fg(self.theme.info_fg),
            ),
            Span::styled(
                format!(" {} ", self.hints),
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ),
        ];

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
