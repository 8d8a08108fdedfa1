use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::theme::ThemeColors;

/// State for the help overlay.
#[derive(Debug, Default)]
pub struct HelpState {
    /// Scroll offset for the help content.
    pub scroll_offset: usize,
}

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

/// A category of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const NAVIGATION_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "j / ↓",
        description: "Move down",
    },
    KeyEntry {
        key: "k / ↑",
        description: "Move up",
    },
    KeyEntry {
        key: "Home / End",
        description: "Jump to first / last row",
    },
    KeyEntry {
        key: "Enter / l / →",
        description: "Expand directory",
    },
    KeyEntry {
        key: "Backspace / h / ←",
        description: "Collapse directory, or jump to parent",
    },
];

const SELECTION_KEYS: &[KeyEntry] = &[KeyEntry {
    key: "Space",
    description: "Toggle selection ([ ] none, [x] full, [~] partial)",
}];

const EXPORT_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "t",
        description: "Export selection as tar archive",
    },
    KeyEntry {
        key: "g",
        description: "Export selection as tar.gz archive",
    },
    KeyEntry {
        key: "z",
        description: "Export selection as tar.zst archive",
    },
    KeyEntry {
        key: "p",
        description: "Export selection as git-style patch",
    },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "?",
        description: "Toggle this help",
    },
    KeyEntry {
        key: "q / Esc",
        description: "Quit",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Navigation",
        entries: NAVIGATION_KEYS,
    },
    KeyCategory {
        name: "Selection",
        entries: SELECTION_KEYS,
    },
    KeyCategory {
        name: "Export",
        entries: EXPORT_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Total number of help lines (categories, entries, spacers).
fn content_line_count() -> usize {
    CATEGORIES
        .iter()
        .map(|c| c.entries.len() + 2)
        .sum::<usize>()
}

/// Help overlay widget rendered as a centered modal.
pub struct HelpWidget<'a> {
    state: &'a HelpState,
    theme: &'a ThemeColors,
}

impl<'a> HelpWidget<'a> {
    pub fn new(state: &'a HelpState, theme: &'a ThemeColors) -> Self {
        Self { state, theme }
    }

    /// Clamp a requested scroll offset against the visible height.
    pub fn max_scroll(visible_height: usize) -> usize {
        content_line_count().saturating_sub(visible_height)
    }
}

impl<'a> Widget for HelpWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_width = 64.min(area.width.saturating_sub(4));
        let dialog_height = (content_line_count() as u16 + 3).min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(dialog_width) / 2;
        let y = area.y + area.height.saturating_sub(dialog_height) / 2;
        let rect = Rect::new(x, y, dialog_width, dialog_height);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Key Bindings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // Build all content lines, then window by scroll offset.
        let mut lines: Vec<Line> = Vec::new();
        for category in CATEGORIES {
            lines.push(Line::from(Span::styled(
                category.name,
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            )));
            for entry in category.entries {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<18}", entry.key),
                        Style::default().fg(self.theme.info_fg),
                    ),
                    Span::styled(entry.description, Style::default().fg(self.theme.tree_fg)),
                ]));
            }
            lines.push(Line::from(""));
        }

        let visible_height = inner.height.saturating_sub(1) as usize;
        let offset = self.state.scroll_offset.min(Self::max_scroll(visible_height));
        for (i, line) in lines.iter().skip(offset).take(visible_height).enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }

        let hint = "[↑↓] Scroll  [Esc/q/?] Close";
        let hint_line = Line::from(Span::styled(
            hint,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn renders_all_categories() {
        let state = HelpState::default();
        let tc = theme::dark_theme();
        let widget = HelpWidget::new(&state, &tc);
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Key Bindings"));
        assert!(content.contains("Navigation"));
        assert!(content.contains("Selection"));
        assert!(content.contains("Export"));
        assert!(content.contains("tar.zst"));
        assert!(content.contains("patch"));
    }

    #[test]
    fn scroll_offset_hides_top_lines() {
        let mut state = HelpState::default();
        state.scroll_offset = 6;
        let tc = theme::dark_theme();
        let widget = HelpWidget::new(&state, &tc);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(!content.contains("Move down"));
    }

    #[test]
    fn max_scroll_never_underflows() {
        assert_eq!(HelpWidget::max_scroll(1000), 0);
        assert!(HelpWidget::max_scroll(1) > 0);
    }

    #[test]
    fn small_area_does_not_panic() {
        let state = HelpState::default();
        let tc = theme::dark_theme();
        let widget = HelpWidget::new(&state, &tc);
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
