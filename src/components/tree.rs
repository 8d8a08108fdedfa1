use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::tree::{FlatItem, SelectionState, TreeState};
use crate::theme::ThemeColors;

/// Tree widget that renders the visible sequence with selection markers and
/// box-drawing indentation.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeState, theme: &'a ThemeColors) -> Self {
        Self {
            tree_state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the prefix string for tree indentation using box-drawing
    /// characters.
    ///
    /// We need to know the ancestor chain to draw continuation lines
    /// correctly, so we walk backwards through the flat list.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();
        for d in 1..item.depth {
            // Find the ancestor at depth d that contains this item.
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            if ancestor_is_last {
                parts.push("   ");
            } else {
                parts.push("│  ");
            }
        }

        if item.is_last_sibling {
            parts.push("└──");
        } else {
            parts.push("├──");
        }

        parts.join("")
    }

    /// Tri-state selection marker.
    fn selection_marker(item: &FlatItem) -> &'static str {
        match item.selection {
            SelectionState::NotSelected => "[ ] ",
            SelectionState::FullySelected => "[x] ",
            SelectionState::PartiallySelected => "[~] ",
        }
    }

    /// Expand/collapse indicator for directories.
    fn expansion_indicator(item: &FlatItem) -> &'static str {
        if item.is_dir {
            if item.is_expanded {
                "▾ "
            } else {
                "▸ "
            }
        } else {
            "  "
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.tree_state.flat_items;
        let selected = self.tree_state.selected_index;
        let visible_height = inner_area.height as usize;

        if items.is_empty() || visible_height == 0 {
            return;
        }

        let scroll = self.tree_state.scroll_offset;
        let visible_items = items.iter().enumerate().skip(scroll).take(visible_height);

        for (i, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }

            let prefix = Self::build_prefix(item, items, idx);
            let marker = Self::selection_marker(item);
            let indicator = Self::expansion_indicator(item);

            let is_cursor = idx == selected;
            let style = if is_cursor {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if item.load_error.is_some() {
                Style::default().bg(self.theme.tree_bg).fg(self.theme.error_fg)
            } else if item.selection == SelectionState::PartiallySelected {
                Style::default().bg(self.theme.tree_bg).fg(self.theme.warning_fg)
            } else if item.is_dir {
                Style::default()
                    .bg(self.theme.tree_bg)
                    .fg(self.theme.tree_dir_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .bg(self.theme.tree_bg)
                    .fg(self.theme.tree_file_fg)
            };

            let error_suffix = item
                .load_error
                .as_ref()
                .map(|e| format!(" ({})", e))
                .unwrap_or_default();
            let line_content = format!(
                "{}{}{}{}{}",
                prefix, marker, indicator, item.label, error_suffix
            );
            let line = Line::from(Span::styled(line_content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
