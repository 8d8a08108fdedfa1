use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Tri-state inclusion marker for a node and, transitively, its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NotSelected,
    FullySelected,
    PartiallySelected,
}

/// Child-loading progress for a directory node.
///
/// `Failed` is distinct from `Loaded` with zero children so a failed listing
/// can be told apart from an empty directory and retried later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    Failed,
}

/// A node in the filesystem tree.
///
/// Ownership flows strictly parent→child through `children`; upward
/// propagation walks ancestor paths from the tree root instead of holding
/// back-pointers.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub children: Vec<TreeNode>,
    pub load_state: LoadState,
    pub selection: SelectionState,
    pub is_expanded: bool,
    /// Listing/stat failure attached to this node. An error node can never
    /// be selected and is excluded from all selection aggregation.
    pub load_error: Option<String>,
}

fn describe_io_error(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => err.to_string(),
    }
}

impl TreeNode {
    /// Create the root node from a filesystem path. Fails if the path cannot
    /// be stat'd; at startup that is a fatal error, not a tagged node.
    pub fn new(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self::with_kind(path.to_path_buf(), metadata.is_dir(), None))
    }

    /// Create a child node from a directory entry. Classification failures
    /// (permission, OS error) still yield a node, tagged with the error and
    /// a best-effort file/directory guess.
    fn from_entry(path: PathBuf) -> Self {
        match fs::metadata(&path) {
            Ok(metadata) => Self::with_kind(path, metadata.is_dir(), None),
            Err(e) => Self::with_kind(path, false, Some(describe_io_error(&e))),
        }
    }

    fn with_kind(path: PathBuf, is_dir: bool, load_error: Option<String>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            name,
            path,
            is_dir,
            children: Vec::new(),
            load_state: LoadState::NotLoaded,
            selection: SelectionState::NotSelected,
            is_expanded: false,
            load_error,
        }
    }

    /// Load immediate children of this directory node.
    ///
    /// Children are ordered directories-first, then case-insensitive by
    /// name; every consumer (display, export) relies on this order. A second
    /// call on a loaded node is a no-op; a call on a failed node retries the
    /// listing. If the listing itself fails the node's own `load_error` is
    /// set and the state becomes `Failed` (retryable), with no effect on
    /// siblings.
    ///
    /// Returns whether children are loaded after the call.
    pub fn load_children(&mut self) -> bool {
        if !self.is_dir {
            return false;
        }
        if self.load_state == LoadState::Loaded {
            return true;
        }
        match fs::read_dir(&self.path) {
            Ok(entries) => {
                let mut children = Vec::new();
                for entry in entries {
                    // An unreadable dirent gives us no path to hang a node on.
                    let entry = match entry {
                        Ok(e) => e,
                        Err(_) => continue,
                    };
                    children.push(TreeNode::from_entry(entry.path()));
                }
                children.sort_by(|a, b| {
                    b.is_dir
                        .cmp(&a.is_dir)
                        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                });
                self.children = children;
                self.load_state = LoadState::Loaded;
                self.load_error = None;
                tracing::debug!(path = %self.path.display(), count = self.children.len(), "loaded directory");
                true
            }
            Err(e) => {
                self.load_error = Some(format!("cannot list directory: {}", describe_io_error(&e)));
                self.load_state = LoadState::Failed;
                tracing::debug!(path = %self.path.display(), error = %e, "directory listing failed");
                false
            }
        }
    }

    /// Toggle this node between unselected and fully selected.
    ///
    /// A partially selected node counts as "selected" for toggling purposes,
    /// so it flips to unselected. The new state is applied recursively to
    /// every non-error descendant. Selecting an unloaded directory forces a
    /// lazy load first so the selection is materialized as deep as the
    /// filesystem allows. Deselecting never loads, since an unloaded subtree is
    /// already unselected without being enumerated.
    ///
    /// Error nodes are a no-op. Ancestor recomputation is the caller's job
    /// (see `TreeState::toggle_selected`).
    pub fn toggle_selection(&mut self) {
        if self.load_error.is_some() {
            return;
        }
        let new_state = if self.selection == SelectionState::NotSelected {
            SelectionState::FullySelected
        } else {
            SelectionState::NotSelected
        };
        self.set_selection_recursive(new_state);
    }

    fn set_selection_recursive(&mut self, state: SelectionState) {
        self.selection = state;
        if !self.is_dir {
            return;
        }
        if state == SelectionState::FullySelected && self.load_state != LoadState::Loaded {
            self.load_children();
        }
        if self.load_state == LoadState::Loaded {
            for child in &mut self.children {
                if child.load_error.is_none() {
                    child.set_selection_recursive(state);
                }
            }
        }
    }

    /// Recompute this directory's selection from its children.
    ///
    /// Applies only to directories with loaded, non-empty children; an
    /// unloaded or empty directory keeps its last explicitly assigned value,
    /// which preserves "select this collapsed directory" as durable intent.
    /// Error children are invisible to the counts; a directory whose valid
    /// children all erred retains `FullySelected` if it already had it and
    /// is never inferred `PartiallySelected` from error children alone.
    ///
    /// Returns whether the recomputation changed the value; upward
    /// propagation continues only while it does.
    pub fn recompute_from_children(&mut self) -> bool {
        if !self.is_dir || self.load_state != LoadState::Loaded || self.children.is_empty() {
            return false;
        }

        let mut num_selected = 0usize;
        let mut num_partial = 0usize;
        let mut num_valid = 0usize;
        for child in &self.children {
            if child.load_error.is_some() {
                continue;
            }
            num_valid += 1;
            match child.selection {
                SelectionState::FullySelected => num_selected += 1,
                SelectionState::PartiallySelected => num_partial += 1,
                SelectionState::NotSelected => {}
            }
        }

        let old_state = self.selection;
        self.selection = if num_valid == 0 {
            if old_state == SelectionState::FullySelected {
                SelectionState::FullySelected
            } else {
                SelectionState::NotSelected
            }
        } else if num_selected == 0 && num_partial == 0 {
            SelectionState::NotSelected
        } else if num_selected == num_valid && num_partial == 0 {
            SelectionState::FullySelected
        } else {
            SelectionState::PartiallySelected
        };
        self.selection != old_state
    }

    /// Collect paths of selected files, relative to `base`, in tree order.
    ///
    /// A file contributes itself iff fully selected and error-free. An
    /// unselected directory contributes nothing and is never recursed into
    /// or loaded. A fully or partially selected directory is lazily loaded
    /// if needed and then recursed unconditionally; the recursion resolves
    /// which descendants are actually selected. Files not under `base` are
    /// silently skipped.
    pub fn collect_selected_files(&mut self, base: &Path, out: &mut Vec<PathBuf>) {
        if !self.is_dir {
            if self.selection == SelectionState::FullySelected && self.load_error.is_none() {
                if let Ok(rel) = self.path.strip_prefix(base) {
                    out.push(rel.to_path_buf());
                }
            }
            return;
        }
        if self.load_error.is_some() || self.selection == SelectionState::NotSelected {
            return;
        }
        if self.load_state != LoadState::Loaded {
            self.load_children();
        }
        for child in &mut self.children {
            child.collect_selected_files(base, out);
        }
    }
}

/// A flattened representation of a tree node for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    /// Display label: bare name, or a `./`-prefixed path relative to the
    /// invocation directory when full-path display is on.
    pub label: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    pub selection: SelectionState,
    pub load_error: Option<String>,
}

/// State for the tree view: the root node plus the materialized visible
/// sequence, cursor, and scroll window.
pub struct TreeState {
    pub root: TreeNode,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    /// Show paths relative to the invocation directory instead of bare names.
    pub full_path_display: bool,
    /// The directory the process was started from, used for display labels.
    display_base: PathBuf,
}

impl TreeState {
    /// Create a new TreeState rooted at the given directory, with the root
    /// expanded and its first level loaded.
    pub fn new(path: &Path, full_path_display: bool) -> Result<Self> {
        let mut root = TreeNode::new(path)?;
        root.is_expanded = true;
        root.load_children();

        let display_base =
            std::env::current_dir().unwrap_or_else(|_| path.to_path_buf());

        let mut state = Self {
            root,
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            full_path_display,
            display_base,
        };
        state.flatten();
        Ok(state)
    }

    /// Rebuild the flat visible sequence from the tree.
    ///
    /// The sequence is the root, then for each expanded directory its
    /// children recursively; collapsed directories contribute only
    /// themselves. It is re-derived wholesale after every structural change,
    /// with no incremental diffing. Flattening an expanded-but-
    /// unloaded directory performs display-time lazy loading as a side
    /// effect. The cursor is re-clamped in case the sequence shrank.
    pub fn flatten(&mut self) {
        let mut items = Vec::new();
        let show_full = self.full_path_display;
        let base = self.display_base.clone();
        Self::flatten_node(&mut self.root, &mut items, 0, true, show_full, &base);
        self.flat_items = items;
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    fn flatten_node(
        node: &mut TreeNode,
        items: &mut Vec<FlatItem>,
        depth: usize,
        is_last: bool,
        show_full: bool,
        base: &Path,
    ) {
        let label = if depth == 0 || show_full {
            match node.path.strip_prefix(base) {
                Ok(rel) if !rel.as_os_str().is_empty() => format!("./{}", rel.display()),
                Ok(_) => "./".to_string(),
                Err(_) => node.path.display().to_string(),
            }
        } else {
            node.name.clone()
        };
        items.push(FlatItem {
            label,
            path: node.path.clone(),
            is_dir: node.is_dir,
            depth,
            is_expanded: node.is_expanded,
            is_last_sibling: is_last,
            selection: node.selection,
            load_error: node.load_error.clone(),
        });

        if node.is_dir && node.is_expanded {
            if node.load_state != LoadState::Loaded {
                node.load_children();
            }
            let count = node.children.len();
            for (i, child) in node.children.iter_mut().enumerate() {
                Self::flatten_node(child, items, depth + 1, i + 1 == count, show_full, base);
            }
        }
    }

    /// Find a mutable reference to a node by path.
    fn find_node_mut<'a>(node: &'a mut TreeNode, target: &Path) -> Option<&'a mut TreeNode> {
        if node.path == target {
            return Some(node);
        }
        if !target.starts_with(&node.path) {
            return None;
        }
        for child in node.children.iter_mut() {
            if let Some(found) = Self::find_node_mut(child, target) {
                return Some(found);
            }
        }
        None
    }

    fn current_item(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    /// Move the cursor down by one row; clamps rather than wraps.
    pub fn select_next(&mut self) -> bool {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
            return true;
        }
        false
    }

    /// Move the cursor up by one row; clamps rather than wraps.
    pub fn select_previous(&mut self) -> bool {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            return true;
        }
        false
    }

    /// Jump to the first row.
    pub fn select_first(&mut self) -> bool {
        if self.selected_index != 0 {
            self.selected_index = 0;
            return true;
        }
        false
    }

    /// Jump to the last row.
    pub fn select_last(&mut self) -> bool {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index != len - 1 {
            self.selected_index = len - 1;
            return true;
        }
        false
    }

    /// Expand the directory under the cursor.
    ///
    /// No-op on files, error nodes, and (except for a cursor hop to the
    /// first child) already-expanded directories. A listing failure marks
    /// the node with an error and leaves it collapsed.
    pub fn expand_selected(&mut self) -> bool {
        let Some(item) = self.current_item() else {
            return false;
        };
        if !item.is_dir || item.load_error.is_some() {
            return false;
        }
        let path = item.path.clone();

        if item.is_expanded {
            // Already open: move the cursor onto the first visible child.
            if let Some(next) = self.flat_items.get(self.selected_index + 1) {
                if next.depth == item.depth + 1 {
                    self.selected_index += 1;
                    return true;
                }
            }
            return false;
        }

        let Some(node) = Self::find_node_mut(&mut self.root, &path) else {
            return false;
        };
        if node.load_children() {
            node.is_expanded = true;
        }
        // Re-flatten either way: on failure the error marker must show.
        self.flatten();
        true
    }

    /// Collapse the directory under the cursor, or move to its parent.
    ///
    /// An expanded directory is collapsed with the cursor kept on it. For
    /// anything else the cursor moves to the parent's position in the
    /// visible sequence; if the parent is not visible this is a no-op.
    pub fn collapse_selected(&mut self) -> bool {
        let Some(item) = self.current_item() else {
            return false;
        };
        let path = item.path.clone();

        if item.is_dir && item.is_expanded {
            if let Some(node) = Self::find_node_mut(&mut self.root, &path) {
                node.is_expanded = false;
                self.flatten();
                if let Some(i) = self.find_index_by_path(&path) {
                    self.selected_index = i;
                }
                return true;
            }
        }

        if let Some(parent) = path.parent() {
            if let Some(i) = self.find_index_by_path(parent) {
                if i != self.selected_index {
                    self.selected_index = i;
                    return true;
                }
            }
        }
        false
    }

    /// Toggle selection of the node under the cursor, then propagate to its
    /// ancestors and re-derive the visible sequence (selection markers
    /// change, and materializing a selection may have loaded new children).
    pub fn toggle_selected(&mut self) -> bool {
        let Some(item) = self.current_item() else {
            return false;
        };
        if item.load_error.is_some() {
            return false;
        }
        let path = item.path.clone();
        let Some(node) = Self::find_node_mut(&mut self.root, &path) else {
            return false;
        };
        node.toggle_selection();
        self.propagate_to_ancestors(&path);
        self.flatten();
        true
    }

    /// Recompute ancestor selection states bottom-up after a toggle at
    /// `path`.
    ///
    /// An explicit loop over ancestor paths rather than recursion, so stack
    /// use stays bounded on deep trees; it terminates as soon as a parent's
    /// computed value does not change.
    fn propagate_to_ancestors(&mut self, path: &Path) {
        let mut current = path.to_path_buf();
        while current != self.root.path {
            let Some(parent) = current.parent().map(Path::to_path_buf) else {
                break;
            };
            if !parent.starts_with(&self.root.path) {
                break;
            }
            let Some(node) = Self::find_node_mut(&mut self.root, &parent) else {
                break;
            };
            if !node.recompute_from_children() {
                break;
            }
            current = parent;
        }
    }

    /// Collect selected file paths relative to the tree root, in the
    /// directories-first, case-insensitive order established at load time.
    pub fn collect_selected_files(&mut self) -> Vec<PathBuf> {
        let base = self.root.path.clone();
        let mut out = Vec::new();
        self.root.collect_selected_files(&base, &mut out);
        out
    }

    /// Adjust the scroll window minimally so the cursor row stays inside a
    /// window of `visible_height` rows, clamped so the window never extends
    /// past the end of the sequence.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
        let max_offset = self.flat_items.len().saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Find the flat_items index of a node by its path.
    pub fn find_index_by_path(&self, path: &Path) -> Option<usize> {
        self.flat_items.iter().position(|item| item.path == path)
    }
}
