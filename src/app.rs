use std::path::{Path, PathBuf};

use crate::components::help::HelpState;
use crate::config::AppConfig;
use crate::error::Result;
use crate::export::{ExportFormat, ExportJob};
use crate::fs::tree::TreeState;

/// Persistent key-hint line shown when no status message is active.
pub const KEY_HINTS: &str =
    "↑↓ move  →/Enter expand  ← collapse  Space select  t/g/z/p export  ? help  q quit";

/// Application mode.
///
/// Doubles as the export state machine: `Normal` is Idle, collection happens
/// on the export key-press, `ExportPrompt` is the filename prompt, and the
/// Running step executes in the main loop (terminal suspended) before
/// control returns to `Normal` with a status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    ExportPrompt {
        format: ExportFormat,
        default_name: String,
    },
    Help,
}

/// State for the filename prompt's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    pub cursor_position: usize,
}

/// A collected selection waiting for a filename.
struct PendingExport {
    format: ExportFormat,
    files: Vec<PathBuf>,
}

/// Main application state.
pub struct App {
    pub tree_state: TreeState,
    pub should_quit: bool,
    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub help_state: HelpState,
    /// Transient status message and whether it is an error.
    pub status_message: Option<(String, bool)>,
    pending_export: Option<PendingExport>,
    export_job: Option<ExportJob>,
    default_base_name: String,
    /// Directory the process was started from; output filenames resolve
    /// against it so archives never silently land inside the browsed tree.
    invocation_dir: PathBuf,
}

impl App {
    /// Create a new App rooted at the given (canonicalized) path.
    pub fn new(path: &Path, config: &AppConfig) -> Result<Self> {
        let tree_state = TreeState::new(path, config.full_path_display())?;
        let invocation_dir = std::env::current_dir()?;
        Ok(Self {
            tree_state,
            should_quit: false,
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            help_state: HelpState::default(),
            status_message: None,
            pending_export: None,
            export_job: None,
            default_base_name: config.default_base_name().to_string(),
            invocation_dir,
        })
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, false));
    }

    pub fn set_error(&mut self, msg: String) {
        self.status_message = Some((msg, true));
    }

    // ── Navigation (delegated to the tree) ──────────────────────────────────

    pub fn select_next(&mut self) {
        self.tree_state.select_next();
    }

    pub fn select_previous(&mut self) {
        self.tree_state.select_previous();
    }

    pub fn select_first(&mut self) {
        self.tree_state.select_first();
    }

    pub fn select_last(&mut self) {
        self.tree_state.select_last();
    }

    pub fn expand_selected(&mut self) {
        self.tree_state.expand_selected();
    }

    pub fn collapse_selected(&mut self) {
        self.tree_state.collapse_selected();
    }

    pub fn toggle_selected(&mut self) {
        self.tree_state.toggle_selected();
    }

    // ── Export flow ─────────────────────────────────────────────────────────

    /// Collect the current selection and open the filename prompt.
    ///
    /// An empty selection short-circuits straight back to normal mode with a
    /// status message instead of prompting.
    pub fn begin_export(&mut self, format: ExportFormat) {
        let files = self.tree_state.collect_selected_files();
        if files.is_empty() {
            self.set_status("Nothing selected. Space marks files for export".to_string());
            return;
        }
        tracing::debug!(format = format.label(), files = files.len(), "selection collected");
        let default_name = format.default_filename(&self.default_base_name);
        self.pending_export = Some(PendingExport { format, files });
        self.dialog_state = DialogState::default();
        self.mode = AppMode::ExportPrompt {
            format,
            default_name,
        };
    }

    /// Confirm the filename prompt and stage the export job.
    ///
    /// An empty input falls back to the computed default filename. The job
    /// itself runs from the main loop with the terminal suspended.
    pub fn confirm_export_name(&mut self) {
        let AppMode::ExportPrompt {
            ref default_name, ..
        } = self.mode
        else {
            return;
        };
        let Some(pending) = self.pending_export.take() else {
            self.mode = AppMode::Normal;
            return;
        };
        let trimmed = self.dialog_state.input.trim();
        let filename = if trimmed.is_empty() {
            default_name.clone()
        } else {
            trimmed.to_string()
        };
        self.export_job = Some(ExportJob {
            format: pending.format,
            files: pending.files,
            base_dir: self.tree_state.root.path.clone(),
            output: self.invocation_dir.join(filename),
        });
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Cancel the filename prompt and discard the collected selection.
    pub fn cancel_export_prompt(&mut self) {
        self.pending_export = None;
        self.dialog_state = DialogState::default();
        self.mode = AppMode::Normal;
        self.set_status("Export cancelled".to_string());
    }

    /// Take the staged export job, if any, for execution.
    pub fn take_export_job(&mut self) -> Option<ExportJob> {
        self.export_job.take()
    }

    /// Record the outcome of a finished export job in the status line.
    pub fn finish_export(&mut self, job: &ExportJob, result: Result<()>) {
        let name = job
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| job.output.display().to_string());
        match result {
            Ok(()) => {
                tracing::info!(output = %job.output.display(), "export finished");
                self.set_status(format!(
                    "Created '{}' ({} file{})",
                    name,
                    job.files.len(),
                    if job.files.len() == 1 { "" } else { "s" }
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.set_error(format!("Export failed: {}", e));
            }
        }
    }

    // ── Help overlay ────────────────────────────────────────────────────────

    pub fn open_help(&mut self) {
        self.help_state = HelpState::default();
        self.mode = AppMode::Help;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    // ── Filename prompt editing ─────────────────────────────────────────────

    /// Insert a character at the current cursor position.
    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        if self.dialog_state.cursor_position > 0 {
            let byte_pos = self.dialog_state.cursor_position;
            let prev_char = self.dialog_state.input[..byte_pos]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.dialog_state.cursor_position -= prev_char.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn dialog_move_cursor_left(&mut self) {
        if self.dialog_state.cursor_position > 0 {
            let prev_char = self.dialog_state.input[..self.dialog_state.cursor_position]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.dialog_state.cursor_position -= prev_char.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn dialog_move_cursor_right(&mut self) {
        if self.dialog_state.cursor_position < self.dialog_state.input.len() {
            let next_char = self.dialog_state.input[self.dialog_state.cursor_position..]
                .chars()
                .next()
                .expect("cursor < len guarantees at least one char");
            self.dialog_state.cursor_position += next_char.len_utf8();
        }
    }

    /// Move cursor to the beginning of the input.
    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    /// Move cursor to the end of the input.
    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("c.txt")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        let app = App::new(dir.path(), &AppConfig::default()).unwrap();
        (dir, app)
    }

    fn select_row(app: &mut App, name: &str) {
        let idx = app
            .tree_state
            .flat_items
            .iter()
            .position(|i| i.label == name)
            .expect("row should be visible");
        app.tree_state.selected_index = idx;
    }

    #[test]
    fn quit_sets_flag() {
        let (_dir, mut app) = setup_app();
        assert!(!app.should_quit);
        app.quit();
        assert!(app.should_quit);
    }

    #[test]
    fn export_with_nothing_selected_stays_in_normal_mode() {
        let (_dir, mut app) = setup_app();
        app.begin_export(ExportFormat::Tar);
        assert_eq!(app.mode, AppMode::Normal);
        let (msg, is_error) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("Nothing selected"));
        assert!(!is_error);
        assert!(app.take_export_job().is_none());
    }

    #[test]
    fn export_with_selection_opens_prompt() {
        let (_dir, mut app) = setup_app();
        select_row(&mut app, "a.txt");
        app.toggle_selected();
        app.begin_export(ExportFormat::TarGz);
        assert_eq!(
            app.mode,
            AppMode::ExportPrompt {
                format: ExportFormat::TarGz,
                default_name: "archive.tar.gz".to_string(),
            }
        );
    }

    #[test]
    fn empty_filename_falls_back_to_default() {
        let (dir, mut app) = setup_app();
        select_row(&mut app, "a.txt");
        app.toggle_selected();
        app.begin_export(ExportFormat::Tar);
        app.confirm_export_name();

        let job = app.take_export_job().expect("job staged");
        assert_eq!(
            job.output.file_name().unwrap().to_string_lossy(),
            "archive.tar"
        );
        assert_eq!(job.files, vec![PathBuf::from("a.txt")]);
        assert_eq!(job.base_dir, dir.path().to_path_buf());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn typed_filename_is_used() {
        let (_dir, mut app) = setup_app();
        select_row(&mut app, "a.txt");
        app.toggle_selected();
        app.begin_export(ExportFormat::Patch);
        for c in "mine.patch".chars() {
            app.dialog_input_char(c);
        }
        app.confirm_export_name();
        let job = app.take_export_job().expect("job staged");
        assert_eq!(
            job.output.file_name().unwrap().to_string_lossy(),
            "mine.patch"
        );
    }

    #[test]
    fn cancel_prompt_discards_collection() {
        let (_dir, mut app) = setup_app();
        select_row(&mut app, "a.txt");
        app.toggle_selected();
        app.begin_export(ExportFormat::Tar);
        app.cancel_export_prompt();
        assert_eq!(app.mode, AppMode::Normal);
        // Confirming now stages nothing.
        app.confirm_export_name();
        assert!(app.take_export_job().is_none());
    }

    #[test]
    fn finish_export_reports_success_and_failure() {
        let (_dir, mut app) = setup_app();
        let job = ExportJob {
            format: ExportFormat::Tar,
            files: vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
            base_dir: PathBuf::from("/tmp"),
            output: PathBuf::from("/tmp/out.tar"),
        };

        app.finish_export(&job, Ok(()));
        let (msg, is_error) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Created 'out.tar' (2 files)");
        assert!(!is_error);

        app.finish_export(
            &job,
            Err(crate::error::AppError::Tool {
                tool: "tar",
                message: "exited with status 2".into(),
            }),
        );
        let (msg, is_error) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("Export failed"));
        assert!(msg.contains("tar"));
        assert!(is_error);
    }

    #[test]
    fn help_overlay_round_trip() {
        let (_dir, mut app) = setup_app();
        app.open_help();
        assert_eq!(app.mode, AppMode::Help);
        app.close_help();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn dialog_input_char_inserts() {
        let (_dir, mut app) = setup_app();
        app.dialog_input_char('a');
        app.dialog_input_char('b');
        app.dialog_input_char('c');
        assert_eq!(app.dialog_state.input, "abc");
        assert_eq!(app.dialog_state.cursor_position, 3);
    }

    #[test]
    fn dialog_delete_char_removes() {
        let (_dir, mut app) = setup_app();
        app.dialog_input_char('a');
        app.dialog_input_char('b');
        app.dialog_delete_char();
        assert_eq!(app.dialog_state.input, "a");
        assert_eq!(app.dialog_state.cursor_position, 1);
    }

    #[test]
    fn dialog_delete_char_at_start_is_noop() {
        let (_dir, mut app) = setup_app();
        app.dialog_delete_char();
        assert!(app.dialog_state.input.is_empty());
        assert_eq!(app.dialog_state.cursor_position, 0);
    }

    #[test]
    fn dialog_cursor_movement_and_boundaries() {
        let (_dir, mut app) = setup_app();
        app.dialog_input_char('a');
        app.dialog_input_char('b');
        app.dialog_move_cursor_left();
        assert_eq!(app.dialog_state.cursor_position, 1);
        app.dialog_move_cursor_right();
        assert_eq!(app.dialog_state.cursor_position, 2);
        app.dialog_move_cursor_right();
        assert_eq!(app.dialog_state.cursor_position, 2);
        app.dialog_cursor_home();
        assert_eq!(app.dialog_state.cursor_position, 0);
        app.dialog_move_cursor_left();
        assert_eq!(app.dialog_state.cursor_position, 0);
        app.dialog_cursor_end();
        assert_eq!(app.dialog_state.cursor_position, 2);
    }
}
