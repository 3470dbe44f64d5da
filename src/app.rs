use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::fs::gateway::FileSystemGateway;
use crate::fs::tree::{Node, NodeId, NodeKind};
use crate::nav::controller::{ListingEntry, NavSnapshot, NavigationController, PendingDelete};
use crate::theme::{self, ThemeColors};

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    CreateDirectory,
    Rename { node: NodeId, original: String },
    DeleteConfirm { pending: PendingDelete },
    Error {
        message: String,
        /// Location the failed operation was attempting.
        path: Option<PathBuf>,
    },
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    /// Byte offset into `input`, always on a char boundary.
    pub cursor_position: usize,
}

/// Main application state.
pub struct App {
    pub nav: NavigationController<Box<dyn FileSystemGateway>>,
    /// What the listing, toolbar and status bar show.
    pub view: NavSnapshot,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub status_message: Option<(String, Instant)>,
    pub confirm_delete: bool,
    pub use_icons: bool,
    pub date_format: String,
    pub theme: ThemeColors,
}

impl App {
    /// Start a session at the computer root.
    pub fn new(gateway: Box<dyn FileSystemGateway>, config: &AppConfig) -> Self {
        let nav = NavigationController::new(gateway);
        let view = nav.snapshot();
        Self {
            nav,
            view,
            selected_index: 0,
            scroll_offset: 0,
            should_quit: false,
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            status_message: None,
            confirm_delete: config.confirm_delete(),
            use_icons: config.use_icons(),
            date_format: config.date_format().to_string(),
            theme: theme::resolve_theme(&config.theme),
        }
    }

    /// Navigate to the folder at `path`, reporting failure in a dialog.
    pub fn reveal(&mut self, path: &Path) {
        let result = self.nav.reveal_path(path).map(|_| ());
        self.finish(result, None);
    }

    // ── View sync ──────────────────────────────────────────────────────────

    /// Re-read the controller state after an action. On error the message
    /// is shown and whatever is cached is displayed.
    fn finish(&mut self, result: Result<()>, select: Option<NodeId>) {
        let previous = self.view.current;
        if let Err(e) = result {
            self.show_error(&e);
        }
        self.view = self.nav.snapshot();

        let target = select.and_then(|id| {
            self.view
                .entries
                .iter()
                .position(|e| matches!(e, ListingEntry::Child(c) if *c == id))
        });
        match target {
            Some(idx) => self.selected_index = idx,
            None if self.view.current != previous => {
                self.selected_index = 0;
                self.scroll_offset = 0;
            }
            None => self.clamp_selection(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.view.entries.len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    fn show_error(&mut self, err: &AppError) {
        let path = err.path().map(Path::to_path_buf);
        tracing::warn!(category = err.category(), path = ?path, error = %err, "operation failed");
        self.open_dialog(DialogKind::Error {
            message: err.to_string(),
            path,
        });
    }

    /// Keep the selected row inside a window of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index + 1 - visible_height;
        }
    }

    // ── Queries ────────────────────────────────────────────────────────────

    pub fn selected_entry(&self) -> Option<ListingEntry> {
        self.view.entries.get(self.selected_index).copied()
    }

    /// The node the current listing belongs to.
    pub fn current_node(&self) -> &Node {
        self.nav.tree().node(self.view.current)
    }

    /// Number of real entries, the `..` link excluded.
    pub fn item_count(&self) -> usize {
        self.view
            .entries
            .iter()
            .filter(|e| matches!(e, ListingEntry::Child(_)))
            .count()
    }

    /// Path shown to the user for the current location.
    pub fn location_text(&self) -> String {
        let node = self.current_node();
        match node.kind {
            NodeKind::Computer => node.name.clone(),
            _ => node.path.display().to_string(),
        }
    }

    // ── Selection ──────────────────────────────────────────────────────────

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.view.entries.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.view.entries.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    // ── Navigation ─────────────────────────────────────────────────────────

    /// Enter on a row: `..` goes up, containers are opened, files only
    /// report their path.
    pub fn open_selected(&mut self) {
        match self.selected_entry() {
            Some(ListingEntry::ParentLink(_)) => self.go_up(),
            Some(ListingEntry::Child(id)) => {
                let node = self.nav.tree().node(id);
                if node.kind.is_container() {
                    let result = self.nav.navigate_to(id);
                    self.finish(result, None);
                } else {
                    let msg = format!("File: {}", node.path.display());
                    self.set_status_message(msg);
                }
            }
            None => {}
        }
    }

    pub fn go_back(&mut self) {
        let left = self.view.current;
        match self.nav.navigate_back() {
            Ok(false) => self.set_status_message("Nothing to go back to".into()),
            result => self.finish(result.map(|_| ()), Some(left)),
        }
    }

    pub fn go_forward(&mut self) {
        let left = self.view.current;
        match self.nav.navigate_forward() {
            Ok(false) => self.set_status_message("Nothing to go forward to".into()),
            result => self.finish(result.map(|_| ()), Some(left)),
        }
    }

    /// Go to the parent, keeping the folder just left selected.
    pub fn go_up(&mut self) {
        let left = self.view.current;
        match self.nav.navigate_up() {
            Ok(false) => self.set_status_message("Already at the top".into()),
            result => self.finish(result.map(|_| ()), Some(left)),
        }
    }

    pub fn refresh(&mut self) {
        let keep = match self.selected_entry() {
            Some(ListingEntry::Child(id)) => Some(id),
            _ => None,
        };
        let result = self.nav.refresh();
        let ok = result.is_ok();
        self.finish(result, keep);
        if ok {
            self.set_status_message(format!("Refreshed ({} items)", self.item_count()));
        }
    }

    // ── Mutations ──────────────────────────────────────────────────────────

    /// Ask for a name for a new folder in the current location.
    pub fn start_create_folder(&mut self) {
        let kind = self.current_node().kind;
        match kind {
            NodeKind::Drive | NodeKind::Folder => self.open_dialog(DialogKind::CreateDirectory),
            _ => self.set_status_message("Open a drive or folder first".into()),
        }
    }

    /// Ask for a new name for the selected file or folder.
    pub fn start_rename(&mut self) {
        let Some(ListingEntry::Child(id)) = self.selected_entry() else {
            return;
        };
        let node = self.nav.tree().node(id);
        if matches!(node.kind, NodeKind::Folder | NodeKind::File) {
            let original = node.name.clone();
            self.open_dialog(DialogKind::Rename { node: id, original });
        } else {
            let msg = format!("Cannot rename {}", node.name);
            self.set_status_message(msg);
        }
    }

    /// Validate a delete of the selected item and ask for confirmation
    /// unless confirmations are disabled.
    pub fn start_delete(&mut self) {
        let Some(ListingEntry::Child(id)) = self.selected_entry() else {
            return;
        };
        match self.nav.prepare_delete(id) {
            Ok(pending) if self.confirm_delete => {
                self.open_dialog(DialogKind::DeleteConfirm { pending })
            }
            Ok(pending) => self.delete(pending),
            Err(e) => self.show_error(&e),
        }
    }

    fn delete(&mut self, pending: PendingDelete) {
        let name = pending.name.clone();
        let result = self.nav.delete_item(pending);
        let ok = result.is_ok();
        self.finish(result, None);
        if ok {
            self.set_status_message(format!("Deleted: {}", name));
        }
    }

    /// Apply the open dialog (Enter / `y`).
    pub fn confirm_dialog(&mut self) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind.clone(),
            AppMode::Normal => return,
        };
        let input = self.dialog_state.input.trim().to_string();
        self.close_dialog();

        match kind {
            DialogKind::CreateDirectory => {
                if input.is_empty() {
                    return;
                }
                match self.nav.create_folder(&input) {
                    Ok(id) => {
                        self.finish(Ok(()), Some(id));
                        self.set_status_message(format!("Created folder: {}", input));
                    }
                    Err(e) => self.finish(Err(e), None),
                }
            }
            DialogKind::Rename { node, original } => match self.nav.rename_item(node, &input) {
                Ok(true) => {
                    self.finish(Ok(()), Some(node));
                    self.set_status_message(format!("Renamed: {} → {}", original, input));
                }
                Ok(false) => {}
                Err(e) => self.finish(Err(e), None),
            },
            DialogKind::DeleteConfirm { pending } => self.delete(pending),
            DialogKind::Error { .. } => {}
        }
    }

    // ── Dialog input ───────────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        if let DialogKind::Rename { ref original, .. } = kind {
            self.dialog_state.cursor_position = original.len();
            self.dialog_state.input = original.clone();
        }
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Insert a character at the current cursor position.
    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    pub fn dialog_move_cursor_left(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
        }
    }

    pub fn dialog_move_cursor_right(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(next) = self.dialog_state.input[pos..].chars().next() {
            self.dialog_state.cursor_position += next.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    // ── Status ─────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }
}
