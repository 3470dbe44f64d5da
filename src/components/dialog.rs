use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::fs::tree::NodeKind;
use crate::nav::controller::PendingDelete;
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };

        match kind {
            DialogKind::CreateDirectory => {
                render_input_dialog("New Folder", self.dialog_state, self.theme, area, buf);
            }
            DialogKind::Rename { .. } => {
                render_input_dialog("Rename", self.dialog_state, self.theme, area, buf);
            }
            DialogKind::DeleteConfirm { pending } => {
                render_confirm_dialog(pending, self.theme, area, buf);
            }
            DialogKind::Error { message, path } => {
                render_error_dialog(message, path.as_deref(), self.theme, area, buf);
            }
        }
    }
}

fn hint_style(theme: &ThemeColors) -> Style {
    Style::default()
        .fg(theme.dim_fg)
        .add_modifier(Modifier::DIM)
}

/// Clear `rect`, draw a bordered block and return its inner area.
fn frame(title: &str, border: Style, rect: Rect, buf: &mut Buffer) -> Rect {
    Clear.render(rect, buf);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border)
        .padding(Padding::horizontal(1));
    let inner = block.inner(rect);
    block.render(rect, buf);
    inner
}

fn render_input_dialog(
    title: &str,
    state: &DialogState,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let rect = DialogWidget::centered_rect(dialog_width, 5, area);
    let inner = frame(
        title,
        Style::default().fg(theme.dialog_border_fg),
        rect,
        buf,
    );
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Split the input around the cursor on char boundaries.
    let input = &state.input;
    let cursor_pos = state.cursor_position.min(input.len());
    let before = &input[..cursor_pos];
    let (cursor_char, after) = match input[cursor_pos..].chars().next() {
        Some(c) => (
            &input[cursor_pos..cursor_pos + c.len_utf8()],
            &input[cursor_pos + c.len_utf8()..],
        ),
        None => (" ", ""),
    };

    // Keep the cursor visible when the input is wider than the box.
    let max_width = inner.width as usize;
    let before_chars = before.chars().count();
    let before_display: String = if before_chars + 1 > max_width {
        before
            .chars()
            .skip(before_chars + 1 - max_width)
            .collect()
    } else {
        before.to_string()
    };

    let input_style = Style::default().fg(theme.list_fg);
    let cursor_style = Style::default()
        .bg(theme.list_fg)
        .fg(theme.status_bg)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, input_style),
    ]);
    buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);

    let hint_line = Line::from(Span::styled(
        "[Enter] Confirm  [Esc] Cancel",
        hint_style(theme),
    ));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

fn render_confirm_dialog(pending: &PendingDelete, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let what = match pending.kind {
        NodeKind::Folder => "folder",
        _ => "file",
    };
    let path = pending.path.display().to_string();

    let dialog_width = (path.chars().count() as u16 + 8)
        .max(40)
        .min(area.width.saturating_sub(4));
    let rect = DialogWidget::centered_rect(dialog_width, 7, area);
    let inner = frame(
        "Delete Confirmation",
        Style::default().fg(theme.error_fg),
        rect,
        buf,
    );
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let header = Line::from(Span::styled(
        format!("Delete {} '{}'?", what, pending.name),
        Style::default()
            .fg(theme.warning_fg)
            .add_modifier(Modifier::BOLD),
    ));
    buf.set_line(inner.x, inner.y, &header, inner.width);

    if inner.height > 2 {
        let path_line = Line::from(Span::styled(path, Style::default().fg(theme.list_fg)));
        buf.set_line(inner.x, inner.y + 1, &path_line, inner.width);
    }
    if pending.kind == NodeKind::Folder && inner.height > 3 {
        let note = Line::from(Span::styled(
            "Only empty folders can be deleted.",
            Style::default().fg(theme.dim_fg),
        ));
        buf.set_line(inner.x, inner.y + 2, &note, inner.width);
    }

    let hint_line = Line::from(Span::styled("[y] Yes  [n/Esc] Cancel", hint_style(theme)));
    buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
}

fn render_error_dialog(
    message: &str,
    path: Option<&Path>,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let path = path.map(|p| format!("Path: {}", p.display()));
    let widest = path
        .as_ref()
        .map_or(0, |p| p.chars().count())
        .max(message.chars().count());
    let dialog_width = (widest as u16 + 6)
        .max(30)
        .min(area.width.saturating_sub(4));
    let height = if path.is_some() { 6 } else { 5 };
    let rect = DialogWidget::centered_rect(dialog_width, height, area);
    let inner = frame("Error", Style::default().fg(theme.error_fg), rect, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let msg_line = Line::from(Span::styled(message, Style::default().fg(theme.error_fg)));
    buf.set_line(inner.x, inner.y, &msg_line, inner.width);

    if let Some(path) = path {
        if inner.height > 2 {
            let path_line = Line::from(Span::styled(path, Style::default().fg(theme.dim_fg)));
            buf.set_line(inner.x, inner.y + 1, &path_line, inner.width);
        }
    }

    let hint_line = Line::from(Span::styled("[Enter/Esc] Dismiss", hint_style(theme)));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}
