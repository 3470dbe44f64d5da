use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::tree::{FileTree, Node, NodeKind};
use crate::nav::controller::ListingEntry;
use crate::theme::ThemeColors;

const TYPE_WIDTH: usize = 12;
const SIZE_WIDTH: usize = 10;
/// Below this many columns only names are shown.
const MIN_WIDTH_FOR_COLUMNS: usize = 48;

/// Detail listing of the current location: name, type, size, modified.
pub struct ListingWidget<'a> {
    tree: &'a FileTree,
    entries: &'a [ListingEntry],
    selected: usize,
    scroll_offset: usize,
    theme: &'a ThemeColors,
    use_icons: bool,
    date_format: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> ListingWidget<'a> {
    pub fn new(tree: &'a FileTree, entries: &'a [ListingEntry], theme: &'a ThemeColors) -> Self {
        Self {
            tree,
            entries,
            selected: 0,
            scroll_offset: 0,
            theme,
            use_icons: false,
            date_format: crate::config::DEFAULT_DATE_FORMAT,
            block: None,
        }
    }

    pub fn selection(mut self, selected: usize, scroll_offset: usize) -> Self {
        self.selected = selected;
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn icons(mut self, use_icons: bool) -> Self {
        self.use_icons = use_icons;
        self
    }

    pub fn date_format(mut self, date_format: &'a str) -> Self {
        self.date_format = date_format;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn indicator(&self, entry: ListingEntry, node: &Node) -> &'static str {
        if let ListingEntry::ParentLink(_) = entry {
            return if self.use_icons { "\u{f062} " } else { "    " };
        }
        if self.use_icons {
            match node.kind {
                NodeKind::Computer => "\u{f108} ",
                NodeKind::Drive => "\u{f0a0} ",
                NodeKind::Folder => "\u{f07b} ",
                NodeKind::File => file_icon_by_ext(&node.name),
            }
        } else {
            match node.kind {
                NodeKind::Computer => "[C] ",
                NodeKind::Drive => "[V] ",
                NodeKind::Folder => "[D] ",
                NodeKind::File => "[F] ",
            }
        }
    }

    fn entry_style(&self, node: &Node, is_selected: bool) -> Style {
        if is_selected {
            return Style::default()
                .bg(self.theme.selected_bg)
                .fg(self.theme.selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        match node.kind {
            NodeKind::Drive | NodeKind::Computer => Style::default()
                .fg(self.theme.drive_fg)
                .add_modifier(Modifier::BOLD),
            NodeKind::Folder => Style::default()
                .fg(self.theme.dir_fg)
                .add_modifier(Modifier::BOLD),
            NodeKind::File => Style::default().fg(self.theme.file_fg),
        }
    }

    /// Width of the name column, or `None` when only names fit.
    fn name_width(&self, total: usize) -> Option<usize> {
        if total < MIN_WIDTH_FOR_COLUMNS {
            return None;
        }
        let date_width = self.date_width();
        Some(total.saturating_sub(TYPE_WIDTH + SIZE_WIDTH + date_width + 3))
    }

    fn date_width(&self) -> usize {
        // Formatting a fixed instant gives the width of every date.
        chrono::DateTime::<chrono::Local>::from(std::time::UNIX_EPOCH)
            .format(self.date_format)
            .to_string()
            .chars()
            .count()
    }

    fn row_text(&self, entry: ListingEntry, node: &Node, width: usize) -> String {
        let name = match entry {
            ListingEntry::ParentLink(_) => "..",
            ListingEntry::Child(_) => node.name.as_str(),
        };
        let label = format!("{}{}", self.indicator(entry, node), name);

        let Some(name_width) = self.name_width(width) else {
            return fit(&label, width);
        };
        if let ListingEntry::ParentLink(_) = entry {
            return fit(&label, width);
        }

        let size = node.size.as_deref().unwrap_or("");
        let modified = node
            .modified_at
            .map(|t| t.format(self.date_format).to_string())
            .unwrap_or_default();
        format!(
            "{} {} {:>size_w$} {}",
            fit(&label, name_width),
            fit(&node.type_label(), TYPE_WIDTH),
            size,
            modified,
            size_w = SIZE_WIDTH,
        )
    }

    fn header_text(&self, width: usize) -> Option<String> {
        let name_width = self.name_width(width)?;
        Some(format!(
            "{} {} {:>size_w$} {}",
            fit("Name", name_width),
            fit("Type", TYPE_WIDTH),
            "Size",
            "Modified",
            size_w = SIZE_WIDTH,
        ))
    }
}

/// Rows available for entries in an inner area of the given size.
pub fn body_height(width: u16, height: u16) -> usize {
    if (width as usize) < MIN_WIDTH_FOR_COLUMNS {
        height as usize
    } else {
        height.saturating_sub(1) as usize
    }
}

/// Truncate or pad `s` to exactly `width` characters.
fn fit(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        format!("{:<width$}", s, width = width)
    } else if width == 0 {
        String::new()
    } else {
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('…');
        out
    }
}

/// Nerd Font icon for a file based on its extension.
fn file_icon_by_ext(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "rs" => "\u{e7a8} ",
        "py" => "\u{e73c} ",
        "js" | "jsx" | "ts" | "tsx" => "\u{e74e} ",
        "json" | "toml" | "yaml" | "yml" | "ini" | "cfg" => "\u{e615} ",
        "md" | "markdown" | "rst" | "txt" => "\u{f48a} ",
        "sh" | "bash" | "zsh" | "fish" | "bat" | "ps1" => "\u{f489} ",
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "ico" | "webp" => "\u{f1c5} ",
        "mp3" | "wav" | "flac" | "ogg" | "aac" => "\u{f1c7} ",
        "mp4" | "mkv" | "avi" | "mov" | "webm" => "\u{f1c8} ",
        "zip" | "tar" | "gz" | "xz" | "bz2" | "rar" | "7z" => "\u{f1c6} ",
        "pdf" => "\u{f1c1} ",
        "exe" | "msi" | "dll" => "\u{f013} ",
        _ => "\u{f15b} ",
    }
}

impl<'a> Widget for ListingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        let width = inner_area.width as usize;

        if let Some(header) = self.header_text(width) {
            if inner_area.height == 0 {
                return;
            }
            let style = Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::BOLD);
            let line = Line::from(Span::styled(header, style));
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            inner_area.y += 1;
            inner_area.height -= 1;
        }

        let visible_height = inner_area.height as usize;
        if self.entries.is_empty() || visible_height == 0 {
            return;
        }

        let visible = self
            .entries
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (row, (idx, &entry)) in visible.enumerate() {
            let y = inner_area.y + row as u16;
            let node = self.tree.node(entry.node());
            let style = self.entry_style(node, idx == self.selected);
            let text = self.row_text(entry, node, width);
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
