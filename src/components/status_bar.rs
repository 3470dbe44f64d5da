use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " Enter:open  Bksp:back  u:up  n:new  F2:ren  d:del  q:quit ";

/// Status bar: `Items: N | path` with key hints, or a transient message.
pub struct StatusBarWidget<'a> {
    item_count: usize,
    path_str: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(item_count: usize, path_str: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            item_count,
            path_str,
            theme,
            status_message: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }
}

/// Keep the tail of `s` within `budget` characters, marking the cut.
fn truncate_left(s: &str, budget: usize) -> String {
    let count = s.chars().count();
    if count <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(count - (budget - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);

        if let Some(msg) = self.status_message {
            let style = base.fg(self.theme.success_fg);
            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Hints go first to be dropped on narrow terminals.
        let hints_len = KEY_HINTS.len();
        let show_hints = width >= hints_len + 24;
        let remaining = if show_hints { width - hints_len } else { width };

        let prefix = format!(" Items: {} | ", self.item_count);
        let path_budget = remaining.saturating_sub(prefix.chars().count());
        let path_display = truncate_left(self.path_str, path_budget);

        let used = prefix.chars().count() + path_display.chars().count();
        let mut spans = vec![
            Span::styled(prefix, base.add_modifier(Modifier::BOLD)),
            Span::styled(path_display, base),
            Span::styled(" ".repeat(remaining.saturating_sub(used)), base),
        ];
        if show_hints {
            spans.push(Span::styled(
                KEY_HINTS,
                base.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_normal_bar_rendering() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new(4, "/home/user/project", &tc);

        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 120);
        assert!(content.contains("Items: 4 | /home/user/project"));
        assert!(content.contains("n:new"));
        assert!(content.contains("d:del"));
    }

    #[test]
    fn test_narrow_bar_drops_hints_and_truncates_path() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new(12, "/very/long/path/to/some/deep/folder", &tc);

        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 30);
        assert!(content.starts_with(" Items: 12 | ..."));
        assert!(content.ends_with("folder"));
        assert!(!content.contains("n:new"));
    }

    #[test]
    fn test_status_message_replaces_bar() {
        let tc = theme::dark_theme();
        let widget =
            StatusBarWidget::new(3, "/path", &tc).status_message("Created folder: gamma");

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 80);
        assert!(content.contains("Created folder: gamma"));
        assert!(!content.contains("Items:"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.success_fg);
    }

    #[test]
    fn test_truncate_left() {
        assert_eq!(truncate_left("/a/b", 10), "/a/b");
        assert_eq!(truncate_left("/abcdefgh", 6), "...fgh");
        assert_eq!(truncate_left("/abcdef", 2), "/a");
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new(0, "/path", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
