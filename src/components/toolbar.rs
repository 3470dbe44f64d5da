use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Back / Forward / Up indicators followed by the breadcrumb of the
/// current location.
pub struct ToolbarWidget<'a> {
    can_go_back: bool,
    can_go_forward: bool,
    can_go_up: bool,
    crumbs: &'a [String],
    theme: &'a ThemeColors,
}

impl<'a> ToolbarWidget<'a> {
    pub fn new(crumbs: &'a [String], theme: &'a ThemeColors) -> Self {
        Self {
            can_go_back: false,
            can_go_forward: false,
            can_go_up: false,
            crumbs,
            theme,
        }
    }

    pub fn availability(mut self, back: bool, forward: bool, up: bool) -> Self {
        self.can_go_back = back;
        self.can_go_forward = forward;
        self.can_go_up = up;
        self
    }

    fn button(&self, label: &'static str, enabled: bool) -> Span<'static> {
        let style = if enabled {
            Style::default()
                .fg(self.theme.list_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM)
        };
        Span::styled(label, style)
    }
}

impl<'a> Widget for ToolbarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let sep = Style::default().fg(self.theme.border_fg);
        let mut spans = vec![
            self.button(" < Back ", self.can_go_back),
            self.button(" > Forward ", self.can_go_forward),
            self.button(" ^ Up ", self.can_go_up),
            Span::styled("│ ", sep),
        ];

        let last = self.crumbs.len().saturating_sub(1);
        for (i, crumb) in self.crumbs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" › ", sep));
            }
            let style = if i == last {
                Style::default()
                    .fg(self.theme.dir_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.list_fg)
            };
            spans.push(Span::styled(crumb.clone(), style));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
