use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::dialog::DialogWidget;
use crate::components::listing::{self, ListingWidget};
use crate::components::status_bar::StatusBarWidget;
use crate::components::toolbar::ToolbarWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let block = Block::default()
        .title(format!(" {} ", app.current_node().name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));

    // Keep the selected row visible.
    let inner = block.inner(chunks[1]);
    app.update_scroll(listing::body_height(inner.width, inner.height));

    let crumbs: Vec<String> = app
        .nav
        .ancestors(app.view.current)
        .into_iter()
        .map(|id| app.nav.tree().node(id).name.clone())
        .collect();
    let toolbar = ToolbarWidget::new(&crumbs, &app.theme).availability(
        app.view.can_go_back,
        app.view.can_go_forward,
        app.view.can_go_up,
    );
    frame.render_widget(toolbar, chunks[0]);

    let listing = ListingWidget::new(app.nav.tree(), &app.view.entries, &app.theme)
        .selection(app.selected_index, app.scroll_offset)
        .icons(app.use_icons)
        .date_format(&app.date_format)
        .block(block);
    frame.render_widget(listing, chunks[1]);

    let location = app.location_text();
    let mut status = StatusBarWidget::new(app.item_count(), &location, &app.theme);
    if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg);
    }
    frame.render_widget(status, chunks[2]);

    if app.mode != AppMode::Normal {
        let dialog = DialogWidget::new(&app.mode, &app.dialog_state, &app.theme);
        frame.render_widget(dialog, area);
    }
}
