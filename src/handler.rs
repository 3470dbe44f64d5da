use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode, DialogKind};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match &app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Dialog(DialogKind::Error { .. }) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.close_dialog();
            }
        }
        AppMode::Dialog(DialogKind::DeleteConfirm { .. }) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_dialog(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        AppMode::Dialog(_) => handle_input_dialog(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('q') => app.quit(),

        KeyCode::Left if alt => app.go_back(),
        KeyCode::Right if alt => app.go_forward(),
        KeyCode::Up if alt => app.go_up(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected(),
        KeyCode::Backspace | KeyCode::Char('b') => app.go_back(),
        KeyCode::Char('f') => app.go_forward(),
        KeyCode::Char('u') | KeyCode::Char('h') | KeyCode::Left => app.go_up(),
        KeyCode::F(5) | KeyCode::Char('r') => app.refresh(),

        KeyCode::Char('n') => app.start_create_folder(),
        KeyCode::F(2) | KeyCode::Char('R') => app.start_rename(),
        KeyCode::Char('d') | KeyCode::Delete => app.start_delete(),
        _ => {}
    }
}

fn handle_input_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_dialog(),
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        KeyCode::Char(c) => app.dialog_input_char(c),
        _ => {}
    }
}

/// Scroll wheel moves the selection; other mouse input is ignored.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::fs::fake::FakeGateway;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers, MouseEvent};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            modifiers,
            ..key(code)
        }
    }

    fn setup_app() -> App {
        let gw = FakeGateway::new(&["/vol"]);
        gw.add_dir("/vol/docs");
        gw.add_dir("/vol/music");
        gw.add_file("/vol/readme.md", 12);
        App::new(Box::new(gw), &AppConfig::default())
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            handle_key_event(app, key(*code));
        }
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(app.should_quit);

        let mut app = setup_app();
        handle_key_event(
            &mut app,
            key_with(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn enter_opens_and_backspace_goes_back() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.location_text(), "/vol");

        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.location_text(), "/vol/docs");

        press(&mut app, &[KeyCode::Backspace]);
        assert_eq!(app.location_text(), "/vol");
        handle_key_event(&mut app, key_with(KeyCode::Right, KeyModifiers::ALT));
        assert_eq!(app.location_text(), "/vol/docs");
    }

    #[test]
    fn u_goes_up() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('u')]);
        assert_eq!(app.location_text(), "This Computer");
    }

    #[test]
    fn j_k_move_selection() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter]);
        press(&mut app, &[KeyCode::Char('j'), KeyCode::Char('j')]);
        assert_eq!(app.selected_index, 2);
        press(&mut app, &[KeyCode::Char('k')]);
        assert_eq!(app.selected_index, 1);
        press(&mut app, &[KeyCode::Char('G')]);
        assert_eq!(app.selected_index, 3);
    }

    #[test]
    fn create_folder_by_typing() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('n')]);
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::CreateDirectory));

        // 'q' inside a dialog is text, not quit.
        press(
            &mut app,
            &[
                KeyCode::Char('q'),
                KeyCode::Char('x'),
                KeyCode::Backspace,
                KeyCode::Enter,
            ],
        );
        assert!(!app.should_quit);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.nav.tree().find_child_by_name(app.view.current, "q").is_some());
    }

    #[test]
    fn esc_cancels_input_dialog() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('n'), KeyCode::Char('z')]);
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.nav.tree().find_child_by_name(app.view.current, "z").is_none());
    }

    #[test]
    fn delete_confirm_with_y_and_cancel_with_n() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::End, KeyCode::Char('d')]);
        assert!(matches!(
            app.mode,
            AppMode::Dialog(DialogKind::DeleteConfirm { .. })
        ));
        press(&mut app, &[KeyCode::Char('n')]);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.item_count(), 3);

        press(&mut app, &[KeyCode::Delete, KeyCode::Char('y')]);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.item_count(), 2);
    }

    #[test]
    fn error_dialog_dismissed_with_enter() {
        let mut app = setup_app();
        // Deleting a drive is refused.
        press(&mut app, &[KeyCode::Char('d')]);
        assert!(matches!(app.mode, AppMode::Dialog(DialogKind::Error { .. })));
        press(&mut app, &[KeyCode::Char('x')]);
        assert!(matches!(app.mode, AppMode::Dialog(DialogKind::Error { .. })));
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn f2_renames_selected() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::End, KeyCode::F(2)]);
        assert_eq!(app.dialog_state.input, "readme.md");
        press(&mut app, &[KeyCode::Home, KeyCode::Char('_'), KeyCode::Enter]);
        let current = app.view.current;
        assert!(app.nav.tree().find_child_by_name(current, "_readme.md").is_some());
        assert!(app.nav.tree().find_child_by_name(current, "readme.md").is_none());
    }

    #[test]
    fn scroll_wheel_moves_selection() {
        let mut app = setup_app();
        press(&mut app, &[KeyCode::Enter]);
        let scroll = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, scroll(MouseEventKind::ScrollDown));
        assert_eq!(app.selected_index, 1);
        handle_mouse_event(&mut app, scroll(MouseEventKind::ScrollUp));
        assert_eq!(app.selected_index, 0);
    }
}
