use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::ui::keymap::{self, KeyAction};
use crate::ui::App;

pub(crate) async fn handle_key(app: &mut App, key: KeyEvent) {
    app.status = None;

    // Help overlay captures everything while it is open
    if app.handle_help_key(key.code) {
        return;
    }

    let (code, modifiers) = keymap::normalize(key.code, key.modifiers);
    match keymap::resolve(app.mode, code, modifiers) {
        Some(action) => run_action(app, action, modifiers).await,
        None => edit_query(app, code, modifiers),
    }
}

async fn run_action(app: &mut App, action: KeyAction, modifiers: KeyModifiers) {
    match action {
        KeyAction::Move(movement) => app.move_cursor(movement),
        KeyAction::Commit => {
            let target = keymap::commit_target(app.mode, modifiers);
            app.commit_active(target).await;
        }
        KeyAction::ToggleCloseMark => app.toggle_close_mark(),
        KeyAction::CloseActiveTab => app.close_active_tab().await,
        KeyAction::ClosePopup => app.close(),
        KeyAction::Help => app.open_help(),
        KeyAction::ToggleKeyboardMode => app.toggle_keyboard_mode(),
    }
}

fn edit_query(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.enter_char(c)
        }
        KeyCode::Backspace => app.delete_char(),
        _ => {}
    }
}

/// A left click commits the row under the pointer, using the click's
/// modifiers the same way Enter does.
pub(crate) async fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.help.is_some() {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(index) = app.row_at(mouse.column, mouse.row) {
            let target = keymap::commit_target(app.mode, mouse.modifiers);
            app.commit_row(index, target).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::tests::test_app;
    use ratatui::layout::Rect;
    use tabhop_core::dispatcher::{Navigation, OpenTarget};
    use tabhop_core::models::{KeyboardMode, TabId};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[tokio::test]
    async fn test_typing_edits_query() {
        let (mut app, _browser, _dir) = test_app().await;
        for c in ['g', 'i', 'x'] {
            handle_key(&mut app, key(KeyCode::Char(c), KeyModifiers::NONE)).await;
        }
        handle_key(&mut app, key(KeyCode::Backspace, KeyModifiers::NONE)).await;
        assert_eq!(app.query, "gi");
        assert!(app.scheduler.is_pending());
    }

    #[tokio::test]
    async fn test_shifted_letters_type_upper_case() {
        let (mut app, _browser, _dir) = test_app().await;
        handle_key(&mut app, key(KeyCode::Char('g'), KeyModifiers::SHIFT)).await;
        handle_key(&mut app, key(KeyCode::Char('H'), KeyModifiers::NONE)).await;
        assert_eq!(app.query, "GH");
    }

    #[tokio::test]
    async fn test_vi_shift_g_jumps_to_last_row() {
        let (mut app, _browser, _dir) = test_app().await;
        app.mode = KeyboardMode::Vi;
        handle_key(&mut app, key(KeyCode::Char('g'), KeyModifiers::SHIFT)).await;
        assert_eq!(app.query, "");
        assert_eq!(app.list.active_index(), Some(3));
    }

    #[tokio::test]
    async fn test_bound_ctrl_keys_do_not_type() {
        let (mut app, _browser, _dir) = test_app().await;
        handle_key(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL)).await;
        assert_eq!(app.query, "");
        assert!(app.list.rows()[0].marked_for_close);
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let (mut app, _browser, _dir) = test_app().await;
        handle_key(&mut app, key(KeyCode::F(1), KeyModifiers::NONE)).await;
        assert!(app.help.is_some());

        handle_key(&mut app, key(KeyCode::Char('a'), KeyModifiers::NONE)).await;
        handle_key(&mut app, key(KeyCode::Enter, KeyModifiers::NONE)).await;
        assert_eq!(app.query, "");
        assert!(app.is_open());

        handle_key(&mut app, key(KeyCode::Esc, KeyModifiers::NONE)).await;
        assert!(app.help.is_none());
        // Esc on the main list closes the popup
        handle_key(&mut app, key(KeyCode::Esc, KeyModifiers::NONE)).await;
        assert!(!app.is_open());
    }

    #[tokio::test]
    async fn test_f2_switches_mode_and_keymap() {
        let (mut app, _browser, _dir) = test_app().await;
        handle_key(&mut app, key(KeyCode::Char('j'), KeyModifiers::CONTROL)).await;
        assert_eq!(app.list.active_index(), Some(0));

        handle_key(&mut app, key(KeyCode::F(2), KeyModifiers::NONE)).await;
        assert_eq!(app.mode, KeyboardMode::Vi);
        handle_key(&mut app, key(KeyCode::Char('j'), KeyModifiers::CONTROL)).await;
        assert_eq!(app.list.active_index(), Some(1));
    }

    #[tokio::test]
    async fn test_ctrl_enter_opens_background_tab() {
        let (mut app, browser, _dir) = test_app().await;
        handle_key(&mut app, key(KeyCode::Down, KeyModifiers::NONE)).await;
        handle_key(&mut app, key(KeyCode::Enter, KeyModifiers::CONTROL)).await;

        let report = app.last_commit.clone().unwrap();
        assert_eq!(report.target, Some(OpenTarget::NewTab { background: true }));
        assert!(matches!(report.navigation, Some(Navigation::OpenedTab(_))));
        assert!(!app.is_open());
        assert_eq!(browser.snapshot().windows[0].tabs.len(), 4);
    }

    #[tokio::test]
    async fn test_click_commits_row_under_pointer() {
        let (mut app, _browser, _dir) = test_app().await;
        app.list_area = Rect::new(0, 3, 80, 10);
        app.viewport.height = 10;

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, click).await;

        let report = app.last_commit.clone().unwrap();
        assert_eq!(report.navigation, Some(Navigation::Focused(TabId(3))));
        assert!(!app.is_open());
    }
}
