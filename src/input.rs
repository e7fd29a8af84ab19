//! Keyboard handling for every screen and popup.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Popup, QUESTION_FORM_FIELDS};
use crate::models::Screen;

/// Route a key press. Popups take precedence over the active screen.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        if app.screen() == Screen::Login {
            app.should_quit = true;
        }
        return;
    }

    if let Some(popup) = app.popup.take() {
        handle_popup_input(app, popup, key.code);
        return;
    }

    match app.screen() {
        Screen::Login => handle_login_input(app, key.code),
        Screen::Menu => handle_menu_input(app, key.code),
        Screen::Quiz => handle_quiz_input(app, key.code),
        Screen::Admin => handle_admin_input(app, key.code),
    }
}

fn handle_login_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login_toggle_field();
        }
        KeyCode::Char(c) => app.login_push(c),
        KeyCode::Backspace => app.login_pop(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::F(2) => app.submit_register(),
        KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_menu_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Up | KeyCode::Char('k') => app.menu_previous(),
        KeyCode::Enter | KeyCode::Char(' ') => app.start_selected_quiz(),
        KeyCode::Char('a') | KeyCode::Char('A') => app.open_admin(),
        KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Esc => app.logout(),
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.select_option(index);
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => app.skip_question(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.confirm_abort(),
        _ => {}
    }
}

fn handle_admin_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Tab | KeyCode::BackTab => app.admin_toggle_pane(),
        KeyCode::Down | KeyCode::Char('j') => app.admin_move(true),
        KeyCode::Up | KeyCode::Char('k') => app.admin_move(false),
        KeyCode::Char('c') => app.prompt_add_category(),
        KeyCode::Char('a') => app.prompt_add_question(),
        KeyCode::Char('d') | KeyCode::Delete => app.prompt_delete(),
        KeyCode::Char('i') => app.prompt_import(),
        KeyCode::Char('r') => app.show_results(),
        KeyCode::Char('m') => app.open_menu(),
        KeyCode::Char('l') | KeyCode::Esc => app.logout(),
        _ => {}
    }
}

fn handle_popup_input(app: &mut App, popup: Popup, key: KeyCode) {
    match popup {
        Popup::Message { .. } => {
            if !matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.popup = Some(popup);
            }
        }
        Popup::Confirm { prompt, action } => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm(action),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
            _ => app.popup = Some(Popup::Confirm { prompt, action }),
        },
        Popup::Input {
            title,
            mut value,
            action,
        } => match key {
            KeyCode::Enter => app.submit_input(action, value),
            KeyCode::Esc => {}
            other => {
                match other {
                    KeyCode::Char(c) => value.push(c),
                    KeyCode::Backspace => {
                        value.pop();
                    }
                    _ => {}
                }
                app.popup = Some(Popup::Input {
                    title,
                    value,
                    action,
                });
            }
        },
        Popup::QuestionForm(mut form) => {
            let last = QUESTION_FORM_FIELDS.len() - 1;
            match key {
                KeyCode::Esc => return,
                KeyCode::Enter if form.focus == last => {
                    app.submit_question_form(form);
                    return;
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    form.focus = (form.focus + 1).min(last);
                }
                KeyCode::BackTab | KeyCode::Up => {
                    form.focus = form.focus.saturating_sub(1);
                }
                KeyCode::Char(c) => {
                    form.error = None;
                    form.fields[form.focus].push(c);
                }
                KeyCode::Backspace => {
                    form.error = None;
                    form.fields[form.focus].pop();
                }
                _ => {}
            }
            app.popup = Some(Popup::QuestionForm(form));
        }
        Popup::Results { lines, mut scroll } => match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {}
            other => {
                match other {
                    KeyCode::Down | KeyCode::Char('j') => {
                        scroll = (scroll + 1).min(lines.len().saturating_sub(1));
                    }
                    KeyCode::Up | KeyCode::Char('k') => scroll = scroll.saturating_sub(1),
                    _ => {}
                }
                app.popup = Some(Popup::Results { lines, scroll });
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use super::*;
    use crate::config::Config;
    use crate::controller::Controller;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_keyboard_login_and_quiz_abort() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Controller::open(&Config::new(dir.path())).unwrap());

        type_text(&mut app, "admin");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "admin");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Admin);

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.screen(), Screen::Menu);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Quiz);

        press(&mut app, KeyCode::Char('q'));
        assert!(matches!(app.popup, Some(Popup::Confirm { .. })));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen(), Screen::Quiz);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.screen(), Screen::Menu);
    }

    #[test]
    fn test_escape_on_login_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Controller::open(&Config::new(dir.path())).unwrap());
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_add_category_via_input_popup() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Controller::open(&Config::new(dir.path())).unwrap());
        type_text(&mut app, "admin");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "admin");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('c'));
        type_text(&mut app, "Math");
        press(&mut app, KeyCode::Enter);
        assert!(app.popup.is_none());
        assert!(app.controller().categories().contains(&"Math".to_string()));
    }
}
