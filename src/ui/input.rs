//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes. Form
//! submission is wired to the auth controller through `App`, which runs
//! the network call on a background task.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_email_char, can_add_password_char, can_add_username_char, App, FormField, Mode,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.mode {
        Mode::Login => {
            handle_form_input(app, key, false);
            Ok(false)
        }
        Mode::Signup => {
            handle_form_input(app, key, true);
            Ok(false)
        }
        Mode::Normal => handle_normal_input(app, key),
        Mode::Quitting => Ok(true),
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => {
            app.mode = Mode::Quitting;
            return Ok(true);
        }
        KeyCode::Char('l') => {
            if !app.is_authenticated() {
                app.start_login();
            }
        }
        KeyCode::Char('s') => {
            if !app.is_authenticated() {
                app.start_signup();
            }
        }
        KeyCode::Char('o') => {
            if app.is_authenticated() {
                app.request_logout();
            }
        }
        KeyCode::Char('t') => app.toggle_theme(),
        // Escape closes the modal; in normal mode there is nothing to close.
        KeyCode::Esc => {}
        _ => {}
    }
    Ok(false)
}

fn handle_form_input(app: &mut App, key: KeyEvent, with_username: bool) {
    match key.code {
        KeyCode::Esc => app.close_modal(),
        KeyCode::Tab | KeyCode::Down => {
            app.form_focus = next_field(app.form_focus, with_username);
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_focus = prev_field(app.form_focus, with_username);
        }
        KeyCode::Enter => match app.form_focus {
            FormField::Username => app.form_focus = FormField::Email,
            FormField::Email => app.form_focus = FormField::Password,
            FormField::Password | FormField::Submit => {
                if with_username {
                    app.submit_signup();
                } else {
                    app.submit_login();
                }
            }
        },
        KeyCode::Backspace => match app.form_focus {
            FormField::Username => {
                app.form_username.pop();
            }
            FormField::Email => {
                app.form_email.pop();
            }
            FormField::Password => {
                app.form_password.pop();
            }
            FormField::Submit => {}
        },
        KeyCode::Char(c) => match app.form_focus {
            FormField::Username => {
                if can_add_username_char(app.form_username.len()) {
                    app.form_username.push(c);
                }
            }
            FormField::Email => {
                if can_add_email_char(app.form_email.len()) {
                    app.form_email.push(c);
                }
            }
            FormField::Password => {
                if can_add_password_char(app.form_password.len()) {
                    app.form_password.push(c);
                }
            }
            FormField::Submit => {}
        },
        _ => {}
    }
}

fn next_field(current: FormField, with_username: bool) -> FormField {
    match current {
        FormField::Username => FormField::Email,
        FormField::Email => FormField::Password,
        FormField::Password => FormField::Submit,
        FormField::Submit => {
            if with_username {
                FormField::Username
            } else {
                FormField::Email
            }
        }
    }
}

fn prev_field(current: FormField, with_username: bool) -> FormField {
    match current {
        FormField::Username => FormField::Submit,
        FormField::Email => {
            if with_username {
                FormField::Username
            } else {
                FormField::Submit
            }
        }
        FormField::Password => FormField::Email,
        FormField::Submit => FormField::Password,
    }
}
