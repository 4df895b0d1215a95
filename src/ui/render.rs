use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FormField, Mode};
use crate::utils::{last_updated_line, truncate};

use super::styles;
use super::toast::Toast;

/// Width of the toast stack in the top-right corner.
const TOAST_WIDTH: u16 = 40;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.mode {
        Mode::Login => render_auth_overlay(frame, app, "Login to BLT", false),
        Mode::Signup => render_auth_overlay(frame, app, "Create Account", true),
        Mode::Normal | Mode::Quitting => {}
    }

    render_toasts(frame, app);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let title = "  BLT";

    // The right side mirrors the web header: login/signup buttons for
    // guests, the username plus a logout affordance once signed in.
    let right = match app.username() {
        Some(username) => format!("{}  [o] Logout  [t] Theme", truncate(&username, 24)),
        None => "[l] Login  [s] Sign Up  [t] Theme".to_string(),
    };

    let padding = (area.width as usize)
        .saturating_sub(title.len() + right.len() + 4);

    let line = Line::from(vec![
        Span::styled(title, styles::title_style(theme)),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style(theme)),
        Span::raw("  "),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style(theme));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Bug Logging Tool",
            styles::title_style(theme),
        )),
        Line::from(""),
    ];

    match app.username() {
        Some(username) => {
            lines.push(Line::from(vec![
                Span::styled("  Signed in as ", styles::text_style(theme)),
                Span::styled(username, styles::success_style(theme)),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Press [o] to log out.",
                styles::muted_style(theme),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "  You are browsing as a guest.",
                styles::text_style(theme),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Press [l] to log in or [s] to create an account.",
                styles::muted_style(theme),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  API: {}", app.auth.api().base_url()),
        styles::muted_style(theme),
    )));

    let block = Block::default()
        .borders(Borders::NONE)
        .style(styles::text_style(theme));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let left = match app.last_updated {
        Some(ts) => format!(" {} ", last_updated_line(ts)),
        None => " Last updated: never ".to_string(),
    };
    let right = " [q]uit ";

    let padding = (area.width as usize).saturating_sub(left.len() + right.len());
    let line = Line::from(vec![
        Span::styled(left, styles::muted_style(theme)),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style(theme)),
    ]);

    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style(theme)),
        area,
    );
}

/// Centered modal with the login or signup form. The signup variant adds
/// the username field; everything else is shared.
fn render_auth_overlay(frame: &mut Frame, app: &App, title: &str, with_username: bool) {
    let theme = app.theme;
    let mut height: u16 = if with_username { 13 } else { 11 };
    if app.form_error.is_some() {
        height += 2;
    }
    let area = centered_rect_fixed(46, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", title),
            styles::title_style(theme),
        )),
        Line::from(""),
    ];

    if with_username {
        lines.push(form_field_line(
            app,
            "Username",
            &app.form_username,
            app.form_focus == FormField::Username,
            false,
        ));
    }
    lines.push(form_field_line(
        app,
        "Email   ",
        &app.form_email,
        app.form_focus == FormField::Email,
        false,
    ));
    lines.push(form_field_line(
        app,
        "Password",
        &app.form_password,
        app.form_focus == FormField::Password,
        true,
    ));

    lines.push(Line::from(""));

    let submit_label = if app.auth_pending {
        "   ...     "
    } else if app.form_focus == FormField::Submit {
        " ▶ Submit ◀ "
    } else {
        "   Submit   "
    };
    let submit_style = if app.form_focus == FormField::Submit {
        styles::selected_style(theme)
    } else {
        styles::text_style(theme)
    };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(submit_label, submit_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate(error, 42)),
            styles::error_style(theme),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab: next field   Esc: cancel",
        styles::muted_style(theme),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(theme, true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn form_field_line<'a>(
    app: &App,
    label: &'a str,
    value: &str,
    focused: bool,
    masked: bool,
) -> Line<'a> {
    let theme = app.theme;
    let shown = if masked {
        "*".repeat(value.chars().count().min(24))
    } else {
        truncate(value, 24)
    };
    let field_style = if focused {
        styles::selected_style(theme)
    } else {
        styles::text_style(theme)
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{}: [", label), styles::muted_style(theme)),
        Span::styled(format!("{:<24}{}", shown, cursor), field_style),
        Span::styled("]", styles::muted_style(theme)),
    ])
}

fn render_toasts(frame: &mut Frame, app: &App) {
    let frame_area = frame.area();
    let width = TOAST_WIDTH.min(frame_area.width.saturating_sub(2));
    if width < 8 {
        return;
    }

    for (i, toast) in app.toasts.iter().enumerate() {
        let y = 1 + (i as u16) * 3;
        if y + 3 > frame_area.height {
            break;
        }
        let area = Rect::new(frame_area.width.saturating_sub(width + 2), y, width, 3);
        render_toast(frame, toast, area);
    }
}

fn render_toast(frame: &mut Frame, toast: &Toast, area: Rect) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(toast.kind.color()));

    let text = Line::from(Span::raw(truncate(&toast.message, area.width as usize - 4)));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
