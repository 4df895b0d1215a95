// Allow dead code: Style functions defined for consistent UI
#![allow(dead_code)]

use ratatui::style::{Color, Modifier, Style};

use crate::state::Theme;

// Accent colors shared by both themes
pub const PRIMARY: Color = Color::Rgb(220, 56, 72);
pub const SUCCESS: Color = Color::Rgb(16, 185, 129);
pub const ERROR: Color = Color::Rgb(239, 68, 68);

fn fg(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::White,
        Theme::Light => Color::Black,
    }
}

fn muted(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Rgb(128, 128, 128),
        Theme::Light => Color::Rgb(96, 96, 96),
    }
}

fn highlight_bg(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Rgb(48, 48, 64),
        Theme::Light => Color::Rgb(220, 220, 232),
    }
}

pub fn title_style(_theme: Theme) -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn text_style(theme: Theme) -> Style {
    Style::default().fg(fg(theme))
}

pub fn muted_style(theme: Theme) -> Style {
    Style::default().fg(muted(theme))
}

pub fn selected_style(theme: Theme) -> Style {
    Style::default()
        .bg(highlight_bg(theme))
        .add_modifier(Modifier::BOLD)
}

pub fn success_style(_theme: Theme) -> Style {
    Style::default().fg(SUCCESS)
}

pub fn error_style(_theme: Theme) -> Style {
    Style::default().fg(ERROR)
}

pub fn border_style(theme: Theme, focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(muted(theme))
    }
}

pub fn status_bar_style(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White),
        Theme::Light => Style::default().bg(Color::Rgb(224, 224, 232)).fg(Color::Black),
    }
}

pub fn help_key_style(_theme: Theme) -> Style {
    Style::default()
        .fg(Color::Rgb(192, 160, 64))
        .add_modifier(Modifier::BOLD)
}
