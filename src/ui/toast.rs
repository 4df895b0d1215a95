//! Auto-dismissing toast notifications.

use std::time::{Duration, Instant};

use ratatui::style::Color;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Severity of a toast, which picks its accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn color(&self) -> Color {
        match self {
            ToastKind::Info => Color::Rgb(59, 130, 246),
            ToastKind::Success => Color::Rgb(16, 185, 129),
            ToastKind::Error => Color::Rgb(239, 68, 68),
        }
    }
}

/// A transient notification shown stacked in the top-right corner.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= TOAST_DURATION
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
