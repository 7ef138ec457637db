//! Single-slot notification channel.
//!
//! # Design
//! - At most one notification is visible; `show` replaces whatever is there.
//! - Every notification gets a fresh token and clearing is keyed by it, so a
//!   timer armed for an older notification can never clear a newer one.

/// Default visibility window.
pub const DEFAULT_NOTICE_MS: u32 = 3_000;

/// Visual category of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral information.
    Info,
    /// Completed action.
    Success,
    /// Needs attention, nothing failed.
    Warning,
    /// Failed action.
    Error,
}

impl NoticeKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A visible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Token minted when the notification was shown.
    pub token: u64,
    /// Text to display.
    pub message: String,
    /// Category.
    pub kind: NoticeKind,
    /// How long it stays up, in milliseconds.
    pub duration_ms: u32,
}

/// The process-wide slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationSlot {
    current: Option<Notice>,
    last_token: u64,
}

impl NotificationSlot {
    /// Show a notification for [`DEFAULT_NOTICE_MS`].
    pub fn show(&mut self, message: impl Into<String>, kind: NoticeKind) -> u64 {
        self.show_for(message, kind, DEFAULT_NOTICE_MS)
    }

    /// Show a notification for a custom duration, replacing the current one.
    pub fn show_for(&mut self, message: impl Into<String>, kind: NoticeKind, duration_ms: u32) -> u64 {
        self.last_token = self.last_token.wrapping_add(1);
        self.current = Some(Notice {
            token: self.last_token,
            message: message.into(),
            kind,
            duration_ms,
        });
        self.last_token
    }

    /// Clear the slot if `token` still identifies the visible notification.
    pub fn clear(&mut self, token: u64) -> bool {
        if self.current.as_ref().is_some_and(|notice| notice.token == token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Currently visible notification.
    #[must_use]
    pub const fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
