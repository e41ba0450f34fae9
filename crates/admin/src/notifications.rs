//! Broadcast notifications composed by operators.
//!
//! There is no delivery channel yet: a valid notification is recorded in
//! the log and echoed back, and the composer resets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopdesk_core::{NotificationAudience, NotificationKind};
use tracing::info;

use crate::forms::FormError;

/// Longest accepted title, in characters.
pub const MAX_TITLE_CHARS: usize = 120;

/// Notification being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub audience: NotificationAudience,
}

/// A notification accepted for sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub audience: NotificationAudience,
    pub sent_at: DateTime<Utc>,
}

impl NotificationDraft {
    /// # Errors
    ///
    /// Returns `FormError::Required` for a blank title or message and
    /// `FormError::Invalid` for an overlong title.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::Required("title"));
        }
        if self.title.trim().chars().count() > MAX_TITLE_CHARS {
            return Err(FormError::Invalid {
                field: "title",
                reason: format!("must be at most {MAX_TITLE_CHARS} characters"),
            });
        }
        if self.message.trim().is_empty() {
            return Err(FormError::Required("message"));
        }
        Ok(())
    }
}

/// Composer state: the draft plus the last notification sent.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: NotificationDraft,
    last_sent: Option<Notification>,
}

impl Composer {
    #[must_use]
    pub fn new(draft: NotificationDraft) -> Self {
        Self {
            draft,
            last_sent: None,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &NotificationDraft {
        &self.draft
    }

    #[must_use]
    pub const fn last_sent(&self) -> Option<&Notification> {
        self.last_sent.as_ref()
    }

    /// Validate and record the draft, then reset to a blank draft.
    ///
    /// # Errors
    ///
    /// Returns the validation error; the draft is kept.
    pub fn send(&mut self) -> Result<&Notification, FormError> {
        self.draft.validate()?;

        let draft = std::mem::take(&mut self.draft);
        let notification = Notification {
            title: draft.title.trim().to_string(),
            message: draft.message.trim().to_string(),
            kind: draft.kind,
            audience: draft.audience,
            sent_at: Utc::now(),
        };
        info!(
            title = %notification.title,
            kind = ?notification.kind,
            audience = ?notification.audience,
            "Notification sent"
        );

        Ok(self.last_sent.insert(notification))
    }
}
