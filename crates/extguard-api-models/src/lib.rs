#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::cargo, clippy::nursery)]
//! Shared HTTP DTOs for the extguard block-list API.
//!
//! Both the web UI and the CLI decode the backend envelope through these
//! types and apply the same client-side rules (input validation, CSRF
//! header plumbing, history ordering) so the two surfaces cannot drift.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod csrf;
pub mod history;
pub mod paths;
pub mod validation;

pub use validation::{
    ExtensionInputError, MAX_CUSTOM_EXTENSIONS, MAX_EXTENSION_LEN, file_extension,
    validate_extension_input,
};

/// Backend identifier for an extension row.
pub type ExtensionId = i64;

/// A single block-list entry, either pre-seeded (`fixed`) or user-added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Backend-assigned identifier.
    pub id: ExtensionId,
    /// Normalised lowercase extension without the leading dot.
    pub extension: String,
    /// Whether the entry belongs to the pre-seeded fixed set.
    pub fixed: bool,
    /// Whether the entry currently blocks uploads.
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display name of the user who created the entry.
    pub created_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display name of the user who last changed the entry.
    pub updated_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Creation timestamp (server local time).
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Last mutation timestamp (server local time).
    pub updated_at: Option<NaiveDateTime>,
}

impl Extension {
    /// Extension rendered with its leading dot (`.exe`).
    #[must_use]
    pub fn dotted(&self) -> String {
        format!(".{}", self.extension)
    }

    /// Copy the mutable fields (`blocked` + provenance) from a server echo.
    ///
    /// Identity fields are left untouched; a fixed entry never changes its
    /// id, name, or category.
    pub fn absorb(&mut self, confirmed: &Self) {
        self.blocked = confirmed.blocked;
        self.updated_at = confirmed.updated_at;
        self.updated_by_name.clone_from(&confirmed.updated_by_name);
    }
}

/// Standard `{success, message, data}` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Whether the backend considers the call successful.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Human-readable message, populated on failures.
    pub message: Option<String>,
    #[serde(default)]
    /// Payload; absent for void operations.
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Build a successful envelope around a payload.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Build a failed envelope carrying a backend message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Loose view over an error body; only the message is of interest.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApiMessage {
    #[serde(default)]
    /// Backend-provided message, if any.
    pub message: Option<String>,
}

impl ApiMessage {
    /// Extract a non-blank message from a raw response body.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
    }
}

/// Profile of the signed-in user as exposed by the session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// E-mail address reported by the identity provider.
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Avatar URL.
    pub picture: Option<String>,
}
