//! Client-side extension rules.
//!
//! # Design
//! - Validation runs before any request; the server stays authoritative.
//! - Each error carries an i18n key so the UI can localise it while the CLI
//!   prints the English `Display` text.

use thiserror::Error;

/// Maximum length of an extension name.
pub const MAX_EXTENSION_LEN: usize = 20;

/// Server-side cap on custom extensions. Clients display it, never enforce it.
pub const MAX_CUSTOM_EXTENSIONS: usize = 200;

/// Reasons a raw extension input is rejected before submission.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ExtensionInputError {
    /// Nothing left after trimming and stripping the leading dot.
    #[error("enter an extension")]
    Empty,
    /// Longer than [`MAX_EXTENSION_LEN`] characters.
    #[error("extensions can be at most 20 characters")]
    TooLong,
    /// Contains something other than ASCII letters and digits.
    #[error("only letters and digits are allowed")]
    InvalidCharacters,
}

impl ExtensionInputError {
    /// Translation key for the message.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Empty => "input.error_empty",
            Self::TooLong => "input.error_too_long",
            Self::InvalidCharacters => "input.error_charset",
        }
    }
}

/// Validate raw user input and return the normalised (lowercase) extension.
///
/// A single leading dot is ignored, so `".PDF"` becomes `pdf`. Surrounding
/// whitespace is not stripped: `" zip"` is rejected like any other symbol.
///
/// # Errors
/// Returns an [`ExtensionInputError`] when the input is blank, longer than
/// [`MAX_EXTENSION_LEN`], or not purely ASCII alphanumeric.
pub fn validate_extension_input(raw: &str) -> Result<String, ExtensionInputError> {
    if raw.trim().is_empty() {
        return Err(ExtensionInputError::Empty);
    }
    let bare = raw.strip_prefix('.').unwrap_or(raw);
    if bare.is_empty() {
        return Err(ExtensionInputError::Empty);
    }
    if bare.chars().count() > MAX_EXTENSION_LEN {
        return Err(ExtensionInputError::TooLong);
    }
    if !bare.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(ExtensionInputError::InvalidCharacters);
    }
    Ok(bare.to_ascii_lowercase())
}

/// Extension of a file name: the text after the last dot.
///
/// Empty when there is no dot, when the only dot leads the name (`.bashrc`),
/// or when the name ends with a dot.
#[must_use]
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => &name[idx + 1..],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_alphanumeric_up_to_limit() {
        assert_eq!(validate_extension_input("zip"), Ok("zip".to_string()));
        assert_eq!(validate_extension_input("Mp4"), Ok("mp4".to_string()));
        assert_eq!(validate_extension_input("a"), Ok("a".to_string()));
        let twenty = "a".repeat(20);
        assert_eq!(validate_extension_input(&twenty), Ok(twenty.clone()));
    }

    #[test]
    fn strips_single_leading_dot_only() {
        assert_eq!(validate_extension_input(".PDF"), Ok("pdf".to_string()));
        assert_eq!(
            validate_extension_input("..pdf"),
            Err(ExtensionInputError::InvalidCharacters)
        );
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        for bad in [" zip", "zip ", "\tzip\n", " .pdf"] {
            assert_eq!(
                validate_extension_input(bad),
                Err(ExtensionInputError::InvalidCharacters),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_long_and_symbols() {
        assert_eq!(validate_extension_input(""), Err(ExtensionInputError::Empty));
        assert_eq!(validate_extension_input("   "), Err(ExtensionInputError::Empty));
        assert_eq!(validate_extension_input("."), Err(ExtensionInputError::Empty));
        assert_eq!(
            validate_extension_input(&"b".repeat(21)),
            Err(ExtensionInputError::TooLong)
        );
        for bad in ["tar.gz", "ex e", "exe!", "한글", "a_b", "a-b"] {
            assert_eq!(
                validate_extension_input(bad),
                Err(ExtensionInputError::InvalidCharacters),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn error_messages_are_non_empty() {
        for err in [
            ExtensionInputError::Empty,
            ExtensionInputError::TooLong,
            ExtensionInputError::InvalidCharacters,
        ] {
            assert!(!err.to_string().is_empty());
            assert!(err.message_key().starts_with("input."));
        }
    }

    #[test]
    fn file_extension_follows_last_dot() {
        assert_eq!(file_extension("malware.exe"), "exe");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".bashrc"), "");
        assert_eq!(file_extension("trailing."), "");
        assert_eq!(file_extension(""), "");
    }
}
