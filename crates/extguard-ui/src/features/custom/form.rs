//! Add-extension form state.
//!
//! Keeps the raw text exactly as typed; validation runs on submit only and
//! never touches the field.

use extguard_api_models::{ExtensionInputError, validate_extension_input};

/// Editable form state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddFormState {
    /// Raw input.
    pub value: String,
    /// Inline validation error from the last submit.
    pub error: Option<ExtensionInputError>,
    /// Whether a create request is in flight.
    pub submitting: bool,
}

impl AddFormState {
    /// Replace the input text and clear a stale validation error.
    pub fn edit(&mut self, value: String) {
        self.value = value;
        self.error = None;
    }

    /// Validate the input and, when valid, enter the submitting state.
    ///
    /// Returns the normalised extension to send. `None` means nothing may be
    /// sent: either validation failed (see `error`) or a request is in flight.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.submitting {
            return None;
        }
        match validate_extension_input(&self.value) {
            Ok(extension) => {
                self.error = None;
                self.submitting = true;
                Some(extension)
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    /// The backend created the extension: clear the field.
    pub fn succeed(&mut self) {
        self.value.clear();
        self.error = None;
        self.submitting = false;
    }

    /// The backend refused: keep the input so the user can fix it.
    pub const fn fail(&mut self) {
        self.submitting = false;
    }
}
