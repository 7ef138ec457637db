//! Command handlers grouped by concern.

pub(crate) mod extensions;
pub(crate) mod files;
pub(crate) mod session;
