//! Feature slices: one module per screen section.
pub mod checker;
pub mod custom;
pub mod fixed;
pub mod history;
