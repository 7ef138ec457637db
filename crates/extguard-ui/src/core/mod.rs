//! Core, DOM-free primitives and helpers for the Web UI.
pub mod auth;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod refresh;
pub mod store;
