//! Fixed extension toggles.
//!
//! # Design
//! - Fetch on mount and on `FixedList` revisions; never poll.
//! - Toggles are gated on the session and serialised per extension.
//! - HTTP calls stay in this feature's `api` module.

#[cfg(target_arch = "wasm32")]
pub mod api;
pub mod logic;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
