//! Read-only history of recently touched extensions.
//!
//! # Design
//! - Rebuilt from the fixed and custom endpoints, fetched concurrently.
//! - Refetches only when the `History` revision moves; no polling.

#[cfg(target_arch = "wasm32")]
pub mod api;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
