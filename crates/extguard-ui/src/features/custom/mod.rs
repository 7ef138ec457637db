//! Custom extension list and the add form.
//!
//! # Design
//! - Validation happens before any request; the backend stays authoritative.
//! - Adds publish `CustomAdded`; deletes update the cache in place and publish `CustomDeleted`.

#[cfg(target_arch = "wasm32")]
pub mod api;
pub mod form;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
