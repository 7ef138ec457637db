//! Browser-side transport for the extguard backend.

pub mod api;
