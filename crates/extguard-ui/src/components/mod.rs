pub(crate) mod auth;
pub(crate) mod confirm;
pub(crate) mod shell;
pub(crate) mod toast;
