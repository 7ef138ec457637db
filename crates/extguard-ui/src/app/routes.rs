//! Routing definitions for the extguard UI.
use yew_router::prelude::*;

#[derive(Clone, Copy, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Manage,
    #[at("/history")]
    History,
    #[at("/check")]
    Check,
    #[not_found]
    #[at("/404")]
    NotFound,
}
