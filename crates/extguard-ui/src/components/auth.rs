//! Session bar: sign-in affordance or the signed-in user's name.

use crate::core::auth::SessionState;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct SessionBarProps {
    pub(crate) session: SessionState,
    pub(crate) on_login: Callback<()>,
    pub(crate) on_logout: Callback<()>,
}

#[function_component(SessionBar)]
pub(crate) fn session_bar(props: &SessionBarProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let login = {
        let on_login = props.on_login.clone();
        Callback::from(move |_: MouseEvent| on_login.emit(()))
    };
    let logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    match &props.session {
        SessionState::Checking => html! {
            <div class="session-bar muted">{bundle.text("auth.checking", "Checking session…")}</div>
        },
        SessionState::Anonymous => html! {
            <div class="session-bar">
                <span class="muted">{bundle.text("auth.anonymous", "")}</span>
                <button type="button" class="solid" onclick={login}>
                    {bundle.text("auth.sign_in", "Sign in with Google")}
                </button>
            </div>
        },
        SessionState::Authenticated(profile) => html! {
            <div class="session-bar">
                {if let Some(picture) = &profile.picture {
                    html! { <img class="avatar" src={picture.clone()} alt="" referrerpolicy="no-referrer" /> }
                } else { html! {} }}
                <span>{bundle.format("auth.signed_in_as", "{name}", &[("name", profile.name.as_str())])}</span>
                <button type="button" class="ghost" onclick={logout}>
                    {bundle.text("auth.sign_out", "Sign out")}
                </button>
            </div>
        },
    }
}
