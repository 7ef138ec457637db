//! Host for the single notification slot.
//!
//! # Design
//! - Render whatever the store's slot holds; there is never more than one.
//! - Arm one timer per notification token and clear by that token only.

use crate::core::notify::Notice;
use crate::core::store::{AppStore, app_dispatch};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use gloo::timers::callback::Timeout;
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(NoticeHost)]
pub(crate) fn notice_host() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let notice = use_selector(|store: &AppStore| store.notice.current().cloned());
    let dispatch = app_dispatch();

    {
        let dispatch = dispatch.clone();
        let armed = (*notice).as_ref().map(|n| (n.token, n.duration_ms));
        use_effect_with_deps(
            move |armed: &Option<(u64, u32)>| {
                let handle = armed.map(|(token, duration_ms)| {
                    Timeout::new(duration_ms, move || {
                        dispatch.reduce_mut(|store| {
                            store.notice.clear(token);
                        });
                    })
                });
                move || drop(handle)
            },
            armed,
        );
    }

    let Some(current) = (*notice).clone() else {
        return html! { <div class="toast-host" aria-live="polite" aria-atomic="true"></div> };
    };

    html! {
        <div class="toast-host" aria-live="polite" aria-atomic="true">
            {render_notice(&current, bundle.text("toast.dismiss", "Dismiss"))}
        </div>
    }
}

fn render_notice(notice: &Notice, dismiss_label: String) -> Html {
    let token = notice.token;
    let on_close = Callback::from(move |_: MouseEvent| {
        app_dispatch().reduce_mut(|store| {
            store.notice.clear(token);
        });
    });

    html! {
        <div class={classes!("toast", notice.kind.class())} role="status">
            <span>{notice.message.clone()}</span>
            <button type="button" class="ghost" aria-label={dismiss_label} onclick={on_close}>{"✕"}</button>
        </div>
    }
}
