//! Fixed extension panel.
//!
//! # Design
//! - Render from the shared store cache; only confirmed responses change it.
//! - Each toggle goes through the coordinator, which decides whether a request is sent.
//! - Responses arriving after unmount are dropped via the view scope.

use crate::app::api::ApiCtx;
use crate::core::lifecycle::{LoadPhase, ViewScope};
use crate::core::refresh::Topic;
use crate::core::store::{AppStore, app_dispatch};
use crate::features::fixed::api::{load_fixed, set_blocked};
use crate::features::fixed::logic::ToggleCoordinator;
use crate::features::fixed::state::{
    begin_toggle, fail_toggle, record_confirmed_toggle, set_entries, set_failed, settle_toggle,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use crate::services::api::ApiClient;
use extguard_api_models::ExtensionId;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(FixedExtensionsPanel)]
pub(crate) fn fixed_extensions_panel() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let api_ctx = use_context::<ApiCtx>();
    let dispatch = app_dispatch();
    let fixed = use_selector(|store: &AppStore| store.fixed.clone());
    let revision = use_selector(|store: &AppStore| store.refresh.revision(Topic::FixedList));
    let scope = use_memo(|_| ViewScope::new(), ());
    let coordinator = use_mut_ref(ToggleCoordinator::default);
    let reload = use_state(|| 0_u32);

    {
        let scope = scope.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    scope.close();
                    dispatch.reduce_mut(|store| {
                        store.fixed.pending.clear();
                    });
                }
            },
            (),
        );
    }

    {
        let api_ctx = api_ctx.clone();
        let scope = scope.clone();
        let dispatch = dispatch.clone();
        let bundle = bundle.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    let client = ctx.client.clone();
                    let scope = (*scope).clone();
                    let ticket = scope.begin_load();
                    yew::platform::spawn_local(async move {
                        let result = load_fixed(&client).await;
                        if !scope.accepts(ticket) {
                            return;
                        }
                        match result {
                            Ok(entries) => dispatch.reduce_mut(|store| {
                                set_entries(&mut store.fixed, entries);
                            }),
                            Err(err) => {
                                let message = err.user_message(|key| bundle.lookup(key));
                                dispatch.reduce_mut(|store| {
                                    set_failed(&mut store.fixed, message);
                                    if err.is_unauthorized() {
                                        store.session.expire();
                                    }
                                });
                            }
                        }
                    });
                }
                || ()
            },
            (*revision, *reload),
        );
    }

    let Some(api_ctx) = api_ctx else {
        return html! {
            <section class="panel">
                <p class="error-text">{"Missing API context."}</p>
            </section>
        };
    };

    let on_toggle = {
        let client = api_ctx.client.clone();
        let dispatch = dispatch.clone();
        let coordinator = coordinator.clone();
        let scope = scope.clone();
        let bundle = bundle.clone();
        Callback::from(move |id: ExtensionId| {
            let mut next = (*dispatch.get()).clone();
            let target = begin_toggle(&mut next, &mut coordinator.borrow_mut(), id, &bundle);
            dispatch.set(next);
            let Some(target) = target else {
                return;
            };
            yew::platform::spawn_local(run_toggle(ToggleJob {
                client: client.clone(),
                coordinator: coordinator.clone(),
                scope: (*scope).clone(),
                dispatch: dispatch.clone(),
                bundle: bundle.clone(),
                id,
                target,
            }));
        })
    };

    let retry = {
        let reload = reload.clone();
        Callback::from(move |_: MouseEvent| reload.set(reload.wrapping_add(1)))
    };

    let body = match (&fixed.phase, fixed.entries.is_empty()) {
        (LoadPhase::Loading, true) => html! {
            <p class="muted">{bundle.text("fixed.loading", "Loading…")}</p>
        },
        (LoadPhase::Failed(message), true) => html! {
            <div class="error-text">
                <p>{message.clone()}</p>
                <button type="button" class="ghost" onclick={retry}>{bundle.text("errors.retry", "Retry")}</button>
            </div>
        },
        (_, true) => html! { <p class="muted">{bundle.text("fixed.empty", "")}</p> },
        (_, false) => html! {
            <ul class="chip-list" role="list">
                {for fixed.entries.iter().map(|entry| {
                    let id = entry.id;
                    let pending = fixed.pending.contains(&id);
                    let on_toggle = on_toggle.clone();
                    let onclick = Callback::from(move |_: MouseEvent| on_toggle.emit(id));
                    html! {
                        <li key={id}>
                            <button
                                type="button"
                                role="switch"
                                aria-checked={entry.blocked.to_string()}
                                aria-busy={pending.to_string()}
                                class={classes!("chip", entry.blocked.then_some("is-blocked"), pending.then_some("is-pending"))}
                                title={pending.then(|| bundle.text("fixed.pending", "Saving…"))}
                                onclick={onclick}
                            >
                                {entry.dotted()}
                            </button>
                        </li>
                    }
                })}
            </ul>
        },
    };

    html! {
        <section class="panel fixed-extensions">
            <header>
                <h2>{bundle.text("fixed.title", "Fixed extensions")}</h2>
                <p class="muted">{bundle.text("fixed.body", "")}</p>
            </header>
            {body}
        </section>
    }
}

struct ToggleJob {
    client: Rc<ApiClient>,
    coordinator: Rc<RefCell<ToggleCoordinator>>,
    scope: ViewScope,
    dispatch: Dispatch<AppStore>,
    bundle: TranslationBundle,
    id: ExtensionId,
    target: bool,
}

async fn run_toggle(job: ToggleJob) {
    let ToggleJob {
        client,
        coordinator,
        scope,
        dispatch,
        bundle,
        id,
        mut target,
    } = job;
    loop {
        let result = set_blocked(&client, id, target).await;
        match result {
            Ok(confirmed) => {
                let follow_up = coordinator.borrow_mut().complete(id, confirmed.blocked);
                let live = scope.is_live();
                dispatch.reduce_mut(|store| {
                    record_confirmed_toggle(store, &confirmed);
                    if live && follow_up.is_none() {
                        settle_toggle(store, &confirmed, &bundle);
                    }
                });
                match follow_up {
                    Some(next) if live => target = next,
                    _ => return,
                }
            }
            Err(err) => {
                coordinator.borrow_mut().fail(id);
                if scope.is_live() {
                    dispatch.reduce_mut(|store| fail_toggle(store, id, &err, &bundle));
                }
                return;
            }
        }
    }
}
