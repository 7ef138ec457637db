//! Custom extension list, delete confirmation and the add form.

use crate::app::api::ApiCtx;
use crate::components::confirm::ConfirmDialog;
use crate::core::auth::{MutationGate, gate_mutation};
use crate::core::lifecycle::{LoadPhase, ViewScope};
use crate::core::notify::NoticeKind;
use crate::core::refresh::{ChangeEvent, Topic};
use crate::core::store::{AppStore, app_dispatch, prompt_login, report_failure};
use crate::features::custom::api::{add_extension, load_custom, remove_extension};
use crate::features::custom::state::{
    cancel_delete, confirm_delete, fail_delete, finish_delete, record_add_failed, record_created,
    request_delete, select_count, set_entries, set_failed,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use extguard_api_models::{ExtensionId, MAX_EXTENSION_LEN};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yewdux::prelude::use_selector;

fn use_bundle() -> TranslationBundle {
    use_context::<TranslationBundle>().unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE))
}

/// Input plus submit button for new custom extensions.
#[function_component(AddExtensionForm)]
pub(crate) fn add_extension_form() -> Html {
    let bundle = use_bundle();
    let api_ctx = use_context::<ApiCtx>();
    let dispatch = app_dispatch();
    let form = use_selector(|store: &AppStore| store.add_form.clone());

    {
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    dispatch.reduce_mut(|store| store.add_form.fail());
                }
            },
            (),
        );
    }

    let on_input = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            dispatch.reduce_mut(move |store| store.add_form.edit(value));
        })
    };

    let on_submit = {
        let dispatch = dispatch.clone();
        let bundle = bundle.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(ctx) = api_ctx.clone() else {
                return;
            };
            let mut form = dispatch.get().add_form.clone();
            let Some(extension) = form.begin_submit() else {
                dispatch.reduce_mut(move |store| store.add_form = form);
                return;
            };
            if gate_mutation(&dispatch.get().session) == MutationGate::LoginRequired {
                form.fail();
                dispatch.reduce_mut(|store| {
                    store.add_form = form;
                    prompt_login(store, &bundle);
                });
                return;
            }
            dispatch.reduce_mut(move |store| store.add_form = form);
            let dispatch = dispatch.clone();
            let bundle = bundle.clone();
            yew::platform::spawn_local(async move {
                match add_extension(&ctx.client, &extension).await {
                    Ok(created) => {
                        dispatch.reduce_mut(move |store| record_created(store, created, &bundle));
                    }
                    Err(err) => {
                        dispatch.reduce_mut(|store| record_add_failed(store, &err, &bundle));
                    }
                }
            });
        })
    };

    let error = form
        .error
        .map(|err| bundle.text(err.message_key(), &err.to_string()));
    let submit_label = if form.submitting {
        bundle.text("input.submitting", "Adding…")
    } else {
        bundle.text("input.submit", "Add")
    };

    html! {
        <form class="add-extension" onsubmit={on_submit} novalidate=true>
            <label for="custom-extension-input">{bundle.text("input.label", "Extension")}</label>
            <div class="input-row">
                <input
                    id="custom-extension-input"
                    type="text"
                    autocomplete="off"
                    maxlength={(MAX_EXTENSION_LEN + 1).to_string()}
                    placeholder={bundle.text("input.placeholder", "e.g. sh")}
                    value={form.value.clone()}
                    aria-invalid={error.is_some().to_string()}
                    oninput={on_input}
                />
                <button type="submit" class="primary" disabled={form.submitting}>{submit_label}</button>
            </div>
            if let Some(message) = error {
                <p class="error-text" role="alert">{message}</p>
            }
        </form>
    }
}

/// Custom extension chips with delete buttons and a live count.
#[function_component(CustomExtensionsPanel)]
pub(crate) fn custom_extensions_panel() -> Html {
    let bundle = use_bundle();
    let api_ctx = use_context::<ApiCtx>();
    let dispatch = app_dispatch();
    let custom = use_selector(|store: &AppStore| store.custom.clone());
    let revision = use_selector(|store: &AppStore| store.refresh.revision(Topic::CustomList));
    let scope = use_memo(|_| ViewScope::new(), ());
    let reload = use_state(|| 0_u32);

    {
        let scope = scope.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    scope.close();
                    dispatch.reduce_mut(|store| {
                        store.custom.pending_delete = None;
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
                    let scope = (*scope).clone();
                    let ticket = scope.begin_load();
                    yew::platform::spawn_local(async move {
                        let result = load_custom(&ctx.client).await;
                        if !scope.accepts(ticket) {
                            return;
                        }
                        match result {
                            Ok(entries) => dispatch.reduce_mut(|store| {
                                set_entries(&mut store.custom, entries);
                            }),
                            Err(err) => {
                                let message = err.user_message(|key| bundle.lookup(key));
                                dispatch.reduce_mut(|store| {
                                    set_failed(&mut store.custom, message);
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

    let on_delete = {
        let dispatch = dispatch.clone();
        let bundle = bundle.clone();
        Callback::from(move |id: ExtensionId| {
            if gate_mutation(&dispatch.get().session) == MutationGate::LoginRequired {
                dispatch.reduce_mut(|store| prompt_login(store, &bundle));
                return;
            }
            dispatch.reduce_mut(|store| {
                request_delete(&mut store.custom, id);
            });
        })
    };

    let on_cancel = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| dispatch.reduce_mut(|store| cancel_delete(&mut store.custom)))
    };

    let on_confirm = {
        let dispatch = dispatch.clone();
        let bundle = bundle.clone();
        let scope = scope.clone();
        let api_ctx = api_ctx.clone();
        Callback::from(move |()| {
            let Some(ctx) = api_ctx.clone() else {
                return;
            };
            let mut snapshot = dispatch.get().custom.clone();
            let Some(id) = confirm_delete(&mut snapshot) else {
                return;
            };
            dispatch.reduce_mut(move |store| store.custom = snapshot);
            let dispatch = dispatch.clone();
            let bundle = bundle.clone();
            let scope = (*scope).clone();
            yew::platform::spawn_local(async move {
                let result = remove_extension(&ctx.client, id).await;
                if !scope.is_live() {
                    return;
                }
                match result {
                    Ok(()) => dispatch.reduce_mut(|store| {
                        if let Some(removed) = finish_delete(&mut store.custom, id) {
                            store.notice.show(
                                bundle.format(
                                    "custom.deleted",
                                    "{ext}",
                                    &[("ext", &removed.dotted())],
                                ),
                                NoticeKind::Success,
                            );
                        }
                        store.refresh.publish(ChangeEvent::CustomDeleted);
                    }),
                    Err(err) => dispatch.reduce_mut(|store| {
                        fail_delete(&mut store.custom, id);
                        report_failure(store, &err, &bundle);
                    }),
                }
            });
        })
    };

    let retry = {
        let reload = reload.clone();
        Callback::from(move |_: MouseEvent| reload.set(reload.wrapping_add(1)))
    };

    let (count, cap) = select_count(&custom);
    let count_label = bundle.format(
        "custom.count",
        "{count} / {max}",
        &[("count", &count.to_string()), ("max", &cap.to_string())],
    );

    let body = match (&custom.phase, custom.entries.is_empty()) {
        (LoadPhase::Loading, true) => html! {
            <p class="muted">{bundle.text("custom.loading", "Loading…")}</p>
        },
        (LoadPhase::Failed(message), true) => html! {
            <div class="error-text">
                <p>{message.clone()}</p>
                <button type="button" class="ghost" onclick={retry}>{bundle.text("errors.retry", "Retry")}</button>
            </div>
        },
        (_, true) => html! { <p class="muted">{bundle.text("custom.empty", "")}</p> },
        (_, false) => html! {
            <ul class="chip-list" role="list">
                {for custom.entries.iter().map(|entry| {
                    let id = entry.id;
                    let dotted = entry.dotted();
                    let busy = custom
                        .pending_delete
                        .as_ref()
                        .is_some_and(|pending| pending.id == id && pending.in_flight);
                    let on_delete = on_delete.clone();
                    html! {
                        <li key={id} class={classes!("chip", "is-custom", busy.then_some("is-pending"))}>
                            <span>{dotted.clone()}</span>
                            <button
                                type="button"
                                class="chip-remove"
                                aria-label={bundle.format("custom.delete", "Delete {ext}", &[("ext", &dotted)])}
                                disabled={busy}
                                onclick={Callback::from(move |_: MouseEvent| on_delete.emit(id))}
                            >
                                {"×"}
                            </button>
                        </li>
                    }
                })}
            </ul>
        },
    };

    let dialog = custom.pending_delete.as_ref().map(|pending| {
        let ext = format!(".{}", pending.extension);
        html! {
            <ConfirmDialog
                title={bundle.text("custom.confirm_title", "Delete extension?")}
                body={bundle.format("custom.confirm_body", "{ext}", &[("ext", &ext)])}
                confirm_label={bundle.text("custom.confirm", "Delete")}
                cancel_label={bundle.text("custom.cancel", "Cancel")}
                busy={pending.in_flight}
                on_confirm={on_confirm.clone()}
                on_cancel={on_cancel.clone()}
            />
        }
    });

    html! {
        <section class="panel custom-extensions">
            <header>
                <h2>{bundle.text("custom.title", "Custom extensions")}</h2>
                <p class="muted">{bundle.text("custom.body", "")}</p>
                <span class="count" aria-live="polite">{count_label}</span>
            </header>
            <AddExtensionForm />
            {body}
            {for dialog}
        </section>
    }
}
