//! Upload check: pick or drop a file, ask the backend, show the verdict.

use crate::app::api::ApiCtx;
use crate::core::lifecycle::ViewScope;
use crate::core::notify::NoticeKind;
use crate::core::store::{AppStore, app_dispatch, report_failure};
use crate::features::checker::api::is_blocked;
use crate::features::checker::state::{
    CheckRefused, CheckVerdict, begin_check, clear_selection, fail_check, finish_check,
    select_file,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use web_sys::{DragEvent, File, HtmlInputElement};
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(FileChecker)]
pub(crate) fn file_checker() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let api_ctx = use_context::<ApiCtx>();
    let dispatch = app_dispatch();
    let checker = use_selector(|store: &AppStore| store.checker.clone());
    let file_ref = use_mut_ref(|| None::<File>);
    let scope = use_memo(|_| ViewScope::new(), ());
    let dragging = use_state(|| false);

    {
        let scope = scope.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    scope.close();
                    dispatch.reduce_mut(|store| clear_selection(&mut store.checker));
                }
            },
            (),
        );
    }

    let choose = {
        let dispatch = dispatch.clone();
        let file_ref = file_ref.clone();
        Callback::from(move |file: File| {
            let name = file.name();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let size = file.size() as u64;
            *file_ref.borrow_mut() = Some(file);
            dispatch.reduce_mut(move |store| {
                select_file(&mut store.checker, &name, size);
            });
        })
    };

    let on_change = {
        let choose = choose.clone();
        Callback::from(move |event: Event| {
            let input = event.target_unchecked_into::<HtmlInputElement>();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                choose.emit(file);
            }
            // Picking the same file again must still fire `change`.
            input.set_value("");
        })
    };

    let on_drag_over = {
        let dragging = dragging.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            dragging.set(true);
        })
    };

    let on_drag_leave = {
        let dragging = dragging.clone();
        Callback::from(move |_: DragEvent| dragging.set(false))
    };

    let on_drop = {
        let dragging = dragging.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            dragging.set(false);
            let file = event
                .data_transfer()
                .and_then(|transfer| transfer.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                choose.emit(file);
            }
        })
    };

    let on_check = {
        let dispatch = dispatch.clone();
        let bundle = bundle.clone();
        let file_ref = file_ref.clone();
        let scope = scope.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(ctx) = api_ctx.clone() else {
                return;
            };
            let file = file_ref.borrow().clone();
            let mut snapshot = dispatch.get().checker.clone();
            if file.is_none() {
                clear_selection(&mut snapshot);
            }
            let seq = match begin_check(&mut snapshot) {
                Ok(seq) => seq,
                Err(CheckRefused::NoSelection) => {
                    let message = bundle.text("checker.no_file", "Choose a file first.");
                    dispatch.reduce_mut(move |store| {
                        store.checker = snapshot;
                        store.notice.show(message, NoticeKind::Warning);
                    });
                    return;
                }
                Err(CheckRefused::Busy) => return,
            };
            let Some(file) = file else {
                return;
            };
            dispatch.reduce_mut(move |store| store.checker = snapshot);
            let dispatch = dispatch.clone();
            let bundle = bundle.clone();
            let scope = (*scope).clone();
            yew::platform::spawn_local(async move {
                let result = is_blocked(&ctx.client, &file).await;
                if !scope.is_live() {
                    return;
                }
                match result {
                    Ok(blocked) => {
                        let (message, kind) = verdict_notice(&bundle, &file.name(), blocked);
                        dispatch.reduce_mut(move |store| {
                            if finish_check(&mut store.checker, seq, blocked) {
                                store.notice.show(message, kind);
                            }
                        });
                    }
                    Err(err) => dispatch.reduce_mut(|store| {
                        if fail_check(&mut store.checker, seq) {
                            report_failure(store, &err, &bundle);
                        }
                    }),
                }
            });
        })
    };

    let selected = checker.selected.as_ref().map(|file| {
        let ext = if file.extension.is_empty() {
            bundle.text("checker.no_extension", "no extension")
        } else {
            format!(".{}", file.extension)
        };
        html! {
            <p class="selected-file">
                <strong>{file.name.clone()}</strong>
                <span class="muted">{format!(" · {ext} · {} B", file.size)}</span>
            </p>
        }
    });

    let verdict = checker.verdict.as_ref().map(|verdict| match verdict {
        CheckVerdict::Blocked => html! {
            <p class="verdict is-blocked" role="status">{bundle.text("checker.verdict_blocked", "Blocked")}</p>
        },
        CheckVerdict::Allowed => html! {
            <p class="verdict is-allowed" role="status">{bundle.text("checker.verdict_allowed", "Allowed")}</p>
        },
    });

    let check_label = if checker.checking {
        bundle.text("checker.checking", "Checking…")
    } else {
        bundle.text("checker.check", "Check")
    };

    html! {
        <section class="panel file-checker">
            <header>
                <h2>{bundle.text("checker.title", "Upload check")}</h2>
                <p class="muted">{bundle.text("checker.body", "")}</p>
            </header>
            <label
                class={classes!("drop-zone", (*dragging).then_some("is-dragging"))}
                ondragover={on_drag_over}
                ondragleave={on_drag_leave}
                ondrop={on_drop}
            >
                <span>{bundle.text("checker.drop", "Drop a file here")}</span>
                <span class="ghost">{bundle.text("checker.choose", "or choose one")}</span>
                <input type="file" class="visually-hidden" onchange={on_change} />
            </label>
            {for selected}
            <button
                type="button"
                class="primary"
                disabled={checker.checking}
                onclick={on_check}
            >
                {check_label}
            </button>
            {for verdict}
        </section>
    }
}

fn verdict_notice(bundle: &TranslationBundle, name: &str, blocked: bool) -> (String, NoticeKind) {
    if !blocked {
        return (
            bundle.format("checker.allowed", "{file} can be uploaded.", &[("file", name)]),
            NoticeKind::Success,
        );
    }
    let ext = extguard_api_models::file_extension(name);
    let message = if ext.is_empty() {
        bundle.text("checker.blocked_unnamed", "This file type is blocked.")
    } else {
        bundle.format("checker.blocked", "{ext}", &[("ext", format!(".{ext}"))])
    };
    (message, NoticeKind::Error)
}
