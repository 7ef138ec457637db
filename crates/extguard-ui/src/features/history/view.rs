//! History list with filter tabs.

use crate::app::api::ApiCtx;
use crate::app::preferences::persist_history_filter;
use crate::core::lifecycle::{LoadPhase, ViewScope};
use crate::core::refresh::Topic;
use crate::core::store::{AppStore, app_dispatch};
use crate::features::history::api::load_lists;
use crate::features::history::state::{
    HistoryRow, select_counts, select_visible, set_failed, set_filter, set_snapshot, stale_error,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use extguard_api_models::history::{HistoryAction, HistoryFilter};
use yew::prelude::*;
use yewdux::prelude::use_selector;

fn filter_key(filter: HistoryFilter) -> &'static str {
    match filter {
        HistoryFilter::All => "history.filter_all",
        HistoryFilter::Fixed => "history.filter_fixed",
        HistoryFilter::Custom => "history.filter_custom",
        HistoryFilter::Blocked => "history.filter_blocked",
    }
}

fn action_key(action: HistoryAction) -> &'static str {
    match action {
        HistoryAction::Blocked => "history.action_blocked",
        HistoryAction::Unblocked => "history.action_unblocked",
        HistoryAction::Added => "history.action_added",
    }
}

#[function_component(HistoryPanel)]
pub(crate) fn history_panel() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let api_ctx = use_context::<ApiCtx>();
    let dispatch = app_dispatch();
    let history = use_selector(|store: &AppStore| store.history.clone());
    let revision = use_selector(|store: &AppStore| store.refresh.revision(Topic::History));
    let scope = use_memo(|_| ViewScope::new(), ());
    let reload = use_state(|| 0_u32);

    {
        let scope = scope.clone();
        use_effect_with_deps(move |_| move || scope.close(), ());
    }

    {
        let scope = scope.clone();
        let dispatch = dispatch.clone();
        let bundle = bundle.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    let scope = (*scope).clone();
                    let ticket = scope.begin_load();
                    yew::platform::spawn_local(async move {
                        let result = load_lists(&ctx.client).await;
                        if !scope.accepts(ticket) {
                            return;
                        }
                        match result {
                            Ok((fixed, custom)) => dispatch.reduce_mut(|store| {
                                set_snapshot(&mut store.history, fixed, custom);
                            }),
                            Err(err) => {
                                let message = err.user_message(|key| bundle.lookup(key));
                                dispatch.reduce_mut(|store| {
                                    set_failed(&mut store.history, message);
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

    let counts = select_counts(&history);
    let tabs = HistoryFilter::all().into_iter().map(|filter| {
        let active = history.filter == filter;
        let dispatch = dispatch.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            dispatch.reduce_mut(|store| set_filter(&mut store.history, filter));
            persist_history_filter(filter);
        });
        html! {
            <button
                type="button"
                role="tab"
                aria-selected={active.to_string()}
                class={classes!("tab", active.then_some("is-active"))}
                onclick={onclick}
            >
                {bundle.text(filter_key(filter), filter.as_str())}
                <span class="badge">{counts.for_filter(filter).to_string()}</span>
            </button>
        }
    });

    let now = chrono::Local::now().naive_local();
    let rows: Vec<HistoryRow> = select_visible(&history)
        .iter()
        .map(|entry| HistoryRow::project(entry, now, &bundle))
        .collect();

    let retry = {
        let reload = reload.clone();
        Callback::from(move |_: MouseEvent| reload.set(reload.wrapping_add(1)))
    };

    let body = match (&history.phase, history.snapshot.is_empty()) {
        (LoadPhase::Loading, true) => html! {
            <p class="muted">{bundle.text("history.loading", "Loading…")}</p>
        },
        (LoadPhase::Failed(message), true) => html! {
            <div class="error-text">
                <p>{message.clone()}</p>
                <button type="button" class="ghost" onclick={retry.clone()}>{bundle.text("errors.retry", "Retry")}</button>
            </div>
        },
        _ if rows.is_empty() => html! {
            <p class="muted">{bundle.text("history.empty", "Nothing here yet.")}</p>
        },
        _ => html! {
            <ol class="history-list">
                {for rows.iter().map(|row| {
                    let badge = if row.fixed {
                        bundle.text("history.fixed_badge", "fixed")
                    } else {
                        bundle.text("history.custom_badge", "custom")
                    };
                    html! {
                        <li key={row.id} class={classes!("history-row", row.action.as_str())}>
                            <span class="ext">{row.label.clone()}</span>
                            <span class="badge">{badge}</span>
                            <span class="action">{bundle.text(action_key(row.action), row.action.as_str())}</span>
                            if let Some(actor) = &row.actor {
                                <span class="actor">{bundle.format("history.by", "by {name}", &[("name", actor)])}</span>
                            }
                            <time class="muted">{row.when.clone()}</time>
                        </li>
                    }
                })}
            </ol>
        },
    };

    let stale = stale_error(&history).map(|message| {
        html! {
            <div class="error-text inline-banner" role="alert">
                <span>{message.to_string()}</span>
                <button type="button" class="ghost" onclick={retry.clone()}>{bundle.text("errors.retry", "Retry")}</button>
            </div>
        }
    });

    html! {
        <section class="panel history">
            <header>
                <h2>{bundle.text("history.title", "Recent changes")}</h2>
                <p class="muted">{bundle.text("history.body", "")}</p>
            </header>
            <div class="tabs" role="tablist">{for tabs}</div>
            {for stale}
            {body}
        </section>
    }
}
