//! Application root: contexts, routing, session lookup and page layout.
//!
//! # Design
//! - One API client per boot, shared through [`api::ApiCtx`].
//! - The session is looked up once on mount; later 401/403 responses expire it.
//! - Locale lives here so the translation bundle context changes in one place.

use crate::components::auth::SessionBar;
use crate::components::shell::AppShell;
use crate::components::toast::NoticeHost;
use crate::core::auth::{SessionLookup, SessionState};
use crate::core::notify::NoticeKind;
use crate::core::refresh::ChangeEvent;
use crate::core::store::{AppStore, app_dispatch, report_failure};
use crate::features::checker::view::FileChecker;
use crate::features::custom::view::CustomExtensionsPanel;
use crate::features::fixed::view::FixedExtensionsPanel;
use crate::features::history::state::set_filter;
use crate::features::history::view::HistoryPanel;
use crate::i18n::{LocaleCode, TranslationBundle};
use api::ApiCtx;
use gloo::console;
use preferences::{api_base_url, load_history_filter, load_locale, persist_locale, redirect_to};
pub(crate) use routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

pub(crate) mod api;
pub(crate) mod preferences;
mod routes;

#[function_component(ExtGuardApp)]
fn extguard_app() -> Html {
    let locale = use_state(load_locale);
    let bundle = use_memo(|locale| TranslationBundle::new(*locale), *locale);
    let api_ctx = use_memo(|_| ApiCtx::new(api_base_url()), ());
    let dispatch = app_dispatch();

    {
        let api_ctx = api_ctx.clone();
        let bundle = bundle.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                let filter = load_history_filter();
                dispatch.reduce_mut(|store| set_filter(&mut store.history, filter));
                let client = api_ctx.client.clone();
                yew::platform::spawn_local(async move {
                    let lookup = SessionLookup::from_result(client.current_user().await);
                    if lookup.degraded {
                        console::warn!("session lookup failed; continuing anonymously");
                    }
                    dispatch.reduce_mut(|store| {
                        store.session = lookup.state;
                        if lookup.degraded {
                            store.notice.show(
                                bundle.text(
                                    "auth.session_unavailable",
                                    "Could not check your session.",
                                ),
                                NoticeKind::Warning,
                            );
                        }
                    });
                });
                || ()
            },
            (),
        );
    }

    let on_locale = {
        let locale = locale.clone();
        Callback::from(move |next: LocaleCode| {
            persist_locale(next);
            locale.set(next);
        })
    };

    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
                <BrowserRouter>
                    <AppFrame locale={*locale} on_locale={on_locale} />
                </BrowserRouter>
                <NoticeHost />
            </ContextProvider<TranslationBundle>>
        </ContextProvider<ApiCtx>>
    }
}

#[derive(Properties, PartialEq)]
struct AppFrameProps {
    locale: LocaleCode,
    on_locale: Callback<LocaleCode>,
}

#[function_component(AppFrame)]
fn app_frame(props: &AppFrameProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(props.locale));
    let api_ctx = use_context::<ApiCtx>();
    let route = use_route::<Route>().unwrap_or(Route::Manage);
    let session = use_selector(|store: &AppStore| store.session.clone());
    let dispatch = app_dispatch();

    let on_login = {
        let api_ctx = api_ctx.clone();
        Callback::from(move |()| {
            if let Some(ctx) = &api_ctx {
                redirect_to(&ctx.client.login_url());
            }
        })
    };

    let on_logout = {
        let bundle = bundle.clone();
        Callback::from(move |()| {
            let Some(ctx) = api_ctx.clone() else {
                return;
            };
            let dispatch = dispatch.clone();
            let bundle = bundle.clone();
            yew::platform::spawn_local(async move {
                match ctx.client.logout().await {
                    Ok(()) => dispatch.reduce_mut(|store| {
                        store.session = SessionState::Anonymous;
                        store.refresh.publish(ChangeEvent::SessionChanged);
                        store.notice.show(
                            bundle.text("auth.signed_out", "Signed out."),
                            NoticeKind::Info,
                        );
                    }),
                    Err(err) => dispatch.reduce_mut(|store| report_failure(store, &err, &bundle)),
                }
            });
        })
    };

    let session_bar = html! {
        <SessionBar session={(*session).clone()} on_login={on_login} on_logout={on_logout} />
    };

    html! {
        <AppShell
            active={route}
            locale={props.locale}
            on_locale={props.on_locale.clone()}
            session_bar={session_bar}
        >
            <Switch<Route> render={switch} />
        </AppShell>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Manage => html! {
            <>
                <FixedExtensionsPanel />
                <CustomExtensionsPanel />
                <HistoryPanel />
            </>
        },
        Route::History => html! { <HistoryPanel /> },
        Route::Check => html! { <FileChecker /> },
        Route::NotFound => html! { <NotFound /> },
    }
}

#[function_component(NotFound)]
fn not_found() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(LocaleCode::En));
    html! {
        <section class="panel not-found">
            <h2>{bundle.text("not_found.title", "Page not found")}</h2>
            <p class="muted">{bundle.text("not_found.body", "")}</p>
            <Link<Route> to={Route::Manage}>{bundle.text("nav.manage", "Block list")}</Link<Route>>
        </section>
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<ExtGuardApp>::with_root(root).render();
    } else {
        yew::Renderer::<ExtGuardApp>::new().render();
    }
}
