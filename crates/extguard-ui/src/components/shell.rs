//! Page chrome: title, navigation, locale picker and session bar.

use crate::app::Route;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode, TranslationBundle};
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub(crate) children: Children,
    pub(crate) active: Route,
    pub(crate) locale: LocaleCode,
    pub(crate) on_locale: Callback<LocaleCode>,
    pub(crate) session_bar: Html,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));

    let on_locale = {
        let on_locale = props.on_locale.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
                if let Some(next) = LocaleCode::from_lang_tag(&select.value()) {
                    on_locale.emit(next);
                }
            }
        })
    };

    html! {
        <div class="app-shell">
            <header class="topbar">
                <div class="brand">
                    <strong>{bundle.text("app.title", "Extension Guard")}</strong>
                    <span class="muted">{bundle.text("app.subtitle", "")}</span>
                </div>
                <nav>
                    {nav_item(Route::Manage, bundle.text("nav.manage", "Block list"), props.active)}
                    {nav_item(Route::History, bundle.text("nav.history", "History"), props.active)}
                    {nav_item(Route::Check, bundle.text("nav.check", "File check"), props.active)}
                </nav>
                <label class="locale">
                    <span class="sr-only">{bundle.text("locale.label", "Language")}</span>
                    <select onchange={on_locale}>
                        {for LocaleCode::all().iter().map(|lc| html! {
                            <option value={lc.code()} selected={*lc == props.locale}>{lc.label()}</option>
                        })}
                    </select>
                </label>
                {props.session_bar.clone()}
            </header>
            <main class="content">
                {for props.children.iter()}
            </main>
        </div>
    }
}

fn nav_item(route: Route, label: String, active: Route) -> Html {
    let classes = if route == active {
        classes!("nav-item", "active")
    } else {
        classes!("nav-item")
    };
    html! {
        <Link<Route> to={route} classes={classes}>{label}</Link<Route>>
    }
}
