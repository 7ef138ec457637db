//! Modal confirmation dialog.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ConfirmDialogProps {
    pub(crate) title: AttrValue,
    pub(crate) body: AttrValue,
    pub(crate) confirm_label: AttrValue,
    pub(crate) cancel_label: AttrValue,
    #[prop_or_default]
    pub(crate) busy: bool,
    pub(crate) on_confirm: Callback<()>,
    pub(crate) on_cancel: Callback<()>,
}

#[function_component(ConfirmDialog)]
pub(crate) fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let confirm = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| on_confirm.emit(()))
    };
    let cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| on_cancel.emit(()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="card modal" role="alertdialog" aria-modal="true">
                <header>
                    <h3>{props.title.clone()}</h3>
                </header>
                <p class="muted">{props.body.clone()}</p>
                <div class="actions">
                    <button type="button" class="ghost" disabled={props.busy} onclick={cancel}>
                        {props.cancel_label.clone()}
                    </button>
                    <button type="button" class="solid danger" disabled={props.busy} onclick={confirm}>
                        {props.confirm_label.clone()}
                    </button>
                </div>
            </div>
        </div>
    }
}
