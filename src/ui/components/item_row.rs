use dioxus::prelude::*;

use crate::domain::ItemId;
use crate::ui::theme;
use crate::util::format::grouped;

#[derive(Clone, Debug, PartialEq)]
pub struct ItemRow {
    pub id: ItemId,
    pub name: String,
    pub img_url: String,
    pub base_price: u64,
    pub effective_price: u64,
    pub checked: bool,
    pub overridden: bool,
    /// A stored override exists, even one equal to the catalog price.
    pub has_override: bool,
}

#[component]
pub fn ItemRowView(
    row: ItemRow,
    editing: bool,
    on_toggle: EventHandler<ItemId>,
    on_edit: EventHandler<ItemId>,
    on_save: EventHandler<(ItemId, String)>,
    on_cancel: EventHandler<()>,
    on_reset: EventHandler<ItemId>,
) -> Element {
    let id = row.id;
    let effective_price = row.effective_price;
    let mut price_input = use_signal(|| effective_price.to_string());
    let price_class = if row.overridden { "item-price item-price-edited" } else { "item-price" };

    rsx! {
        li {
            class: "{theme::checklist_row(row.checked)}",
            input {
                r#type: "checkbox",
                class: "checkbox",
                checked: row.checked,
                onchange: move |_| on_toggle.call(id),
            }
            if !row.img_url.is_empty() {
                img { class: "item-image", src: "{row.img_url}", alt: "{row.name}" }
            }
            div { class: "item-info",
                p { class: "item-name", "{row.name}" }
                if editing {
                    div { class: "item-edit",
                        input {
                            class: "{theme::INPUT} input-narrow",
                            r#type: "number",
                            min: "0",
                            value: price_input(),
                            oninput: move |evt| price_input.set(evt.value()),
                            onkeydown: move |evt| {
                                if evt.key() == Key::Enter {
                                    on_save.call((id, price_input()));
                                } else if evt.key() == Key::Escape {
                                    on_cancel.call(());
                                }
                            },
                        }
                        span { class: "{theme::MUTED}", "ruby" }
                    }
                } else {
                    p {
                        class: "{price_class}",
                        "{grouped(row.effective_price)} ruby"
                        if row.overridden {
                            span { class: "tag tag-warning", "edited" }
                        }
                    }
                    if row.overridden {
                        p { class: "struck", "base {grouped(row.base_price)}" }
                    }
                }
            }
            div { class: "item-actions",
                if editing {
                    button {
                        class: "{theme::BTN_PRIMARY} {theme::BTN_SMALL}",
                        onclick: move |_| on_save.call((id, price_input())),
                        "Save"
                    }
                    button {
                        class: "{theme::BTN_SECONDARY} {theme::BTN_SMALL}",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                } else {
                    button {
                        class: "{theme::BTN_SECONDARY} {theme::BTN_SMALL}",
                        title: "Edit price",
                        onclick: move |_| {
                            price_input.set(effective_price.to_string());
                            on_edit.call(id);
                        },
                        "Edit"
                    }
                    button {
                        class: "{theme::BTN_WARNING} {theme::BTN_SMALL}",
                        title: "Restore catalog price",
                        disabled: !row.has_override,
                        onclick: move |_| on_reset.call(id),
                        "Reset"
                    }
                }
            }
        }
    }
}
