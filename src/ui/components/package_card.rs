use dioxus::prelude::*;

use super::efficiency_badge::EfficiencyBadge;
use crate::domain::{PackageAssessment, PackageKey};
use crate::ui::theme::{self, Tone};
use crate::util::format::money;

#[component]
pub fn PackageCard(
    assessment: PackageAssessment,
    on_open: EventHandler<PackageKey>,
    on_delete: EventHandler<PackageKey>,
) -> Element {
    let package = &assessment.package;
    let key = package.key;
    let is_custom = key.is_custom();
    let tone = Tone::of(&assessment.status);
    let card_class = theme::card(tone, is_custom);
    let price = money(package.price);
    let line_count = package.items.len();
    let checked_count = assessment.valuation.checked_items.len();
    let has_unknown = !assessment.valuation.unknown_items.is_empty();
    let name = package.name.clone();

    rsx! {
        div {
            class: "{card_class}",
            onclick: move |_| on_open.call(key),
            div { class: "card-header",
                h3 { class: "card-title", title: "{name}", "{name}" }
                if is_custom {
                    span { class: "tag tag-custom", "Custom" }
                    button {
                        class: "icon-button",
                        title: "Delete custom package",
                        onclick: move |evt| {
                            evt.stop_propagation();
                            on_delete.call(key);
                        },
                        "✕"
                    }
                }
            }
            div { class: "card-row",
                span { class: "{theme::MUTED}", "Price" }
                span { class: "card-price", "{price}" }
            }
            div { class: "card-row",
                span { class: "{theme::MUTED}", "Efficiency" }
                EfficiencyBadge { status: assessment.status.clone() }
            }
            div { class: "card-footer",
                span { class: "{theme::MUTED}", "{line_count} items" }
                if checked_count > 0 {
                    span { class: "tag tag-selected", "{checked_count} selected" }
                }
                if has_unknown {
                    span { class: "tag tag-warning", title: "Some items are missing from the catalog", "⚠" }
                }
            }
        }
    }
}
