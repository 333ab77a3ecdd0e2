use dioxus::prelude::*;

use super::efficiency_badge::EfficiencyBadge;
use crate::domain::{
    resolve_unit_price, Catalog, EfficiencyStatus, ItemSelections, PackageAssessment, PriceSource,
    ValuationConfig,
};
use crate::ui::theme::{self, Tone};
use crate::util::format::{grouped, money, signed_money};

#[derive(Clone, Debug, PartialEq)]
pub struct DetailLine {
    pub name: String,
    pub img_url: String,
    pub quantity: u32,
    pub unit_price: u64,
    /// Catalog price, shown struck through when an override replaces it.
    pub base_price: Option<u64>,
    pub checked: bool,
    pub overridden: bool,
    pub unknown: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackageDetail {
    pub name: String,
    pub price: f64,
    pub cash_value: f64,
    pub total_ruby: u64,
    pub status: EfficiencyStatus,
    pub checked_count: usize,
    pub lines: Vec<DetailLine>,
}

pub fn build_detail(
    assessment: &PackageAssessment,
    catalog: &Catalog,
    selections: &ItemSelections,
    config: &ValuationConfig,
) -> PackageDetail {
    let lines = assessment
        .package
        .items
        .iter()
        .map(|line| {
            let resolution = resolve_unit_price(line.item_id, catalog, selections.custom_prices());
            let catalog_item = catalog.get(line.item_id);
            let base_price = catalog_item.map(|item| item.ruby);
            let name = catalog_item
                .map(|item| item.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| line.item_name.clone());
            let img_url = catalog_item
                .map(|item| item.img_url.clone())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| line.img_url.clone());
            DetailLine {
                name,
                img_url,
                quantity: line.quantity,
                unit_price: resolution.price,
                base_price,
                checked: selections.is_checked(line.item_id),
                overridden: resolution.source == PriceSource::Override
                    && base_price != Some(resolution.price),
                unknown: catalog_item.is_none(),
            }
        })
        .collect();

    PackageDetail {
        name: assessment.package.name.clone(),
        price: assessment.package.price,
        cash_value: assessment.cash_value(config),
        total_ruby: assessment.valuation.total_intrinsic_value,
        status: assessment.status.clone(),
        checked_count: assessment.valuation.checked_items.len(),
        lines,
    }
}

#[component]
pub fn PackageDetailModal(detail: PackageDetail, on_close: EventHandler<()>) -> Element {
    let tone = Tone::of(&detail.status);
    let profit = match &detail.status {
        EfficiencyStatus::Evaluated(efficiency) => Some(signed_money(efficiency.profit)),
        _ => None,
    };
    let line_count = detail.lines.len();

    rsx! {
        div {
            class: "modal-backdrop",
            tabindex: "0",
            onclick: move |_| on_close.call(()),
            onkeydown: move |evt| {
                if evt.key() == Key::Escape {
                    on_close.call(());
                }
            },
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "modal-header",
                    h2 { "{detail.name}" }
                    button { class: "icon-button", onclick: move |_| on_close.call(()), "✕" }
                }
                div { class: "modal-body",
                    div { class: "detail-grid",
                        div {
                            p { class: "{theme::LABEL}", "Package price" }
                            p { class: "detail-value", {money(detail.price)} }
                        }
                        div {
                            p { class: "{theme::LABEL}", "Selected value" }
                            p { class: "detail-value {tone.class()}", {money(detail.cash_value)} }
                            p { class: "{theme::MUTED}", "{grouped(detail.total_ruby)} ruby" }
                        }
                    }
                    div { class: "detail-efficiency {tone.class()}",
                        span { class: "{theme::LABEL}", "Package efficiency" }
                        EfficiencyBadge { status: detail.status.clone() }
                        if let Some(profit) = profit {
                            span { class: "detail-profit", "{profit}" }
                        }
                    }
                    h3 { class: "detail-heading",
                        "Included items ({line_count})"
                        if detail.checked_count > 0 {
                            span { class: "tag tag-selected", "{detail.checked_count} selected" }
                        }
                    }
                    ul { class: "detail-lines",
                        for line in detail.lines.iter().cloned() {
                            DetailLineView { line }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DetailLineView(line: DetailLine) -> Element {
    let row_class = if line.checked { "detail-line" } else { "detail-line detail-line-unchecked" };
    let subtotal = line.unit_price.saturating_mul(u64::from(line.quantity));
    rsx! {
        li {
            class: "{row_class}",
            if !line.img_url.is_empty() {
                img { class: "item-image", src: "{line.img_url}", alt: "{line.name}" }
            }
            div { class: "detail-line-info",
                p {
                    "{line.name}"
                    if line.overridden {
                        span { class: "tag tag-warning", "edited" }
                    }
                    if line.unknown {
                        span { class: "tag tag-warning", title: "Not in the item catalog; counted as 0", "unknown item" }
                    }
                }
                p { class: "{theme::MUTED}", "{grouped(line.unit_price)} ruby × {line.quantity}" }
                if line.overridden {
                    if let Some(base) = line.base_price {
                        p { class: "struck", "was {grouped(base)}" }
                    }
                }
            }
            span { class: "detail-line-total", "{grouped(subtotal)}" }
        }
    }
}
