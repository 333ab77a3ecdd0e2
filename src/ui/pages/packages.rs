use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    domain::{
        assess_package, effective_unit_price, rank_packages, AppState, CustomPackageDraft, ItemId,
        PackageAssessment, PackageKey, PackageSort,
    },
    ui::{
        components::{
            efficiency_badge::EfficiencyBadge,
            kpi_card::KpiCard,
            package_card::PackageCard,
            package_detail::{build_detail, PackageDetailModal},
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme::{self, Tone},
    },
    util::format::{grouped, money, timestamp},
};

const SEARCH_RESULT_LIMIT: usize = 20;

#[derive(Clone, Debug, Default, PartialEq)]
struct PackageSummary {
    total: usize,
    evaluated: usize,
    profitable: usize,
    best: Option<(String, String)>,
}

fn summarize(assessments: &[PackageAssessment]) -> PackageSummary {
    let mut summary = PackageSummary {
        total: assessments.len(),
        ..PackageSummary::default()
    };
    let mut best: Option<&PackageAssessment> = None;
    for assessment in assessments {
        let Some(efficiency) = assessment.efficiency() else {
            continue;
        };
        summary.evaluated += 1;
        if efficiency.is_profitable {
            summary.profitable += 1;
        }
        let beats_best = best
            .and_then(|current| current.efficiency())
            .map_or(true, |current| efficiency.percent > current.percent);
        if beats_best {
            best = Some(assessment);
        }
    }
    summary.best = best.and_then(|assessment| {
        assessment
            .efficiency()
            .map(|efficiency| (assessment.package.name.clone(), efficiency.percent_display()))
    });
    summary
}

#[component]
pub fn PackagesPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut sort = use_signal(PackageSort::default);
    let mut open_key = use_signal(|| None::<PackageKey>);
    let mut show_builder = use_signal(|| false);

    let active_sort = sort();
    let (assessments, detail, catalog_empty, updated_at, multiplier, checked_count) =
        state.with(|st| {
            let mut assessments = st.assessments();
            rank_packages(&mut assessments, active_sort);
            let detail = open_key().and_then(|key| {
                assessments
                    .iter()
                    .find(|assessment| assessment.package.key == key)
                    .map(|assessment| {
                        build_detail(assessment, &st.catalog, &st.selections, &st.valuation)
                    })
            });
            (
                assessments,
                detail,
                st.catalog.is_empty(),
                st.packages_updated_at,
                st.valuation.cash_multiplier,
                st.selections.checked_count(),
            )
        });
    let summary = summarize(&assessments);
    let best_value = summary
        .best
        .as_ref()
        .map(|(_, percent)| percent.clone())
        .unwrap_or_else(|| "n/a".to_string());
    let best_name = summary.best.as_ref().map(|(name, _)| name.clone());
    let updated_label = updated_at
        .map(timestamp)
        .unwrap_or_else(|| "unknown".to_string());

    let on_delete = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |key: PackageKey| {
            let PackageKey::Custom(id) = key else {
                return;
            };
            let removed = state.with_mut(|st| {
                let before = st.custom_packages.len();
                st.custom_packages.retain(|custom| custom.id != id);
                before != st.custom_packages.len()
            });
            if removed {
                if open_key() == Some(key) {
                    open_key.set(None);
                }
                persist_user_state(&state);
                push_toast(toasts.clone(), ToastKind::Info, "Deleted custom package.");
            }
        }
    };

    rsx! {
        div { class: "page",
            section { class: "kpi-grid",
                KpiCard {
                    title: "Packages",
                    value: summary.total.to_string(),
                    description: format!("Listed {updated_label}"),
                }
                KpiCard {
                    title: "Profitable",
                    value: format!("{} / {}", summary.profitable, summary.evaluated),
                    description: "Of the packages with checked items".to_string(),
                    tone: Tone::Profit,
                }
                KpiCard {
                    title: "Best efficiency",
                    value: best_value,
                    description: best_name.unwrap_or_else(|| "Check items to compare packages".to_string()),
                }
                KpiCard {
                    title: "Cash multiplier",
                    value: format!("×{multiplier}"),
                    description: format!("{checked_count} items selected"),
                }
            }

            div { class: "toolbar",
                div { class: "sort-group",
                    span { class: "{theme::LABEL}", "Sort by" }
                    for option in PackageSort::ALL {
                        button {
                            class: "{theme::nav_button(option == active_sort)}",
                            onclick: move |_| sort.set(option),
                            "{option.label()}"
                        }
                    }
                }
                button {
                    class: "{theme::BTN_PRIMARY}",
                    disabled: catalog_empty,
                    title: if catalog_empty { "Load the item catalog first" } else { "Assemble a package from catalog items" },
                    onclick: move |_| show_builder.set(!show_builder()),
                    if show_builder() { "Close builder" } else { "New custom package" }
                }
            }

            if show_builder() {
                CustomPackageBuilder { on_close: move |_| show_builder.set(false) }
            }

            if assessments.is_empty() {
                div { class: "{theme::PANEL} empty-state",
                    p { "No packages loaded yet." }
                    p { class: "{theme::MUTED}", "Packages appear here once the shop responds." }
                }
            } else {
                div { class: "card-grid",
                    for (card_key, assessment) in assessments.into_iter().map(|a| (format!("{:?}", a.package.key), a)) {
                        PackageCard {
                            key: "{card_key}",
                            assessment,
                            on_open: move |key| open_key.set(Some(key)),
                            on_delete: on_delete.clone(),
                        }
                    }
                }
            }

            if let Some(detail) = detail {
                PackageDetailModal { detail, on_close: move |_| open_key.set(None) }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct DraftLineView {
    item_id: ItemId,
    name: String,
    quantity: u32,
}

#[component]
fn CustomPackageBuilder(on_close: EventHandler<()>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut draft = use_signal(CustomPackageDraft::default);
    let mut search = use_signal(String::new);

    let query = search().trim().to_lowercase();
    let current = draft();
    let (results, lines, preview, preview_cash) = state.with(|st| {
        let results = st
            .catalog
            .items()
            .iter()
            .filter(|item| !current.contains(item.id))
            .filter(|item| query.is_empty() || item.name.to_lowercase().contains(&query))
            .take(SEARCH_RESULT_LIMIT)
            .map(|item| {
                let price = effective_unit_price(item.id, &st.catalog, st.selections.custom_prices());
                (item.id, item.name.clone(), price)
            })
            .collect::<Vec<_>>();
        let lines = current
            .items()
            .iter()
            .map(|line| DraftLineView {
                item_id: line.item_id,
                name: st
                    .catalog
                    .get(line.item_id)
                    .map(|item| item.name.clone())
                    .unwrap_or_else(|| "Unknown item".to_string()),
                quantity: line.quantity,
            })
            .collect::<Vec<_>>();
        let preview = assess_package(
            &current.preview_package(&st.catalog),
            &st.catalog,
            &st.selections,
            &st.valuation,
        );
        let preview_cash = preview.cash_value(&st.valuation);
        (results, lines, preview, preview_cash)
    });
    let preview_ruby = preview.valuation.total_intrinsic_value;

    let on_save = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| match draft.with(|d| d.validate()) {
            Ok(custom) => {
                let name = custom.name.clone();
                state.with_mut(|st| st.custom_packages.push(custom));
                persist_user_state(&state);
                tracing::info!(name = %name, "custom package created");
                push_toast(
                    toasts.clone(),
                    ToastKind::Success,
                    format!("Added custom package \"{name}\"."),
                );
                draft.set(CustomPackageDraft::default());
                search.set(String::new());
                on_close.call(());
            }
            Err(err) => push_toast(toasts.clone(), ToastKind::Error, err.to_string()),
        }
    };

    rsx! {
        section { class: "{theme::PANEL} builder",
            h2 { class: "{theme::LABEL}", "Custom package" }
            div { class: "builder-fields",
                div {
                    label { class: "{theme::LABEL}", "Name" }
                    input {
                        class: "{theme::INPUT}",
                        value: current.name.clone(),
                        placeholder: "My bundle",
                        oninput: move |evt| draft.with_mut(|d| d.name = evt.value()),
                    }
                }
                div {
                    label { class: "{theme::LABEL}", "Price" }
                    input {
                        class: "{theme::INPUT}",
                        value: current.price_input.clone(),
                        placeholder: "9,900",
                        oninput: move |evt| draft.with_mut(|d| d.price_input = evt.value()),
                    }
                }
            }

            div { class: "builder-columns",
                div {
                    input {
                        class: "{theme::INPUT}",
                        value: search(),
                        placeholder: "Search items",
                        oninput: move |evt| search.set(evt.value()),
                    }
                    ul { class: "builder-results",
                        for (item_id, name, ruby) in results {
                            li {
                                key: "{item_id}",
                                class: "builder-result",
                                onclick: move |_| {
                                    draft.with_mut(|d| {
                                        d.add_item(item_id);
                                    });
                                },
                                span { "{name}" }
                                span { class: "{theme::MUTED}", "{grouped(ruby)} ruby" }
                            }
                        }
                    }
                }
                div {
                    if lines.is_empty() {
                        p { class: "{theme::MUTED}", "Pick items on the left to add them." }
                    }
                    ul { class: "builder-lines",
                        for line in lines {
                            li {
                                key: "{line.item_id}",
                                class: "builder-line",
                                span { class: "builder-line-name", "{line.name}" }
                                button {
                                    class: "{theme::BTN_SECONDARY} {theme::BTN_SMALL}",
                                    disabled: line.quantity <= 1,
                                    onclick: move |_| draft.with_mut(|d| d.decrement(line.item_id)),
                                    "−"
                                }
                                span { class: "builder-quantity", "{line.quantity}" }
                                button {
                                    class: "{theme::BTN_SECONDARY} {theme::BTN_SMALL}",
                                    onclick: move |_| draft.with_mut(|d| d.increment(line.item_id)),
                                    "+"
                                }
                                button {
                                    class: "{theme::BTN_DANGER} {theme::BTN_SMALL}",
                                    onclick: move |_| draft.with_mut(|d| d.remove_item(line.item_id)),
                                    "Remove"
                                }
                            }
                        }
                    }
                }
            }

            div { class: "builder-footer",
                span { class: "{theme::MUTED}", "Selected value {grouped(preview_ruby)} ruby, {money(preview_cash)} cash" }
                EfficiencyBadge { status: preview.status.clone() }
                button { class: "{theme::BTN_SECONDARY}", onclick: move |_| on_close.call(()), "Cancel" }
                button { class: "{theme::BTN_PRIMARY}", onclick: on_save, "Save package" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        assess_package, Catalog, Item, ItemSelections, Package, PackageItem, ValuationConfig,
    };

    fn assessment(name: &str, price: f64, quantity: u32, selections: &ItemSelections) -> PackageAssessment {
        let catalog = Catalog::new(vec![Item {
            id: 1,
            name: "Gem".to_string(),
            ruby: 100,
            img_url: String::new(),
        }]);
        let package = Package {
            key: PackageKey::Server(quantity as u64),
            name: name.to_string(),
            price,
            items: vec![PackageItem {
                item_id: 1,
                item_name: "Gem".to_string(),
                img_url: String::new(),
                quantity,
            }],
        };
        assess_package(&package, &catalog, selections, &ValuationConfig::default())
    }

    #[test]
    fn summary_counts_only_evaluated_packages() {
        let mut selections = ItemSelections::default();
        selections.toggle_item(1);
        let assessments = vec![
            assessment("Small", 1_000.0, 1, &selections),
            assessment("Large", 1_000.0, 4, &selections),
            assessment("Free", 0.0, 2, &selections),
        ];

        let summary = summarize(&assessments);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.evaluated, 2);
        assert_eq!(summary.profitable, 1);
        assert_eq!(
            summary.best,
            Some(("Large".to_string(), "+200.0%".to_string()))
        );
    }

    #[test]
    fn summary_without_selection_has_no_best() {
        let assessments = vec![assessment("Small", 1_000.0, 1, &ItemSelections::default())];
        let summary = summarize(&assessments);
        assert_eq!(summary.evaluated, 0);
        assert!(summary.best.is_none());
    }
}
