use dioxus::prelude::*;

use crate::{
    app::update_selections,
    domain::{effective_unit_price, parse_price_input, selection_totals, AppState, ItemId},
    ui::{
        components::{
            item_row::{ItemRow, ItemRowView},
            kpi_card::KpiCard,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::format::{grouped, money},
};

fn item_rows(state: &AppState, filter: &str) -> Vec<ItemRow> {
    let needle = filter.trim().to_lowercase();
    state
        .catalog
        .items()
        .iter()
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .map(|item| ItemRow {
            id: item.id,
            name: item.name.clone(),
            img_url: item.img_url.clone(),
            base_price: item.ruby,
            effective_price: effective_unit_price(
                item.id,
                &state.catalog,
                state.selections.custom_prices(),
            ),
            checked: state.selections.is_checked(item.id),
            overridden: state.selections.is_overridden(item),
            has_override: state.selections.custom_price(item.id).is_some(),
        })
        .collect()
}

#[component]
pub fn ItemsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut editing = use_signal(|| None::<ItemId>);
    let mut filter = use_signal(String::new);

    let (rows, totals, catalog_size, override_count) = state.with(|st| {
        (
            item_rows(st, &filter()),
            selection_totals(&st.catalog, &st.selections, &st.valuation),
            st.catalog.len(),
            st.selections.custom_prices().len(),
        )
    });
    let editing_id = editing();

    let on_toggle = move |id: ItemId| {
        update_selections(state, |selections| selections.toggle_item(id));
    };

    let on_check_all = move |_| {
        let ids = state.with(|st| st.catalog.ids().collect::<Vec<_>>());
        update_selections(state, |selections| selections.check_all(ids));
    };

    let on_uncheck_all = move |_| {
        update_selections(state, |selections| selections.uncheck_all());
    };

    let on_reset_all = {
        let toasts = toasts.clone();
        move |_| {
            if update_selections(state, |selections| selections.reset_all_custom_prices()) {
                editing.set(None);
                push_toast(
                    toasts.clone(),
                    ToastKind::Info,
                    "Restored catalog prices for every item.",
                );
            }
        }
    };

    let on_save = {
        let toasts = toasts.clone();
        move |(id, input): (ItemId, String)| match parse_price_input(&input) {
            Some(price) => {
                update_selections(state, |selections| selections.set_custom_price(id, price));
                editing.set(None);
            }
            None => push_toast(
                toasts.clone(),
                ToastKind::Error,
                "Enter a whole, non-negative ruby price.",
            ),
        }
    };

    let on_reset = move |id: ItemId| {
        update_selections(state, |selections| selections.reset_custom_price(id));
        if editing() == Some(id) {
            editing.set(None);
        }
    };

    rsx! {
        div { class: "page",
            section { class: "kpi-grid",
                KpiCard {
                    title: "Selected items",
                    value: format!("{} / {}", totals.checked_count, catalog_size),
                }
                KpiCard {
                    title: "Selected ruby",
                    value: grouped(totals.total_ruby),
                    description: "One unit of each checked item".to_string(),
                }
                KpiCard {
                    title: "Cash value",
                    value: money(totals.total_cash),
                }
                KpiCard {
                    title: "Edited prices",
                    value: override_count.to_string(),
                }
            }

            div { class: "toolbar",
                input {
                    class: "{theme::INPUT}",
                    value: filter(),
                    placeholder: "Filter items",
                    oninput: move |evt| filter.set(evt.value()),
                }
                button { class: "{theme::BTN_SECONDARY}", onclick: on_check_all, "Check all" }
                button { class: "{theme::BTN_SECONDARY}", onclick: on_uncheck_all, "Uncheck all" }
                button {
                    class: "{theme::BTN_WARNING}",
                    disabled: override_count == 0,
                    onclick: on_reset_all,
                    "Reset all prices"
                }
            }

            if catalog_size == 0 {
                div { class: "{theme::PANEL} empty-state",
                    p { "The item catalog has not loaded yet." }
                }
            } else if rows.is_empty() {
                p { class: "{theme::MUTED}", "No items match the filter." }
            } else {
                ul { class: "checklist",
                    for (row_id, row) in rows.into_iter().map(|row| (row.id, row)) {
                        ItemRowView {
                            key: "{row_id}",
                            editing: editing_id == Some(row_id),
                            row,
                            on_toggle,
                            on_edit: move |id| editing.set(Some(id)),
                            on_save: on_save.clone(),
                            on_cancel: move |_| editing.set(None),
                            on_reset,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, Item};

    fn state() -> AppState {
        let mut state = AppState::default();
        state.catalog = Catalog::new(vec![
            Item {
                id: 1,
                name: "Red Gem".to_string(),
                ruby: 100,
                img_url: String::new(),
            },
            Item {
                id: 2,
                name: "Blue Gem".to_string(),
                ruby: 40,
                img_url: String::new(),
            },
        ]);
        state
    }

    #[test]
    fn rows_reflect_overrides_and_checks() {
        let mut state = state();
        state.selections.toggle_item(2);
        state.selections.set_custom_price(1, 80);

        let rows = item_rows(&state, "");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].effective_price, 80);
        assert_eq!(rows[0].base_price, 100);
        assert!(rows[0].overridden && !rows[0].checked);
        assert!(rows[1].checked && !rows[1].overridden);
    }

    #[test]
    fn override_equal_to_base_stays_resettable() {
        let mut state = state();
        state.selections.set_custom_price(2, 40);

        let rows = item_rows(&state, "blue");
        assert!(!rows[0].overridden);
        assert!(rows[0].has_override);
        assert!(!item_rows(&state, "red")[0].has_override);
    }

    #[test]
    fn filter_is_case_insensitive() {
        let rows = item_rows(&state(), "  blue ");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 2);
    }
}
