use dioxus::prelude::*;

use crate::{
    app::{persist_user_state, update_selections, RefreshTrigger},
    config::AppConfig,
    domain::{AppState, CacheResource, ValuationConfig},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::{
        format::humanize_age,
        persistence::StateFile,
        version::{version_label, APP_NAME},
    },
};

fn parse_multiplier(input: &str) -> Result<f64, String> {
    let value = input
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("\"{}\" is not a number.", input.trim()))?;
    if ValuationConfig::is_valid_multiplier(value) {
        Ok(value)
    } else {
        Err("The cash multiplier must be greater than zero.".to_string())
    }
}

fn cache_label(resource: &CacheResource) -> &'static str {
    match resource {
        CacheResource::Items => "Item catalog",
        CacheResource::Packages => "Package list",
    }
}

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();
    let refresh = use_context::<RefreshTrigger>();

    let initial_multiplier = state.with(|st| st.valuation.cash_multiplier);
    let mut multiplier_input = use_signal(|| initial_multiplier.to_string());

    let (cache_entries, custom_count) = state.with(|st| {
        let mut entries = st
            .cache
            .iter()
            .map(|(resource, time)| (cache_label(resource), humanize_age(*time)))
            .collect::<Vec<_>>();
        entries.sort();
        (entries, st.custom_packages.len())
    });
    let state_path = StateFile::default_location()
        .map(|file| file.path().display().to_string())
        .unwrap_or_else(|| "unavailable".to_string());

    let on_apply = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| match parse_multiplier(&multiplier_input()) {
            Ok(value) => {
                state.with_mut(|st| st.valuation.cash_multiplier = value);
                persist_user_state(&state);
                push_toast(
                    toasts.clone(),
                    ToastKind::Success,
                    format!("Cash multiplier set to {value}."),
                );
            }
            Err(message) => push_toast(toasts.clone(), ToastKind::Error, message),
        }
    };

    let on_reset = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let config = config.clone();
        move |_| {
            let mut defaults = ValuationConfig::default();
            config.apply_to(&mut defaults);
            multiplier_input.set(defaults.cash_multiplier.to_string());
            state.with_mut(|st| st.valuation = defaults);
            persist_user_state(&state);
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Restored the default cash multiplier.",
            );
        }
    };

    let on_refresh = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            state.with_mut(|st| st.cache.clear());
            refresh.request();
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Reloading items and packages...",
            );
        }
    };

    let on_clear_selections = {
        let toasts = toasts.clone();
        move |_| {
            let changed = update_selections(state, |selections| {
                let unchecked = selections.uncheck_all();
                let reset = selections.reset_all_custom_prices();
                unchecked || reset
            });
            if changed {
                push_toast(
                    toasts.clone(),
                    ToastKind::Info,
                    "Cleared checked items and edited prices.",
                );
            }
        }
    };

    let on_clear_custom = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            state.with_mut(|st| st.custom_packages.clear());
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Info, "Deleted all custom packages.");
        }
    };

    rsx! {
        div { class: "page",
            section { class: "{theme::PANEL}",
                h2 { class: "{theme::LABEL}", "Valuation" }
                div { class: "settings-row",
                    div {
                        label { class: "{theme::LABEL}", "Cash per ruby" }
                        input {
                            class: "{theme::INPUT}",
                            value: multiplier_input(),
                            oninput: move |evt| multiplier_input.set(evt.value()),
                        }
                        p { class: "{theme::MUTED}", "Cash value of a package is its ruby total times this multiplier." }
                    }
                    div { class: "settings-actions",
                        button { class: "{theme::BTN_PRIMARY}", onclick: on_apply, "Apply" }
                        button { class: "{theme::BTN_SECONDARY}", onclick: on_reset, "Reset" }
                    }
                }
            }

            section { class: "{theme::PANEL}",
                h2 { class: "{theme::LABEL}", "Shop data" }
                p { class: "{theme::MUTED}", "API: {config.api_base_url}" }
                if cache_entries.is_empty() {
                    p { class: "{theme::MUTED}", "Nothing fetched yet." }
                } else {
                    ul { class: "cache-list",
                        for (label, age) in cache_entries {
                            li { key: "{label}",
                                span { "{label}" }
                                span { class: "{theme::MUTED}", "{age}" }
                            }
                        }
                    }
                }
                button { class: "{theme::BTN_PRIMARY}", onclick: on_refresh, "Refresh now" }
            }

            section { class: "{theme::PANEL}",
                h2 { class: "{theme::LABEL}", "Saved data" }
                p { class: "{theme::MUTED}", "Stored at {state_path}" }
                div { class: "settings-actions",
                    button { class: "{theme::BTN_WARNING}", onclick: on_clear_selections, "Clear selections" }
                    button {
                        class: "{theme::BTN_DANGER}",
                        disabled: custom_count == 0,
                        onclick: on_clear_custom,
                        "Delete custom packages ({custom_count})"
                    }
                }
            }

            footer { class: "{theme::MUTED} settings-footer", "{APP_NAME} {version_label()}" }
        }
    }
}
