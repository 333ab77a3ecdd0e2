use std::time::Duration;

use dioxus::{prelude::*, signals::Signal};

use crate::{
    config::AppConfig,
    domain::{AppState, CacheResource, ItemSelections},
    infra::shop::ShopClient,
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{ItemsPage, PackagesPage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

const DATA_TTL: Duration = Duration::from_secs(15 * 60);
const STALE_CHECK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/packages")]
    Packages {},
    #[route("/items")]
    Items {},
    #[route("/settings")]
    Settings {},
}

/// Bumping the inner counter re-runs the catalog and package fetch.
#[derive(Clone, Copy)]
pub struct RefreshTrigger(pub Signal<u32>);

impl RefreshTrigger {
    pub fn request(mut self) {
        self.0.with_mut(|generation| *generation = generation.wrapping_add(1));
    }
}

#[component]
pub fn App() -> Element {
    let config = use_hook(AppConfig::load);
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        let config = config.clone();
        move || {
            state.with_mut(|st| {
                if let Some(saved) = load_persisted_state() {
                    st.apply_persisted(saved);
                }
                config.apply_to(&mut st.valuation);
            });
        }
    });
    use_context_provider(|| state.clone());
    use_context_provider(|| config.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    let refresh = use_signal(|| 0_u32);
    use_context_provider(|| RefreshTrigger(refresh));

    let _shop_data = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let base_url = config.api_base_url.clone();
        move || {
            let generation = refresh();
            let base_url = base_url.clone();
            async move { fetch_shop_data(state.clone(), toasts.clone(), &base_url, generation).await }
        }
    });

    let _auto_refresh = use_future(move || async move {
        loop {
            tokio::time::sleep(STALE_CHECK_INTERVAL).await;
            let stale = state.with(|st| {
                st.is_stale(&CacheResource::Items, DATA_TTL)
                    || st.is_stale(&CacheResource::Packages, DATA_TTL)
            });
            if stale {
                tracing::debug!("shop data is stale, refetching");
                RefreshTrigger(refresh).request();
            }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        tracing::error!("failed to persist user state: {err}");
    }
}

/// Applies a selection change and persists it when something actually changed.
pub fn update_selections(
    mut state: Signal<AppState>,
    change: impl FnOnce(&mut ItemSelections) -> bool,
) -> bool {
    let changed = state.with_mut(|st| change(&mut st.selections));
    if changed {
        persist_user_state(&state);
    }
    changed
}

async fn fetch_shop_data(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    base_url: &str,
    generation: u32,
) -> bool {
    tracing::info!(generation, base_url, "fetching catalog and packages");
    let client = match ShopClient::with_base_url(base_url) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!("failed to initialise shop client: {err}");
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to initialise shop client: {err}"),
            );
            return false;
        }
    };

    // Items first: packages are valued against the catalog.
    match client.get_items().await {
        Ok(payload) => {
            state.with_mut(|st| st.replace_catalog(payload.data, payload.fetched_at));
        }
        Err(err) => {
            tracing::warn!("item catalog request failed: {err}");
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load items: {err}"),
            );
        }
    }

    match client.get_packages().await {
        Ok(payload) => {
            state.with_mut(|st| st.replace_packages(payload.data, payload.fetched_at));
        }
        Err(err) => {
            tracing::warn!("package request failed: {err}");
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load packages: {err}"),
            );
            return false;
        }
    }

    let dangling = state.with(|st| {
        st.packages
            .iter()
            .filter(|package| {
                package
                    .items
                    .iter()
                    .any(|line| st.catalog.get(line.item_id).is_none())
            })
            .count()
    });
    if dangling > 0 {
        tracing::warn!(dangling, "packages reference items missing from the catalog");
        push_toast(
            toasts.clone(),
            ToastKind::Warning,
            format!("{dangling} package(s) contain unknown items; they are valued at 0 ruby."),
        );
    }
    true
}

#[component]
pub fn Packages() -> Element {
    rsx! { Shell { PackagesPage {} } }
}

#[component]
pub fn Items() -> Element {
    rsx! { Shell { ItemsPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
