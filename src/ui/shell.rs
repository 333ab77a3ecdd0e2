use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::AppState;
use crate::ui::theme;
use crate::util::version::APP_NAME;

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let (item_count, package_count) =
        state.with(|st| (st.catalog.len(), st.packages.len() + st.custom_packages.len()));
    let tagline = if item_count == 0 {
        "waiting for the shop...".to_string()
    } else {
        format!("{item_count} items, {package_count} packages")
    };

    rsx! {
        div { class: "app",
            header { class: "app-header",
                div { class: "app-header-inner",
                    div {
                        h1 { class: "app-title", "{APP_NAME}" }
                        p { class: "{theme::MUTED}", "{tagline}" }
                    }
                    nav { class: "app-nav",
                        NavButton { active: matches!(current_route, Route::Packages {}), onclick: move |_| { nav.push(Route::Packages {}); }, label: "Packages" }
                        NavButton { active: matches!(current_route, Route::Items {}), onclick: move |_| { nav.push(Route::Items {}); }, label: "Items" }
                        NavButton { active: matches!(current_route, Route::Settings {}), onclick: move |_| { nav.push(Route::Settings {}); }, label: "Settings" }
                    }
                }
            }
            main { class: "app-main",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "{theme::nav_button(active)}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
