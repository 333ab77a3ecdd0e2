use dioxus::prelude::*;

use crate::ui::theme::{self, Tone};

#[component]
pub fn KpiCard(title: String, value: String, description: Option<String>, tone: Option<Tone>) -> Element {
    let tone_class = tone.map(|tone| tone.class()).unwrap_or_default();
    rsx! {
        div {
            class: "{theme::PANEL} kpi",
            h3 { class: "{theme::LABEL}", "{title}" }
            p { class: "kpi-value {tone_class}", "{value}" }
            if let Some(desc) = description {
                p { class: "{theme::MUTED} kpi-description", "{desc}" }
            }
        }
    }
}
