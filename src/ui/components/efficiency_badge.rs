use dioxus::prelude::*;

use crate::domain::EfficiencyStatus;
use crate::ui::theme::Tone;

#[component]
pub fn EfficiencyBadge(status: EfficiencyStatus) -> Element {
    let tone = Tone::of(&status);
    let label = match &status {
        EfficiencyStatus::Evaluated(efficiency) => efficiency.percent_display(),
        EfficiencyStatus::NotApplicable => "n/a".to_string(),
        EfficiencyStatus::NotEvaluable => "Unselected".to_string(),
    };
    let title = match &status {
        EfficiencyStatus::Evaluated(efficiency) if efficiency.is_profitable => "Worth more than it costs",
        EfficiencyStatus::Evaluated(_) => "Costs more than it is worth",
        EfficiencyStatus::NotApplicable => "Package has no usable price",
        EfficiencyStatus::NotEvaluable => "Check items to evaluate this package",
    };

    rsx! {
        span {
            class: "badge {tone.class()}",
            title: title,
            "{label}"
        }
    }
}
