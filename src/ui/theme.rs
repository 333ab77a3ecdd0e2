//! Class helpers so every surface colours efficiency the same way.

use crate::domain::EfficiencyStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Profit,
    Loss,
    Neutral,
    Warning,
}

impl Tone {
    pub fn of(status: &EfficiencyStatus) -> Self {
        match status {
            EfficiencyStatus::Evaluated(efficiency) if efficiency.is_profitable => Tone::Profit,
            EfficiencyStatus::Evaluated(_) => Tone::Loss,
            EfficiencyStatus::NotApplicable => Tone::Warning,
            EfficiencyStatus::NotEvaluable => Tone::Neutral,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Tone::Profit => "tone-profit",
            Tone::Loss => "tone-loss",
            Tone::Neutral => "tone-neutral",
            Tone::Warning => "tone-warning",
        }
    }
}

// ============================================
// BUTTON STYLES
// ============================================

pub const BTN_PRIMARY: &str = "btn btn-primary";
pub const BTN_SECONDARY: &str = "btn btn-secondary";
pub const BTN_DANGER: &str = "btn btn-danger";
pub const BTN_WARNING: &str = "btn btn-warning";
pub const BTN_SMALL: &str = "btn-small";

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-button nav-button-active"
    } else {
        "nav-button"
    }
}

// ============================================
// PANEL / INPUT STYLES
// ============================================

pub const PANEL: &str = "panel";
pub const INPUT: &str = "input";
pub const LABEL: &str = "label";
pub const MUTED: &str = "text-muted";

pub fn card(tone: Tone, custom: bool) -> String {
    let mut class = format!("card {}", tone.class());
    if custom {
        class.push_str(" card-custom");
    }
    if tone == Tone::Neutral {
        class.push_str(" card-dimmed");
    }
    class
}

pub fn checklist_row(checked: bool) -> &'static str {
    if checked {
        "checklist-row checklist-row-checked"
    } else {
        "checklist-row"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compute_efficiency;

    #[test]
    fn tone_follows_status() {
        let profit = compute_efficiency(100, 10.0, 7.5).unwrap();
        let loss = compute_efficiency(1, 10.0, 7.5).unwrap();
        assert_eq!(Tone::of(&EfficiencyStatus::Evaluated(profit)), Tone::Profit);
        assert_eq!(Tone::of(&EfficiencyStatus::Evaluated(loss)), Tone::Loss);
        assert_eq!(Tone::of(&EfficiencyStatus::NotApplicable), Tone::Warning);
        assert_eq!(card(Tone::Neutral, true), "card tone-neutral card-custom card-dimmed");
    }
}
