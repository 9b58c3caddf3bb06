use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::projects::projects_model::{Phase, Project, ProjectFinances};

/// Baseline captured when a zero budget first becomes non-zero: the material
/// spending that already existed and must not count against the new limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBaseline {
    pub total_spending: f64,
    pub by_category: HashMap<String, f64>,
}

/// Baseline captured when capital tracking is first activated. Exposed for
/// reporting only; capital validations always see true usage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapitalBaseline {
    pub used: f64,
    pub committed: f64,
}

/// Write-once activation state of a budget or capital entity. The
/// `Activated` variant is terminal.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum ActivationState<B> {
    NotActivated,
    Activated { at: NaiveDateTime, baseline: B },
}

impl<B> ActivationState<B> {
    pub fn is_activated(&self) -> bool {
        matches!(self, ActivationState::Activated { .. })
    }
}

/// Result of one activation attempt.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum ActivationOutcome<B> {
    /// This call performed the one-time capture.
    Activated { at: NaiveDateTime, baseline: B },
    /// The entity was activated earlier (possibly by a concurrent call).
    AlreadyActivated,
    /// Not a zero-to-positive transition; nothing to capture.
    NotRequired,
}

/// Spending figures offset by the activation baseline, for budget checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSpending {
    pub current_spending: f64,
    pub baseline: f64,
    /// max(0, current − baseline)
    pub effective_spending: f64,
}

/// True capital usage plus the informational baseline, if captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalUsage {
    pub capital_used: f64,
    pub capital_committed: f64,
    pub baseline: Option<CapitalBaseline>,
}

pub fn project_budget_activation(project: &Project) -> ActivationState<BudgetBaseline> {
    match project.budget_activated_at {
        Some(at) => ActivationState::Activated {
            at,
            baseline: BudgetBaseline {
                total_spending: project.pre_budget_spending.unwrap_or(0.0),
                by_category: parse_breakdown(project.pre_budget_breakdown.as_deref()),
            },
        },
        None => ActivationState::NotActivated,
    }
}

pub fn phase_budget_activation(phase: &Phase) -> ActivationState<BudgetBaseline> {
    match phase.budget_activated_at {
        Some(at) => ActivationState::Activated {
            at,
            baseline: BudgetBaseline {
                total_spending: phase.pre_budget_spending.unwrap_or(0.0),
                by_category: parse_breakdown(phase.pre_budget_breakdown.as_deref()),
            },
        },
        None => ActivationState::NotActivated,
    }
}

pub fn capital_activation(finances: &ProjectFinances) -> ActivationState<CapitalBaseline> {
    match finances.capital_activated_at {
        Some(at) => ActivationState::Activated {
            at,
            baseline: CapitalBaseline {
                used: finances.pre_capital_used.unwrap_or(0.0),
                committed: finances.pre_capital_committed.unwrap_or(0.0),
            },
        },
        None => ActivationState::NotActivated,
    }
}

fn parse_breakdown(json: Option<&str>) -> HashMap<String, f64> {
    json.and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}
