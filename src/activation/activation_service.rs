use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::debug;

use crate::discrepancy::discrepancy_metrics::round_currency;
use crate::errors::{Error, Result};
use crate::materials::materials_traits::MaterialRepositoryTrait;
use crate::projects::projects_traits::ProjectRepositoryTrait;

use super::activation_model::{
    capital_activation, ActivationOutcome, ActivationState, BudgetBaseline, CapitalBaseline,
    CapitalUsage, EffectiveSpending,
};
use super::activation_traits::{ActivationRepositoryTrait, ActivationServiceTrait};

/// Zero-to-positive transition guard: a baseline capture is due only when
/// the new value is strictly positive, no capture was recorded before, and
/// the stored value is still zero or absent.
pub fn needs_activation(
    current_value: Option<f64>,
    activated_at: Option<NaiveDateTime>,
    new_value: f64,
) -> bool {
    new_value > 0.0 && activated_at.is_none() && current_value.map_or(true, |v| v == 0.0)
}

pub struct ActivationService {
    activation_repository: Arc<dyn ActivationRepositoryTrait>,
    project_repository: Arc<dyn ProjectRepositoryTrait>,
    material_repository: Arc<dyn MaterialRepositoryTrait>,
}

impl ActivationService {
    pub fn new(
        activation_repository: Arc<dyn ActivationRepositoryTrait>,
        project_repository: Arc<dyn ProjectRepositoryTrait>,
        material_repository: Arc<dyn MaterialRepositoryTrait>,
    ) -> Self {
        ActivationService {
            activation_repository,
            project_repository,
            material_repository,
        }
    }
}

#[async_trait]
impl ActivationServiceTrait for ActivationService {
    async fn ensure_project_budget_activation(
        &self,
        project_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>> {
        let outcome = self
            .activation_repository
            .activate_project_budget(project_id, new_budget)
            .await?;
        if let ActivationOutcome::Activated { at, .. } = &outcome {
            debug!("Project {} budget baseline captured at {}", project_id, at);
        }
        Ok(outcome)
    }

    async fn ensure_phase_budget_activation(
        &self,
        phase_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>> {
        let outcome = self
            .activation_repository
            .activate_phase_budget(phase_id, new_budget)
            .await?;
        if let ActivationOutcome::Activated { at, .. } = &outcome {
            debug!("Phase {} budget baseline captured at {}", phase_id, at);
        }
        Ok(outcome)
    }

    async fn ensure_capital_activation(
        &self,
        project_id: &str,
        new_capital: f64,
    ) -> Result<ActivationOutcome<CapitalBaseline>> {
        let outcome = self
            .activation_repository
            .activate_project_capital(project_id, new_capital)
            .await?;
        if let ActivationOutcome::Activated { at, .. } = &outcome {
            debug!("Project {} capital baseline captured at {}", project_id, at);
        }
        Ok(outcome)
    }

    fn effective_project_spending(&self, project_id: &str) -> Result<EffectiveSpending> {
        let project = self
            .project_repository
            .get_project(project_id)?
            .ok_or_else(|| Error::NotFound(format!("Project {}", project_id)))?;

        let current = self
            .material_repository
            .get_spending_breakdown(project_id, None)?
            .total;
        let baseline = project.pre_budget_spending.unwrap_or(0.0);

        Ok(EffectiveSpending {
            current_spending: round_currency(current),
            baseline: round_currency(baseline),
            effective_spending: round_currency((current - baseline).max(0.0)),
        })
    }

    fn capital_usage(&self, project_id: &str) -> Result<CapitalUsage> {
        let finances = self
            .project_repository
            .get_project_finances(project_id)?
            .ok_or_else(|| Error::NotFound(format!("Finances for project {}", project_id)))?;

        // Deliberately un-offset: capital checks always see true usage.
        let baseline = match capital_activation(&finances) {
            ActivationState::Activated { baseline, .. } => Some(baseline),
            ActivationState::NotActivated => None,
        };

        Ok(CapitalUsage {
            capital_used: finances.capital_used,
            capital_committed: finances.capital_committed,
            baseline,
        })
    }
}
