use super::activation_model::{
    ActivationOutcome, BudgetBaseline, CapitalBaseline, CapitalUsage, EffectiveSpending,
};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for atomic activation captures. Each method
/// performs the already-activated check and the baseline write as one
/// conditional update so concurrent calls cannot both capture.
#[async_trait]
pub trait ActivationRepositoryTrait: Send + Sync {
    async fn activate_project_budget(
        &self,
        project_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>>;

    async fn activate_phase_budget(
        &self,
        phase_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>>;

    async fn activate_project_capital(
        &self,
        project_id: &str,
        new_capital: f64,
    ) -> Result<ActivationOutcome<CapitalBaseline>>;
}

/// Trait defining the contract for the activation tracker consulted before
/// any budget or capital value is set.
#[async_trait]
pub trait ActivationServiceTrait: Send + Sync {
    async fn ensure_project_budget_activation(
        &self,
        project_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>>;

    async fn ensure_phase_budget_activation(
        &self,
        phase_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>>;

    async fn ensure_capital_activation(
        &self,
        project_id: &str,
        new_capital: f64,
    ) -> Result<ActivationOutcome<CapitalBaseline>>;

    /// Current material spending offset by the captured budget baseline.
    fn effective_project_spending(&self, project_id: &str) -> Result<EffectiveSpending>;

    /// True capital usage; the baseline rides along for reporting only.
    fn capital_usage(&self, project_id: &str) -> Result<CapitalUsage>;
}
