use crate::db::WriteHandle;
use crate::errors::{Error, Result};
use crate::materials::materials_repository::spending_breakdown;
use crate::projects::projects_model::{Phase, Project, ProjectFinances};
use crate::schema::{phases, project_finances, projects};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use super::activation_model::{ActivationOutcome, BudgetBaseline, CapitalBaseline};
use super::activation_service::needs_activation;
use super::activation_traits::ActivationRepositoryTrait;

/// Activation captures run entirely on the writer connection: the guard
/// check, baseline aggregation and conditional update happen in one job, and
/// the UPDATE itself re-checks `activated_at IS NULL` so a lost race
/// surfaces as zero updated rows instead of a second capture.
pub struct ActivationRepository {
    writer: WriteHandle,
}

impl ActivationRepository {
    pub fn new(writer: WriteHandle) -> Self {
        ActivationRepository { writer }
    }
}

#[async_trait]
impl ActivationRepositoryTrait for ActivationRepository {
    async fn activate_project_budget(
        &self,
        project_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>> {
        let id_owned = project_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<ActivationOutcome<BudgetBaseline>> {
                    let project = projects::table
                        .find(&id_owned)
                        .first::<Project>(conn)
                        .optional()?
                        .ok_or_else(|| Error::NotFound(format!("Project {}", id_owned)))?;

                    if project.budget_activated_at.is_some() {
                        return Ok(ActivationOutcome::AlreadyActivated);
                    }
                    if !needs_activation(project.budget, project.budget_activated_at, new_budget) {
                        return Ok(ActivationOutcome::NotRequired);
                    }

                    let baseline_breakdown = spending_breakdown(conn, &id_owned, None)?;
                    let baseline = BudgetBaseline {
                        total_spending: baseline_breakdown.total,
                        by_category: baseline_breakdown.by_category,
                    };
                    let now = Utc::now().naive_utc();

                    let updated = diesel::update(
                        projects::table
                            .find(&id_owned)
                            .filter(projects::budget_activated_at.is_null()),
                    )
                    .set((
                        projects::budget_activated_at.eq(now),
                        projects::pre_budget_spending.eq(baseline.total_spending),
                        projects::pre_budget_breakdown
                            .eq(serde_json::to_string(&baseline.by_category)?),
                        projects::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                    if updated == 0 {
                        return Ok(ActivationOutcome::AlreadyActivated);
                    }

                    Ok(ActivationOutcome::Activated { at: now, baseline })
                },
            )
            .await
    }

    async fn activate_phase_budget(
        &self,
        phase_id: &str,
        new_budget: f64,
    ) -> Result<ActivationOutcome<BudgetBaseline>> {
        let id_owned = phase_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<ActivationOutcome<BudgetBaseline>> {
                    let phase = phases::table
                        .find(&id_owned)
                        .first::<Phase>(conn)
                        .optional()?
                        .ok_or_else(|| Error::NotFound(format!("Phase {}", id_owned)))?;

                    if phase.budget_activated_at.is_some() {
                        return Ok(ActivationOutcome::AlreadyActivated);
                    }
                    if !needs_activation(phase.budget, phase.budget_activated_at, new_budget) {
                        return Ok(ActivationOutcome::NotRequired);
                    }

                    let baseline_breakdown =
                        spending_breakdown(conn, &phase.project_id, Some(&id_owned))?;
                    let baseline = BudgetBaseline {
                        total_spending: baseline_breakdown.total,
                        by_category: baseline_breakdown.by_category,
                    };
                    let now = Utc::now().naive_utc();

                    let updated = diesel::update(
                        phases::table
                            .find(&id_owned)
                            .filter(phases::budget_activated_at.is_null()),
                    )
                    .set((
                        phases::budget_activated_at.eq(now),
                        phases::pre_budget_spending.eq(baseline.total_spending),
                        phases::pre_budget_breakdown
                            .eq(serde_json::to_string(&baseline.by_category)?),
                        phases::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                    if updated == 0 {
                        return Ok(ActivationOutcome::AlreadyActivated);
                    }

                    Ok(ActivationOutcome::Activated { at: now, baseline })
                },
            )
            .await
    }

    async fn activate_project_capital(
        &self,
        project_id: &str,
        new_capital: f64,
    ) -> Result<ActivationOutcome<CapitalBaseline>> {
        let id_owned = project_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<ActivationOutcome<CapitalBaseline>> {
                    let finances = project_finances::table
                        .filter(project_finances::project_id.eq(&id_owned))
                        .first::<ProjectFinances>(conn)
                        .optional()?
                        .ok_or_else(|| {
                            Error::NotFound(format!("Finances for project {}", id_owned))
                        })?;

                    if finances.capital_activated_at.is_some() {
                        return Ok(ActivationOutcome::AlreadyActivated);
                    }
                    if !needs_activation(
                        finances.capital,
                        finances.capital_activated_at,
                        new_capital,
                    ) {
                        return Ok(ActivationOutcome::NotRequired);
                    }

                    let baseline = CapitalBaseline {
                        used: finances.capital_used,
                        committed: finances.capital_committed,
                    };
                    let now = Utc::now().naive_utc();

                    let updated = diesel::update(
                        project_finances::table
                            .find(&finances.id)
                            .filter(project_finances::capital_activated_at.is_null()),
                    )
                    .set((
                        project_finances::capital_activated_at.eq(now),
                        project_finances::pre_capital_used.eq(baseline.used),
                        project_finances::pre_capital_committed.eq(baseline.committed),
                        project_finances::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                    if updated == 0 {
                        return Ok(ActivationOutcome::AlreadyActivated);
                    }

                    Ok(ActivationOutcome::Activated { at: now, baseline })
                },
            )
            .await
    }
}
