use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{Error, Result};
use crate::schema::discrepancies;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::discrepancy_model::{
    Discrepancy, DiscrepancyEvaluation, DiscrepancyStatus, NewDiscrepancy, ResolutionEntry,
};
use super::discrepancy_traits::DiscrepancyRepositoryTrait;

pub struct DiscrepancyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DiscrepancyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DiscrepancyRepository { pool, writer }
    }
}

#[async_trait]
impl DiscrepancyRepositoryTrait for DiscrepancyRepository {
    fn get_active_for_material(&self, material_id: &str) -> Result<Option<Discrepancy>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(discrepancies::table
            .filter(discrepancies::material_id.eq(material_id.to_string()))
            .filter(discrepancies::is_active.eq(true))
            .first::<Discrepancy>(&mut conn)
            .optional()?)
    }

    fn get_for_project(&self, project_id: &str) -> Result<Vec<Discrepancy>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(discrepancies::table
            .filter(discrepancies::project_id.eq(project_id.to_string()))
            .order(discrepancies::detected_at.desc())
            .load::<Discrepancy>(&mut conn)?)
    }

    async fn upsert_active(&self, evaluation: DiscrepancyEvaluation) -> Result<Discrepancy> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Discrepancy> {
                let now = Utc::now().naive_utc();

                // Update-then-insert on the writer connection; the partial
                // unique index on (material_id) WHERE is_active makes the
                // insert fail rather than duplicate under a race.
                let updated = diesel::update(
                    discrepancies::table
                        .filter(discrepancies::material_id.eq(&evaluation.material_id))
                        .filter(discrepancies::is_active.eq(true)),
                )
                .set((
                    discrepancies::severity.eq(evaluation.severity.as_str()),
                    discrepancies::variance.eq(evaluation.metrics.variance),
                    discrepancies::variance_percentage.eq(evaluation.metrics.variance_percentage),
                    discrepancies::variance_cost.eq(evaluation.metrics.variance_cost),
                    discrepancies::loss.eq(evaluation.metrics.loss),
                    discrepancies::loss_percentage.eq(evaluation.metrics.loss_percentage),
                    discrepancies::loss_cost.eq(evaluation.metrics.loss_cost),
                    discrepancies::wastage.eq(evaluation.metrics.wastage),
                    discrepancies::total_discrepancy_cost
                        .eq(evaluation.metrics.total_discrepancy_cost),
                    discrepancies::variance_alert.eq(evaluation.alerts.variance),
                    discrepancies::loss_alert.eq(evaluation.alerts.loss),
                    discrepancies::wastage_alert.eq(evaluation.alerts.wastage),
                    discrepancies::updated_at.eq(now),
                ))
                .execute(conn)?;

                if updated == 0 {
                    let record = NewDiscrepancy {
                        id: Uuid::new_v4().to_string(),
                        material_id: evaluation.material_id.clone(),
                        project_id: evaluation.project_id.clone(),
                        severity: evaluation.severity.as_str().to_string(),
                        variance: evaluation.metrics.variance,
                        variance_percentage: evaluation.metrics.variance_percentage,
                        variance_cost: evaluation.metrics.variance_cost,
                        loss: evaluation.metrics.loss,
                        loss_percentage: evaluation.metrics.loss_percentage,
                        loss_cost: evaluation.metrics.loss_cost,
                        wastage: evaluation.metrics.wastage,
                        total_discrepancy_cost: evaluation.metrics.total_discrepancy_cost,
                        variance_alert: evaluation.alerts.variance,
                        loss_alert: evaluation.alerts.loss,
                        wastage_alert: evaluation.alerts.wastage,
                        status: DiscrepancyStatus::Open.as_str().to_string(),
                        is_active: true,
                        resolution_history: "[]".to_string(),
                    };

                    diesel::insert_into(discrepancies::table)
                        .values(&record)
                        .execute(conn)?;
                }

                Ok(discrepancies::table
                    .filter(discrepancies::material_id.eq(&evaluation.material_id))
                    .filter(discrepancies::is_active.eq(true))
                    .first::<Discrepancy>(conn)?)
            })
            .await
    }

    async fn update_status(
        &self,
        discrepancy_id: &str,
        status: DiscrepancyStatus,
        note: Option<String>,
        user_id: &str,
    ) -> Result<Discrepancy> {
        let id_owned = discrepancy_id.to_string();
        let user_owned = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Discrepancy> {
                let now = Utc::now().naive_utc();

                let existing = discrepancies::table
                    .find(&id_owned)
                    .first::<Discrepancy>(conn)
                    .optional()?
                    .ok_or_else(|| Error::NotFound(format!("Discrepancy {}", id_owned)))?;

                let mut history = existing.resolution_entries();
                history.push(ResolutionEntry {
                    status,
                    note,
                    user_id: user_owned,
                    recorded_at: now,
                });
                let history_json = serde_json::to_string(&history)?;

                diesel::update(discrepancies::table.find(&id_owned))
                    .set((
                        discrepancies::status.eq(status.as_str()),
                        discrepancies::is_active.eq(!status.is_closed()),
                        discrepancies::resolution_history.eq(history_json),
                        discrepancies::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                Ok(discrepancies::table
                    .find(&id_owned)
                    .first::<Discrepancy>(conn)?)
            })
            .await
    }
}
