use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{Error, Result};
use crate::projects::projects_model::{
    NewPhase, NewProject, NewProjectFinances, Phase, Project, ProjectFinances, ThresholdOverrides,
};
use crate::projects::projects_traits::ProjectRepositoryTrait;
use crate::schema::{phases, project_finances, projects};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct ProjectRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProjectRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ProjectRepository { pool, writer }
    }
}

#[async_trait]
impl ProjectRepositoryTrait for ProjectRepository {
    fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(projects::table
            .find(id.to_string())
            .first::<Project>(&mut conn)
            .optional()?)
    }

    fn get_phase(&self, id: &str) -> Result<Option<Phase>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(phases::table
            .find(id.to_string())
            .first::<Phase>(&mut conn)
            .optional()?)
    }

    fn get_project_finances(&self, project_id: &str) -> Result<Option<ProjectFinances>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(project_finances::table
            .filter(project_finances::project_id.eq(project_id.to_string()))
            .first::<ProjectFinances>(&mut conn)
            .optional()?)
    }

    async fn create_project(&self, new_project: NewProject) -> Result<Project> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Project> {
                let mut record = new_project;
                if record.id.is_none() {
                    record.id = Some(Uuid::new_v4().to_string());
                }

                diesel::insert_into(projects::table)
                    .values(&record)
                    .execute(conn)?;

                Ok(projects::table
                    .find(record.id.unwrap())
                    .first::<Project>(conn)?)
            })
            .await
    }

    async fn create_phase(&self, new_phase: NewPhase) -> Result<Phase> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Phase> {
                let mut record = new_phase;
                if record.id.is_none() {
                    record.id = Some(Uuid::new_v4().to_string());
                }

                diesel::insert_into(phases::table)
                    .values(&record)
                    .execute(conn)?;

                Ok(phases::table
                    .find(record.id.unwrap())
                    .first::<Phase>(conn)?)
            })
            .await
    }

    async fn create_project_finances(
        &self,
        new_finances: NewProjectFinances,
    ) -> Result<ProjectFinances> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<ProjectFinances> {
                    let mut record = new_finances;
                    if record.id.is_none() {
                        record.id = Some(Uuid::new_v4().to_string());
                    }

                    diesel::insert_into(project_finances::table)
                        .values(&record)
                        .execute(conn)?;

                    Ok(project_finances::table
                        .find(record.id.unwrap())
                        .first::<ProjectFinances>(conn)?)
                },
            )
            .await
    }

    async fn update_thresholds(
        &self,
        project_id: &str,
        overrides: ThresholdOverrides,
    ) -> Result<Project> {
        let id_owned = project_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Project> {
                let updated = diesel::update(projects::table.find(&id_owned))
                    .set((
                        projects::alert_variance_percentage.eq(overrides.variance_percentage),
                        projects::alert_variance_amount.eq(overrides.variance_amount),
                        projects::alert_loss_percentage.eq(overrides.loss_percentage),
                        projects::alert_loss_amount.eq(overrides.loss_amount),
                        projects::alert_wastage_percentage.eq(overrides.wastage_percentage),
                        projects::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                if updated == 0 {
                    return Err(Error::NotFound(format!("Project {}", id_owned)));
                }

                Ok(projects::table.find(&id_owned).first::<Project>(conn)?)
            })
            .await
    }
}
