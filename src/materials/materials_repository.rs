use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::materials::materials_model::{Material, MaterialFilters, NewMaterial, SpendingBreakdown};
use crate::materials::materials_traits::MaterialRepositoryTrait;
use crate::schema::materials;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct MaterialRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MaterialRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MaterialRepository { pool, writer }
    }
}

#[async_trait]
impl MaterialRepositoryTrait for MaterialRepository {
    fn get_delivered_materials(
        &self,
        project_id: Option<&str>,
        filters: &MaterialFilters,
    ) -> Result<Vec<Material>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = materials::table
            .filter(materials::is_deleted.eq(false))
            .filter(materials::quantity_delivered.gt(0.0))
            .into_boxed();

        if let Some(project_id) = project_id {
            query = query.filter(materials::project_id.eq(project_id.to_string()));
        }
        if let Some(category) = &filters.category {
            query = query.filter(materials::category.eq(category.clone()));
        }

        let loaded = query.load::<Material>(&mut conn)?;

        // The date window is permissive: a material qualifies when any of
        // its delivery/usage/created/updated timestamps falls in range.
        Ok(loaded
            .into_iter()
            .filter(|m| matches_date_window(m, filters.start_date, filters.end_date))
            .collect())
    }

    fn get_spending_breakdown(
        &self,
        project_id: &str,
        phase_id: Option<&str>,
    ) -> Result<SpendingBreakdown> {
        let mut conn = get_connection(&self.pool)?;
        spending_breakdown(&mut conn, project_id, phase_id)
    }

    async fn create_material(&self, new_material: NewMaterial) -> Result<Material> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Material> {
                let mut record = new_material;
                if record.id.is_none() {
                    record.id = Some(Uuid::new_v4().to_string());
                }

                diesel::insert_into(materials::table)
                    .values(&record)
                    .execute(conn)?;

                Ok(materials::table
                    .find(record.id.unwrap())
                    .first::<Material>(conn)?)
            })
            .await
    }
}

fn matches_date_window(
    material: &Material,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }

    let in_window = |ts: NaiveDateTime| {
        start.map_or(true, |s| ts >= s) && end.map_or(true, |e| ts <= e)
    };

    material.date_delivered.map_or(false, in_window)
        || material.date_used.map_or(false, in_window)
        || in_window(material.created_at)
        || in_window(material.updated_at)
}

/// Shared with the activation repository so baseline capture can run the
/// same aggregation on the writer connection.
pub(crate) fn spending_breakdown(
    conn: &mut SqliteConnection,
    project_id: &str,
    phase_id: Option<&str>,
) -> Result<SpendingBreakdown> {
    let mut query = materials::table
        .filter(materials::is_deleted.eq(false))
        .filter(materials::project_id.eq(project_id.to_string()))
        .into_boxed();

    if let Some(phase_id) = phase_id {
        query = query.filter(materials::phase_id.eq(phase_id.to_string()));
    }

    let loaded = query.load::<Material>(conn)?;

    let mut by_category: HashMap<String, f64> = HashMap::new();
    let mut total = 0.0;
    for material in &loaded {
        let spent = material.purchased() * material.cost_per_unit();
        if !spent.is_finite() || spent <= 0.0 {
            continue;
        }
        let category = material
            .category
            .clone()
            .unwrap_or_else(|| crate::constants::UNCATEGORIZED_CATEGORY.to_string());
        *by_category.entry(category).or_insert(0.0) += spent;
        total += spent;
    }

    Ok(SpendingBreakdown { total, by_category })
}
