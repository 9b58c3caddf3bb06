use super::discrepancy_model::{
    CategoryDiscrepancyAnalysis, Discrepancy, DiscrepancyEvaluation, DiscrepancyStatus,
    DiscrepancyThresholds, MonthlyDiscrepancyTrend, ProjectDiscrepancySummary,
};
use crate::errors::Result;
use crate::materials::materials_model::MaterialFilters;
use async_trait::async_trait;

/// Trait defining the contract for discrepancy record persistence.
#[async_trait]
pub trait DiscrepancyRepositoryTrait: Send + Sync {
    fn get_active_for_material(&self, material_id: &str) -> Result<Option<Discrepancy>>;
    fn get_for_project(&self, project_id: &str) -> Result<Vec<Discrepancy>>;

    /// Upsert keyed on (material_id, is_active): a still-flagged material
    /// refreshes its active record in place, otherwise a new open record is
    /// inserted. Status and resolution history are never touched here.
    async fn upsert_active(&self, evaluation: DiscrepancyEvaluation) -> Result<Discrepancy>;

    /// Human resolution action: sets the status and appends to the
    /// resolution trail. Closed statuses release the active-record slot.
    async fn update_status(
        &self,
        discrepancy_id: &str,
        status: DiscrepancyStatus,
        note: Option<String>,
        user_id: &str,
    ) -> Result<Discrepancy>;
}

/// Trait defining the contract for discrepancy scanning and analytics.
/// Every operation re-runs classification against the thresholds in force
/// at call time; nothing is cached between calls.
pub trait DiscrepancyServiceTrait: Send + Sync {
    /// Flagged materials only.
    fn scan(
        &self,
        project_id: &str,
        thresholds: Option<DiscrepancyThresholds>,
        filters: &MaterialFilters,
    ) -> Result<Vec<DiscrepancyEvaluation>>;

    /// Rollup over the full scanned population.
    fn summarize(
        &self,
        project_id: &str,
        filters: &MaterialFilters,
    ) -> Result<ProjectDiscrepancySummary>;

    /// Calendar-month buckets, ascending.
    fn trends(
        &self,
        project_id: &str,
        filters: &MaterialFilters,
    ) -> Result<Vec<MonthlyDiscrepancyTrend>>;

    /// Per-category buckets, worst cost first.
    fn category_analysis(
        &self,
        project_id: &str,
        filters: &MaterialFilters,
    ) -> Result<Vec<CategoryDiscrepancyAnalysis>>;
}
