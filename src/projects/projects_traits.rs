use super::projects_model::{
    NewPhase, NewProject, NewProjectFinances, Phase, Project, ProjectFinances, ThresholdOverrides,
};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for project/phase/finances data access.
#[async_trait]
pub trait ProjectRepositoryTrait: Send + Sync {
    fn get_project(&self, id: &str) -> Result<Option<Project>>;
    fn get_phase(&self, id: &str) -> Result<Option<Phase>>;
    fn get_project_finances(&self, project_id: &str) -> Result<Option<ProjectFinances>>;

    async fn create_project(&self, new_project: NewProject) -> Result<Project>;
    async fn create_phase(&self, new_phase: NewPhase) -> Result<Phase>;
    async fn create_project_finances(
        &self,
        new_finances: NewProjectFinances,
    ) -> Result<ProjectFinances>;

    /// Replaces the project's threshold overrides. Takes effect on the next
    /// scan; historical discrepancy records are untouched.
    async fn update_thresholds(
        &self,
        project_id: &str,
        overrides: ThresholdOverrides,
    ) -> Result<Project>;
}
