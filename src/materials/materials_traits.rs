use super::materials_model::{Material, MaterialFilters, NewMaterial, SpendingBreakdown};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for material data access.
#[async_trait]
pub trait MaterialRepositoryTrait: Send + Sync {
    /// Returns non-deleted materials with a positive delivered quantity,
    /// optionally scoped to one project, filtered by category equality and
    /// by date window. The date window matches when ANY of delivery, usage,
    /// creation or update timestamps falls inside it.
    fn get_delivered_materials(
        &self,
        project_id: Option<&str>,
        filters: &MaterialFilters,
    ) -> Result<Vec<Material>>;

    /// Purchased-value spending for a project (optionally one phase),
    /// decomposed by category.
    fn get_spending_breakdown(
        &self,
        project_id: &str,
        phase_id: Option<&str>,
    ) -> Result<SpendingBreakdown>;

    async fn create_material(&self, new_material: NewMaterial) -> Result<Material>;
}
