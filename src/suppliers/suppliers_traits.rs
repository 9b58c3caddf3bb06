use super::suppliers_model::SupplierPerformance;
use crate::errors::Result;
use crate::materials::materials_model::MaterialFilters;

/// Trait defining the contract for supplier analytics.
pub trait SupplierServiceTrait: Send + Sync {
    /// Per-supplier delivery rollup, worst variance cost first. Optionally
    /// scoped to one project.
    fn supplier_performance(
        &self,
        project_id: Option<&str>,
        filters: &MaterialFilters,
    ) -> Result<Vec<SupplierPerformance>>;
}
