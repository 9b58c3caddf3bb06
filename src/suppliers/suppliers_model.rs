use serde::{Deserialize, Serialize};

/// Delivery-performance rollup for one supplier over the scanned population.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPerformance {
    pub supplier_name: String,
    pub material_count: u32,
    pub total_purchased: f64,
    pub total_delivered: f64,
    pub total_variance: f64,
    pub total_variance_cost: f64,
    pub average_variance_percentage: f64,
    /// delivered / purchased × 100. A zero purchased total is treated as 1
    /// so the ratio reports near-zero accuracy instead of failing.
    pub delivery_accuracy: f64,
}
