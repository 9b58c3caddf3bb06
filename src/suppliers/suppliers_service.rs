use std::collections::HashMap;
use std::sync::Arc;

use log::error;

use crate::constants::UNKNOWN_SUPPLIER;
use crate::discrepancy::discrepancy_metrics::{
    calculate_variance, calculate_variance_cost, calculate_variance_percentage, round_currency,
};
use crate::errors::Result;
use crate::materials::materials_model::MaterialFilters;
use crate::materials::materials_traits::MaterialRepositoryTrait;

use super::suppliers_model::SupplierPerformance;
use super::suppliers_traits::SupplierServiceTrait;

pub struct SupplierService {
    material_repository: Arc<dyn MaterialRepositoryTrait>,
}

impl SupplierService {
    pub fn new(material_repository: Arc<dyn MaterialRepositoryTrait>) -> Self {
        SupplierService {
            material_repository,
        }
    }
}

impl SupplierServiceTrait for SupplierService {
    fn supplier_performance(
        &self,
        project_id: Option<&str>,
        filters: &MaterialFilters,
    ) -> Result<Vec<SupplierPerformance>> {
        let materials = match self
            .material_repository
            .get_delivered_materials(project_id, filters)
        {
            Ok(materials) => materials,
            Err(e) => {
                error!("Supplier performance aggregation failed: {}", e);
                return Ok(Vec::new());
            }
        };

        struct Bucket {
            count: u32,
            purchased: f64,
            delivered: f64,
            variance: f64,
            variance_cost: f64,
            variance_pct_sum: f64,
        }

        let mut buckets: HashMap<String, Bucket> = HashMap::new();

        for material in &materials {
            let supplier = material
                .supplier_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_SUPPLIER.to_string());
            let bucket = buckets.entry(supplier).or_insert(Bucket {
                count: 0,
                purchased: 0.0,
                delivered: 0.0,
                variance: 0.0,
                variance_cost: 0.0,
                variance_pct_sum: 0.0,
            });

            let purchased = material.purchased();
            let delivered = material.delivered();
            bucket.count += 1;
            bucket.purchased += purchased;
            bucket.delivered += delivered;
            bucket.variance += calculate_variance(purchased, delivered);
            bucket.variance_cost +=
                calculate_variance_cost(purchased, delivered, material.cost_per_unit());
            bucket.variance_pct_sum += calculate_variance_percentage(purchased, delivered);
        }

        let mut performance: Vec<SupplierPerformance> = buckets
            .into_iter()
            .map(|(supplier_name, bucket)| {
                let purchased_basis = if bucket.purchased > 0.0 {
                    bucket.purchased
                } else {
                    1.0
                };
                SupplierPerformance {
                    supplier_name,
                    material_count: bucket.count,
                    total_purchased: bucket.purchased,
                    total_delivered: bucket.delivered,
                    total_variance: bucket.variance,
                    total_variance_cost: round_currency(bucket.variance_cost),
                    average_variance_percentage: round_currency(
                        bucket.variance_pct_sum / bucket.count as f64,
                    ),
                    delivery_accuracy: round_currency(
                        bucket.delivered / purchased_basis * 100.0,
                    ),
                }
            })
            .collect();

        performance.sort_by(|a, b| b.total_variance_cost.total_cmp(&a.total_variance_cost));

        Ok(performance)
    }
}
