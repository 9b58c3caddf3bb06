use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Datelike;
use log::{debug, error};

use crate::constants::UNCATEGORIZED_CATEGORY;
use crate::errors::Result;
use crate::materials::materials_model::{Material, MaterialFilters};
use crate::materials::materials_traits::MaterialRepositoryTrait;
use crate::projects::projects_traits::ProjectRepositoryTrait;

use super::discrepancy_classifier::evaluate_material;
use super::discrepancy_metrics::round_currency;
use super::discrepancy_model::{
    CategoryDiscrepancyAnalysis, DiscrepancyEvaluation, DiscrepancyThresholds,
    MonthlyDiscrepancyTrend, ProjectDiscrepancySummary, SeverityCounts,
};
use super::discrepancy_traits::DiscrepancyServiceTrait;

pub struct DiscrepancyService {
    material_repository: Arc<dyn MaterialRepositoryTrait>,
    project_repository: Arc<dyn ProjectRepositoryTrait>,
}

impl DiscrepancyService {
    pub fn new(
        material_repository: Arc<dyn MaterialRepositoryTrait>,
        project_repository: Arc<dyn ProjectRepositoryTrait>,
    ) -> Self {
        DiscrepancyService {
            material_repository,
            project_repository,
        }
    }

    /// Loads the delivered population for a project and classifies every
    /// material. Missing project yields an empty population so dashboards
    /// keep rendering.
    fn evaluate_population(
        &self,
        project_id: &str,
        thresholds: Option<DiscrepancyThresholds>,
        filters: &MaterialFilters,
    ) -> Result<Vec<(Material, DiscrepancyEvaluation)>> {
        let thresholds = match thresholds {
            Some(t) => t,
            None => match self.project_repository.get_project(project_id)? {
                Some(project) => project.thresholds(),
                None => {
                    debug!("Project {} not found, scanning nothing", project_id);
                    return Ok(Vec::new());
                }
            },
        };

        let materials = self
            .material_repository
            .get_delivered_materials(Some(project_id), filters)?;

        Ok(materials
            .into_iter()
            .map(|material| {
                let evaluation = evaluate_material(&material, &thresholds);
                (material, evaluation)
            })
            .collect())
    }
}

impl DiscrepancyServiceTrait for DiscrepancyService {
    fn scan(
        &self,
        project_id: &str,
        thresholds: Option<DiscrepancyThresholds>,
        filters: &MaterialFilters,
    ) -> Result<Vec<DiscrepancyEvaluation>> {
        match self.evaluate_population(project_id, thresholds, filters) {
            Ok(population) => Ok(population
                .into_iter()
                .map(|(_, evaluation)| evaluation)
                .filter(|e| e.alerts.has_any_alert)
                .collect()),
            Err(e) => {
                error!("Discrepancy scan failed for project {}: {}", project_id, e);
                Ok(Vec::new())
            }
        }
    }

    fn summarize(
        &self,
        project_id: &str,
        filters: &MaterialFilters,
    ) -> Result<ProjectDiscrepancySummary> {
        let population = match self.evaluate_population(project_id, None, filters) {
            Ok(population) => population,
            Err(e) => {
                error!(
                    "Discrepancy summary failed for project {}: {}",
                    project_id, e
                );
                return Ok(ProjectDiscrepancySummary::empty(project_id));
            }
        };

        if population.is_empty() {
            return Ok(ProjectDiscrepancySummary::empty(project_id));
        }

        let mut summary = ProjectDiscrepancySummary::empty(project_id);
        let mut wastage_sum = 0.0;
        let mut severity_counts = SeverityCounts::default();

        for (_, evaluation) in &population {
            summary.total_materials += 1;
            summary.total_variance += evaluation.metrics.variance;
            summary.total_loss += evaluation.metrics.loss;
            summary.total_variance_cost += evaluation.metrics.variance_cost;
            summary.total_loss_cost += evaluation.metrics.loss_cost;
            summary.total_discrepancy_cost += evaluation.metrics.total_discrepancy_cost;
            wastage_sum += evaluation.metrics.wastage;

            if evaluation.alerts.has_any_alert {
                summary.flagged_materials += 1;
            }
            severity_counts.record(evaluation.severity);
        }

        // Wastage averages over everything scanned, not just flagged rows.
        summary.average_wastage_percentage =
            round_currency(wastage_sum / summary.total_materials as f64);
        summary.total_variance_cost = round_currency(summary.total_variance_cost);
        summary.total_loss_cost = round_currency(summary.total_loss_cost);
        summary.total_discrepancy_cost = round_currency(summary.total_discrepancy_cost);
        summary.severity_counts = severity_counts;

        Ok(summary)
    }

    fn trends(
        &self,
        project_id: &str,
        filters: &MaterialFilters,
    ) -> Result<Vec<MonthlyDiscrepancyTrend>> {
        let population = match self.evaluate_population(project_id, None, filters) {
            Ok(population) => population,
            Err(e) => {
                error!(
                    "Discrepancy trends failed for project {}: {}",
                    project_id, e
                );
                return Ok(Vec::new());
            }
        };

        struct Bucket {
            count: u32,
            variance: f64,
            loss: f64,
            wastage_sum: f64,
            cost: f64,
        }

        // BTreeMap keeps "YYYY-MM" keys chronologically sorted.
        let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

        for (material, evaluation) in &population {
            let entry = material.entry_date();
            let month = format!("{}-{:02}", entry.year(), entry.month());
            let bucket = buckets.entry(month).or_insert(Bucket {
                count: 0,
                variance: 0.0,
                loss: 0.0,
                wastage_sum: 0.0,
                cost: 0.0,
            });
            bucket.count += 1;
            bucket.variance += evaluation.metrics.variance;
            bucket.loss += evaluation.metrics.loss;
            bucket.wastage_sum += evaluation.metrics.wastage;
            bucket.cost += evaluation.metrics.total_discrepancy_cost;
        }

        Ok(buckets
            .into_iter()
            .map(|(month, bucket)| MonthlyDiscrepancyTrend {
                month,
                total_materials: bucket.count,
                total_variance: bucket.variance,
                total_loss: bucket.loss,
                average_wastage_percentage: round_currency(
                    bucket.wastage_sum / bucket.count as f64,
                ),
                total_discrepancy_cost: round_currency(bucket.cost),
            })
            .collect())
    }

    fn category_analysis(
        &self,
        project_id: &str,
        filters: &MaterialFilters,
    ) -> Result<Vec<CategoryDiscrepancyAnalysis>> {
        let population = match self.evaluate_population(project_id, None, filters) {
            Ok(population) => population,
            Err(e) => {
                error!(
                    "Category analysis failed for project {}: {}",
                    project_id, e
                );
                return Ok(Vec::new());
            }
        };

        struct Bucket {
            total: u32,
            flagged: u32,
            variance: f64,
            loss: f64,
            wastage_sum: f64,
            cost: f64,
        }

        let mut buckets: HashMap<String, Bucket> = HashMap::new();

        for (material, evaluation) in &population {
            let category = material
                .category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED_CATEGORY.to_string());
            let bucket = buckets.entry(category).or_insert(Bucket {
                total: 0,
                flagged: 0,
                variance: 0.0,
                loss: 0.0,
                wastage_sum: 0.0,
                cost: 0.0,
            });
            bucket.total += 1;
            if evaluation.alerts.has_any_alert {
                bucket.flagged += 1;
            }
            bucket.variance += evaluation.metrics.variance;
            bucket.loss += evaluation.metrics.loss;
            bucket.wastage_sum += evaluation.metrics.wastage;
            bucket.cost += evaluation.metrics.total_discrepancy_cost;
        }

        let mut analysis: Vec<CategoryDiscrepancyAnalysis> = buckets
            .into_iter()
            .map(|(category, bucket)| CategoryDiscrepancyAnalysis {
                category,
                total_materials: bucket.total,
                materials_with_issues: bucket.flagged,
                issue_rate: round_currency(bucket.flagged as f64 / bucket.total as f64 * 100.0),
                total_variance: bucket.variance,
                total_loss: bucket.loss,
                average_wastage_percentage: round_currency(bucket.wastage_sum / bucket.total as f64),
                total_discrepancy_cost: round_currency(bucket.cost),
            })
            .collect();

        analysis.sort_by(|a, b| {
            b.total_discrepancy_cost
                .total_cmp(&a.total_discrepancy_cost)
        });

        Ok(analysis)
    }
}
