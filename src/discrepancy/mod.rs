pub mod discrepancy_classifier;
pub mod discrepancy_metrics;
pub mod discrepancy_model;
pub mod discrepancy_repository;
pub mod discrepancy_service;
pub mod discrepancy_traits;

pub use discrepancy_classifier::evaluate_material;
pub use discrepancy_model::{
    CategoryDiscrepancyAnalysis, Discrepancy, DiscrepancyAlerts, DiscrepancyEvaluation,
    DiscrepancyMetrics, DiscrepancyStatus, DiscrepancyThresholds, MonthlyDiscrepancyTrend,
    ProjectDiscrepancySummary, ResolutionEntry, Severity, SeverityCounts,
};
pub use discrepancy_repository::DiscrepancyRepository;
pub use discrepancy_service::DiscrepancyService;
pub use discrepancy_traits::{DiscrepancyRepositoryTrait, DiscrepancyServiceTrait};
