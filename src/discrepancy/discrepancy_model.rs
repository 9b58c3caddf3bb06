use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOSS_AMOUNT_THRESHOLD, DEFAULT_LOSS_PERCENTAGE_THRESHOLD,
    DEFAULT_VARIANCE_AMOUNT_THRESHOLD, DEFAULT_VARIANCE_PERCENTAGE_THRESHOLD,
    DEFAULT_WASTAGE_PERCENTAGE_THRESHOLD,
};
use crate::projects::projects_model::ThresholdOverrides;

/// Effective threshold set used by one scan. Always fully populated;
/// project overrides are merged over defaults up front so classification
/// stays referentially transparent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyThresholds {
    pub variance_percentage: f64,
    pub variance_amount: f64,
    pub loss_percentage: f64,
    pub loss_amount: f64,
    pub wastage_percentage: f64,
}

impl Default for DiscrepancyThresholds {
    fn default() -> Self {
        DiscrepancyThresholds {
            variance_percentage: DEFAULT_VARIANCE_PERCENTAGE_THRESHOLD,
            variance_amount: DEFAULT_VARIANCE_AMOUNT_THRESHOLD,
            loss_percentage: DEFAULT_LOSS_PERCENTAGE_THRESHOLD,
            loss_amount: DEFAULT_LOSS_AMOUNT_THRESHOLD,
            wastage_percentage: DEFAULT_WASTAGE_PERCENTAGE_THRESHOLD,
        }
    }
}

impl DiscrepancyThresholds {
    pub fn merged(self, overrides: &ThresholdOverrides) -> Self {
        DiscrepancyThresholds {
            variance_percentage: overrides.variance_percentage.unwrap_or(self.variance_percentage),
            variance_amount: overrides.variance_amount.unwrap_or(self.variance_amount),
            loss_percentage: overrides.loss_percentage.unwrap_or(self.loss_percentage),
            loss_amount: overrides.loss_amount.unwrap_or(self.loss_amount),
            wastage_percentage: overrides.wastage_percentage.unwrap_or(self.wastage_percentage),
        }
    }
}

/// Ordinal severity of a discrepancy. Derived `Ord` follows declaration
/// order, so rank comparisons are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Severity {
        match value {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::None,
        }
    }
}

/// Resolution state of a persisted discrepancy record. Only mutated by
/// explicit resolution actions, never by re-scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyStatus {
    Open,
    Investigating,
    Resolved,
    FalsePositive,
}

impl DiscrepancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscrepancyStatus::Open => "open",
            DiscrepancyStatus::Investigating => "investigating",
            DiscrepancyStatus::Resolved => "resolved",
            DiscrepancyStatus::FalsePositive => "false_positive",
        }
    }

    /// Closed states release the material's active-record slot.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            DiscrepancyStatus::Resolved | DiscrepancyStatus::FalsePositive
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyMetrics {
    pub variance: f64,
    pub variance_percentage: f64,
    pub variance_cost: f64,
    pub loss: f64,
    pub loss_percentage: f64,
    pub loss_cost: f64,
    pub wastage: f64,
    pub total_discrepancy_cost: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyAlerts {
    pub variance: bool,
    pub loss: bool,
    pub wastage: bool,
    pub has_any_alert: bool,
}

/// Classifier output for one material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyEvaluation {
    pub material_id: String,
    pub project_id: String,
    pub material_name: String,
    pub category: Option<String>,
    pub supplier_name: Option<String>,
    pub metrics: DiscrepancyMetrics,
    pub alerts: DiscrepancyAlerts,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::None => {}
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

/// Project-wide discrepancy rollup over the full scanned population.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDiscrepancySummary {
    pub project_id: String,
    pub total_materials: u32,
    pub flagged_materials: u32,
    pub total_variance: f64,
    pub total_loss: f64,
    pub average_wastage_percentage: f64,
    pub total_variance_cost: f64,
    pub total_loss_cost: f64,
    pub total_discrepancy_cost: f64,
    pub severity_counts: SeverityCounts,
}

impl ProjectDiscrepancySummary {
    pub fn empty(project_id: &str) -> Self {
        ProjectDiscrepancySummary {
            project_id: project_id.to_string(),
            total_materials: 0,
            flagged_materials: 0,
            total_variance: 0.0,
            total_loss: 0.0,
            average_wastage_percentage: 0.0,
            total_variance_cost: 0.0,
            total_loss_cost: 0.0,
            total_discrepancy_cost: 0.0,
            severity_counts: SeverityCounts::default(),
        }
    }
}

/// One calendar-month bucket of discrepancy aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDiscrepancyTrend {
    pub month: String, // "YYYY-MM"
    pub total_materials: u32,
    pub total_variance: f64,
    pub total_loss: f64,
    pub average_wastage_percentage: f64,
    pub total_discrepancy_cost: f64,
}

/// Per-category discrepancy aggregates; only categories with at least one
/// scanned material appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDiscrepancyAnalysis {
    pub category: String,
    pub total_materials: u32,
    pub materials_with_issues: u32,
    pub issue_rate: f64,
    pub total_variance: f64,
    pub total_loss: f64,
    pub average_wastage_percentage: f64,
    pub total_discrepancy_cost: f64,
}

/// Persisted discrepancy record, one active row per material.
#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::discrepancies)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub id: String,
    pub material_id: String,
    pub project_id: String,
    pub severity: String,
    pub variance: f64,
    pub variance_percentage: f64,
    pub variance_cost: f64,
    pub loss: f64,
    pub loss_percentage: f64,
    pub loss_cost: f64,
    pub wastage: f64,
    pub total_discrepancy_cost: f64,
    pub variance_alert: bool,
    pub loss_alert: bool,
    pub wastage_alert: bool,
    pub status: String,
    pub is_active: bool,
    pub resolution_history: String,
    pub detected_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Discrepancy {
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.severity)
    }

    pub fn resolution_entries(&self) -> Vec<ResolutionEntry> {
        serde_json::from_str(&self.resolution_history).unwrap_or_default()
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::discrepancies)]
#[serde(rename_all = "camelCase")]
pub struct NewDiscrepancy {
    pub id: String,
    pub material_id: String,
    pub project_id: String,
    pub severity: String,
    pub variance: f64,
    pub variance_percentage: f64,
    pub variance_cost: f64,
    pub loss: f64,
    pub loss_percentage: f64,
    pub loss_cost: f64,
    pub wastage: f64,
    pub total_discrepancy_cost: f64,
    pub variance_alert: bool,
    pub loss_alert: bool,
    pub wastage_alert: bool,
    pub status: String,
    pub is_active: bool,
    pub resolution_history: String,
}

/// One entry in a discrepancy's resolution trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionEntry {
    pub status: DiscrepancyStatus,
    pub note: Option<String>,
    pub user_id: String,
    pub recorded_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_thresholds_prefer_overrides() {
        let merged = DiscrepancyThresholds::default().merged(&ThresholdOverrides {
            variance_percentage: Some(2.5),
            loss_amount: Some(0.0),
            ..Default::default()
        });
        assert_eq!(merged.variance_percentage, 2.5);
        assert_eq!(merged.loss_amount, 0.0);
        assert_eq!(merged.variance_amount, 100.0);
        assert_eq!(merged.wastage_percentage, 15.0);
    }

    #[test]
    fn severity_orders_by_rank() {
        assert!(Severity::None < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_round_trips_through_strings() {
        for s in [
            Severity::None,
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ] {
            assert_eq!(Severity::parse(s.as_str()), s);
        }
    }
}
