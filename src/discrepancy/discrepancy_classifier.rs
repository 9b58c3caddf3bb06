//! Classifies one material against a threshold set.

use crate::constants::{CRITICAL_COST_THRESHOLD, HIGH_COST_THRESHOLD, MEDIUM_COST_THRESHOLD};
use crate::materials::materials_model::Material;

use super::discrepancy_metrics::{
    calculate_loss, calculate_loss_cost, calculate_loss_percentage, calculate_total_discrepancy_cost,
    calculate_variance, calculate_variance_cost, calculate_variance_percentage, calculate_wastage,
    is_loss_excessive, is_variance_excessive, is_wastage_excessive,
};
use super::discrepancy_model::{
    DiscrepancyAlerts, DiscrepancyEvaluation, DiscrepancyMetrics, DiscrepancyThresholds, Severity,
};

/// Computes all metrics for a material, flags the excessive ones and grades
/// the combined severity.
pub fn evaluate_material(
    material: &Material,
    thresholds: &DiscrepancyThresholds,
) -> DiscrepancyEvaluation {
    let purchased = material.purchased();
    let delivered = material.delivered();
    let used = material.used();
    let unit_cost = material.cost_per_unit();

    let metrics = DiscrepancyMetrics {
        variance: calculate_variance(purchased, delivered),
        variance_percentage: calculate_variance_percentage(purchased, delivered),
        variance_cost: calculate_variance_cost(purchased, delivered, unit_cost),
        loss: calculate_loss(delivered, used),
        loss_percentage: calculate_loss_percentage(delivered, used),
        loss_cost: calculate_loss_cost(delivered, used, unit_cost),
        wastage: calculate_wastage(purchased, delivered, used),
        total_discrepancy_cost: calculate_total_discrepancy_cost(
            purchased, delivered, used, unit_cost,
        ),
    };

    let variance_flag = is_variance_excessive(metrics.variance, metrics.variance_percentage, thresholds);
    let loss_flag = is_loss_excessive(metrics.loss, metrics.loss_percentage, thresholds);
    let wastage_flag = is_wastage_excessive(metrics.wastage, thresholds);

    let alerts = DiscrepancyAlerts {
        variance: variance_flag,
        loss: loss_flag,
        wastage: wastage_flag,
        has_any_alert: variance_flag || loss_flag || wastage_flag,
    };

    DiscrepancyEvaluation {
        material_id: material.id.clone(),
        project_id: material.project_id.clone(),
        material_name: material.name.clone(),
        category: material.category.clone(),
        supplier_name: material.supplier_name.clone(),
        severity: classify_severity(&metrics, &alerts),
        metrics,
        alerts,
    }
}

/// Severity decision table, first match wins. All cost comparisons are
/// strict; a cost of exactly 10,000 grades High, not Critical.
pub fn classify_severity(metrics: &DiscrepancyMetrics, alerts: &DiscrepancyAlerts) -> Severity {
    if !alerts.has_any_alert {
        return Severity::None;
    }

    let cost = metrics.total_discrepancy_cost;

    if (alerts.variance && alerts.loss) || cost > CRITICAL_COST_THRESHOLD {
        // Both supply-side and site-side signals, or major money at stake.
        Severity::Critical
    } else if alerts.variance || cost > HIGH_COST_THRESHOLD {
        // Paid-but-undelivered is the stronger single signal.
        Severity::High
    } else if (alerts.loss || alerts.wastage) && cost > MEDIUM_COST_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn material(purchased: f64, delivered: f64, used: f64, unit_cost: f64) -> Material {
        let ts = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Material {
            id: "mat-1".to_string(),
            project_id: "proj-1".to_string(),
            phase_id: None,
            supplier_id: None,
            supplier_name: Some("Acme Cement".to_string()),
            name: "Cement".to_string(),
            category: Some("cement".to_string()),
            quantity_purchased: Some(purchased),
            quantity_delivered: Some(delivered),
            quantity_used: Some(used),
            unit_cost: Some(unit_cost),
            date_delivered: Some(ts),
            date_used: None,
            is_deleted: false,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn defaults() -> DiscrepancyThresholds {
        DiscrepancyThresholds::default()
    }

    #[test]
    fn boundary_values_do_not_alert() {
        // variance 50 = exactly 5%, loss 50 = 5.26%, wastage 10%: all below
        // or exactly on thresholds.
        let eval = evaluate_material(&material(1000.0, 950.0, 900.0, 10.0), &defaults());
        assert!(!eval.alerts.has_any_alert);
        assert_eq!(eval.severity, Severity::None);
        assert_eq!(eval.metrics.variance, 50.0);
        assert_eq!(eval.metrics.variance_percentage, 5.0);
        assert_eq!(eval.metrics.wastage, 10.0);
    }

    #[test]
    fn variance_alone_grades_high() {
        let eval = evaluate_material(&material(1000.0, 800.0, 800.0, 10.0), &defaults());
        assert!(eval.alerts.variance);
        assert!(!eval.alerts.loss);
        assert!(eval.alerts.wastage); // 20% wastage
        assert_eq!(eval.metrics.variance_cost, 2000.0);
        assert_eq!(eval.metrics.total_discrepancy_cost, 2000.0);
        assert_eq!(eval.severity, Severity::High);
    }

    #[test]
    fn cost_of_exactly_ten_thousand_grades_high_not_critical() {
        // loss 200 @ 50 = 10,000; no variance signal.
        let eval = evaluate_material(&material(500.0, 500.0, 300.0, 50.0), &defaults());
        assert!(!eval.alerts.variance);
        assert!(eval.alerts.loss);
        assert!(eval.alerts.wastage);
        assert_eq!(eval.metrics.total_discrepancy_cost, 10_000.0);
        assert_eq!(eval.severity, Severity::High);
    }

    #[test]
    fn cost_above_ten_thousand_grades_critical() {
        let eval = evaluate_material(&material(500.0, 500.0, 299.0, 50.0), &defaults());
        assert!(eval.metrics.total_discrepancy_cost > 10_000.0);
        assert_eq!(eval.severity, Severity::Critical);
    }

    #[test]
    fn combined_variance_and_loss_grades_critical() {
        let eval = evaluate_material(&material(1000.0, 700.0, 400.0, 1.0), &defaults());
        assert!(eval.alerts.variance);
        assert!(eval.alerts.loss);
        assert_eq!(eval.severity, Severity::Critical);
    }

    #[test]
    fn cheap_loss_grades_low() {
        // 40% loss but only 80 in cost: flagged, below every cost tier.
        let eval = evaluate_material(&material(10.0, 10.0, 6.0, 20.0), &defaults());
        assert!(eval.alerts.loss);
        assert!(!eval.alerts.variance);
        assert_eq!(eval.severity, Severity::Low);
    }

    #[test]
    fn loss_with_meaningful_cost_grades_medium() {
        // loss 30 @ 50 = 1,500: above the medium tier, below high.
        let eval = evaluate_material(&material(100.0, 100.0, 70.0, 50.0), &defaults());
        assert!(eval.alerts.loss);
        assert!(!eval.alerts.variance);
        assert!(eval.metrics.total_discrepancy_cost > 1_000.0);
        assert!(eval.metrics.total_discrepancy_cost <= 5_000.0);
        assert_eq!(eval.severity, Severity::Medium);
    }

    #[test]
    fn severity_never_decreases_as_cost_rises() {
        let mut previous = Severity::None;
        for unit_cost in [0.1, 1.0, 5.0, 20.0, 40.0, 60.0] {
            let eval = evaluate_material(&material(100.0, 100.0, 70.0, unit_cost), &defaults());
            assert!(
                eval.severity >= previous,
                "severity dropped from {:?} to {:?} at unit cost {}",
                previous,
                eval.severity,
                unit_cost
            );
            previous = eval.severity;
        }
    }
}
