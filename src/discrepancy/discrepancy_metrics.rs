//! Pure material-quantity metrics. All inputs are coerced to non-negative
//! finite numbers before use: missing, NaN, infinite or negative values are
//! treated as zero so malformed records degrade to zero metrics instead of
//! poisoning dashboards.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::constants::DISPLAY_DECIMAL_PRECISION;

use super::discrepancy_model::DiscrepancyThresholds;

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Rounds a monetary amount to two decimal places.
pub fn round_currency(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(DISPLAY_DECIMAL_PRECISION))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Quantity purchased but never delivered (supplier shortfall signal).
pub fn calculate_variance(purchased: f64, delivered: f64) -> f64 {
    (sanitize(purchased) - sanitize(delivered)).max(0.0)
}

pub fn calculate_variance_percentage(purchased: f64, delivered: f64) -> f64 {
    let purchased = sanitize(purchased);
    if purchased == 0.0 {
        return 0.0;
    }
    (calculate_variance(purchased, delivered) / purchased * 100.0).clamp(0.0, 100.0)
}

/// Quantity delivered but unaccounted for in usage (site wastage/theft signal).
pub fn calculate_loss(delivered: f64, used: f64) -> f64 {
    (sanitize(delivered) - sanitize(used)).max(0.0)
}

pub fn calculate_loss_percentage(delivered: f64, used: f64) -> f64 {
    let delivered = sanitize(delivered);
    if delivered == 0.0 {
        return 0.0;
    }
    (calculate_loss(delivered, used) / delivered * 100.0).clamp(0.0, 100.0)
}

/// Purchaser-centric combined ratio: share of purchased quantity that was
/// never put to use. Zero until something has been purchased AND delivered.
pub fn calculate_wastage(purchased: f64, delivered: f64, used: f64) -> f64 {
    let purchased = sanitize(purchased);
    let delivered = sanitize(delivered);
    if purchased == 0.0 || delivered == 0.0 {
        return 0.0;
    }
    ((purchased - sanitize(used)) / purchased * 100.0).clamp(0.0, 100.0)
}

pub fn calculate_variance_cost(purchased: f64, delivered: f64, unit_cost: f64) -> f64 {
    round_currency(calculate_variance(purchased, delivered) * sanitize(unit_cost))
}

pub fn calculate_loss_cost(delivered: f64, used: f64, unit_cost: f64) -> f64 {
    round_currency(calculate_loss(delivered, used) * sanitize(unit_cost))
}

pub fn calculate_total_discrepancy_cost(
    purchased: f64,
    delivered: f64,
    used: f64,
    unit_cost: f64,
) -> f64 {
    round_currency(
        calculate_variance_cost(purchased, delivered, unit_cost)
            + calculate_loss_cost(delivered, used, unit_cost),
    )
}

/// Strict comparisons throughout: values sitting exactly on a threshold do
/// not trigger. An absolute threshold of zero is disabled.
pub fn is_variance_excessive(
    variance: f64,
    variance_percentage: f64,
    thresholds: &DiscrepancyThresholds,
) -> bool {
    variance_percentage > thresholds.variance_percentage
        || (thresholds.variance_amount > 0.0 && variance > thresholds.variance_amount)
}

pub fn is_loss_excessive(
    loss: f64,
    loss_percentage: f64,
    thresholds: &DiscrepancyThresholds,
) -> bool {
    loss_percentage > thresholds.loss_percentage
        || (thresholds.loss_amount > 0.0 && loss > thresholds.loss_amount)
}

pub fn is_wastage_excessive(wastage: f64, thresholds: &DiscrepancyThresholds) -> bool {
    wastage > thresholds.wastage_percentage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_is_zero_when_fully_delivered() {
        assert_eq!(calculate_variance(100.0, 100.0), 0.0);
        assert_eq!(calculate_variance(100.0, 150.0), 0.0);
    }

    #[test]
    fn variance_counts_short_deliveries() {
        assert_eq!(calculate_variance(1000.0, 800.0), 200.0);
        assert_eq!(calculate_variance_percentage(1000.0, 800.0), 20.0);
    }

    #[test]
    fn loss_is_zero_when_fully_used() {
        assert_eq!(calculate_loss(500.0, 500.0), 0.0);
        assert_eq!(calculate_loss(500.0, 600.0), 0.0);
    }

    #[test]
    fn percentages_default_to_zero_on_zero_denominator() {
        assert_eq!(calculate_variance_percentage(0.0, 0.0), 0.0);
        assert_eq!(calculate_loss_percentage(0.0, 0.0), 0.0);
        assert_eq!(calculate_wastage(0.0, 0.0, 0.0), 0.0);
        assert_eq!(calculate_wastage(100.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn malformed_inputs_coerce_to_zero() {
        assert_eq!(calculate_variance(f64::NAN, 10.0), 0.0);
        assert_eq!(calculate_variance(-50.0, 10.0), 0.0);
        assert_eq!(calculate_loss(f64::INFINITY, 10.0), 0.0);
        assert_eq!(calculate_variance_cost(100.0, 50.0, f64::NAN), 0.0);
    }

    #[test]
    fn wastage_stays_within_bounds() {
        for (p, d, u) in [
            (1000.0, 950.0, 900.0),
            (10.0, 10.0, 0.0),
            (10.0, 10.0, 25.0),
            (3.0, 1.0, 1.0),
        ] {
            let w = calculate_wastage(p, d, u);
            assert!((0.0..=100.0).contains(&w), "wastage {} out of range", w);
        }
    }

    #[test]
    fn costs_round_to_two_decimals() {
        // variance 0.333 * 3.0 = 0.999 -> 1.0
        assert_eq!(calculate_variance_cost(1.333, 1.0, 3.0), 1.0);
        assert_eq!(calculate_loss_cost(2.0, 1.0, 9.999), 10.0);
    }

    #[test]
    fn variance_plus_loss_equals_total_cost() {
        let (p, d, u, c) = (1000.0, 800.0, 700.0, 12.5);
        let total = calculate_total_discrepancy_cost(p, d, u, c);
        let parts = calculate_variance_cost(p, d, c) + calculate_loss_cost(d, u, c);
        assert_eq!(total, round_currency(parts));
    }

    #[test]
    fn threshold_boundaries_are_strict() {
        let t = DiscrepancyThresholds::default();
        // Exactly 5% variance and amount 50 (below 100): no trigger.
        assert!(!is_variance_excessive(50.0, 5.0, &t));
        assert!(is_variance_excessive(50.0, 5.01, &t));
        // Amount alone can trigger.
        assert!(is_variance_excessive(100.5, 1.0, &t));
        // Exactly on the amount threshold: no trigger.
        assert!(!is_variance_excessive(100.0, 1.0, &t));
    }

    #[test]
    fn zero_absolute_threshold_is_disabled() {
        let t = DiscrepancyThresholds {
            variance_amount: 0.0,
            ..Default::default()
        };
        assert!(!is_variance_excessive(1_000_000.0, 1.0, &t));
    }
}
