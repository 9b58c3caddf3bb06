/// Decimal places for monetary amounts surfaced to callers.
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

// Default discrepancy thresholds, used when a project carries no overrides.
pub const DEFAULT_VARIANCE_PERCENTAGE_THRESHOLD: f64 = 5.0;
pub const DEFAULT_VARIANCE_AMOUNT_THRESHOLD: f64 = 100.0;
pub const DEFAULT_LOSS_PERCENTAGE_THRESHOLD: f64 = 10.0;
pub const DEFAULT_LOSS_AMOUNT_THRESHOLD: f64 = 50.0;
pub const DEFAULT_WASTAGE_PERCENTAGE_THRESHOLD: f64 = 15.0;

// Cost tiers for severity classification.
pub const CRITICAL_COST_THRESHOLD: f64 = 10_000.0;
pub const HIGH_COST_THRESHOLD: f64 = 5_000.0;
pub const MEDIUM_COST_THRESHOLD: f64 = 1_000.0;

/// Bucket used by category analysis when a material has no category.
pub const UNCATEGORIZED_CATEGORY: &str = "other";

/// Fallback supplier bucket for materials without a supplier name.
pub const UNKNOWN_SUPPLIER: &str = "Unknown";

/// Roles that receive discrepancy alert notifications.
pub const ALERT_RECIPIENT_ROLES: [&str; 3] = ["owner", "project_manager", "admin"];
