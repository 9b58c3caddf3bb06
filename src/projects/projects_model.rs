use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::discrepancy::discrepancy_model::DiscrepancyThresholds;

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub budget: Option<f64>,
    pub budget_activated_at: Option<NaiveDateTime>,
    pub pre_budget_spending: Option<f64>,
    pub pre_budget_breakdown: Option<String>,
    pub alert_variance_percentage: Option<f64>,
    pub alert_variance_amount: Option<f64>,
    pub alert_loss_percentage: Option<f64>,
    pub alert_loss_amount: Option<f64>,
    pub alert_wastage_percentage: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Project {
    /// Effective thresholds for this project: stored overrides merged over
    /// the compiled defaults.
    pub fn thresholds(&self) -> DiscrepancyThresholds {
        DiscrepancyThresholds::default().merged(&ThresholdOverrides {
            variance_percentage: self.alert_variance_percentage,
            variance_amount: self.alert_variance_amount,
            loss_percentage: self.alert_loss_percentage,
            loss_amount: self.alert_loss_amount,
            wastage_percentage: self.alert_wastage_percentage,
        })
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub id: Option<String>,
    pub name: String,
    pub budget: Option<f64>,
    pub alert_variance_percentage: Option<f64>,
    pub alert_variance_amount: Option<f64>,
    pub alert_loss_percentage: Option<f64>,
    pub alert_loss_amount: Option<f64>,
    pub alert_wastage_percentage: Option<f64>,
}

/// Per-project threshold overrides; absent fields fall back to defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdOverrides {
    pub variance_percentage: Option<f64>,
    pub variance_amount: Option<f64>,
    pub loss_percentage: Option<f64>,
    pub loss_amount: Option<f64>,
    pub wastage_percentage: Option<f64>,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::phases)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub budget: Option<f64>,
    pub budget_activated_at: Option<NaiveDateTime>,
    pub pre_budget_spending: Option<f64>,
    pub pre_budget_breakdown: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::phases)]
#[serde(rename_all = "camelCase")]
pub struct NewPhase {
    pub id: Option<String>,
    pub project_id: String,
    pub name: String,
    pub budget: Option<f64>,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::project_finances)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFinances {
    pub id: String,
    pub project_id: String,
    pub capital: Option<f64>,
    pub capital_used: f64,
    pub capital_committed: f64,
    pub capital_activated_at: Option<NaiveDateTime>,
    pub pre_capital_used: Option<f64>,
    pub pre_capital_committed: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::project_finances)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectFinances {
    pub id: Option<String>,
    pub project_id: String,
    pub capital: Option<f64>,
    pub capital_used: f64,
    pub capital_committed: f64,
}
