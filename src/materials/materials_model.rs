use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One purchased material line item.
#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::materials)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub project_id: String,
    pub phase_id: Option<String>,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub quantity_purchased: Option<f64>,
    pub quantity_delivered: Option<f64>,
    pub quantity_used: Option<f64>,
    pub unit_cost: Option<f64>,
    pub date_delivered: Option<NaiveDateTime>,
    pub date_used: Option<NaiveDateTime>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Material {
    pub fn purchased(&self) -> f64 {
        self.quantity_purchased.unwrap_or(0.0)
    }

    pub fn delivered(&self) -> f64 {
        self.quantity_delivered.unwrap_or(0.0)
    }

    pub fn used(&self) -> f64 {
        self.quantity_used.unwrap_or(0.0)
    }

    pub fn cost_per_unit(&self) -> f64 {
        self.unit_cost.unwrap_or(0.0)
    }

    /// Timestamp used for time-bucketed analysis: delivery date, else usage
    /// date, else record creation.
    pub fn entry_date(&self) -> NaiveDateTime {
        self.date_delivered
            .or(self.date_used)
            .unwrap_or(self.created_at)
    }
}

#[derive(Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::materials)]
#[serde(rename_all = "camelCase")]
pub struct NewMaterial {
    pub id: Option<String>,
    pub project_id: String,
    pub phase_id: Option<String>,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub quantity_purchased: Option<f64>,
    pub quantity_delivered: Option<f64>,
    pub quantity_used: Option<f64>,
    pub unit_cost: Option<f64>,
    pub date_delivered: Option<NaiveDateTime>,
    pub date_used: Option<NaiveDateTime>,
}

/// Filters shared by the scan, summary, trend and supplier queries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialFilters {
    pub category: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// Material spending decomposed by category, used for activation baselines
/// and effective-spending reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingBreakdown {
    pub total: f64,
    pub by_category: HashMap<String, f64>,
}
