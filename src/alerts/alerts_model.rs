use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::discrepancy::discrepancy_model::Severity;

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub project_id: Option<String>,
    pub related_model: Option<String>,
    pub related_id: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub id: Option<String>,
    pub user_id: String,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub project_id: Option<String>,
    pub related_model: Option<String>,
    pub related_id: Option<String>,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::audit_logs)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub changes: Option<String>,
    pub project_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::audit_logs)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditLog {
    pub id: Option<String>,
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub changes: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub email_notifications: Option<bool>,
    pub discrepancy_alerts: Option<bool>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Email escalation is opt-out: unset preferences count as enabled.
    pub fn wants_discrepancy_email(&self) -> bool {
        self.email_notifications != Some(false) && self.discrepancy_alerts != Some(false)
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub email_notifications: Option<bool>,
    pub discrepancy_alerts: Option<bool>,
}

/// Payload handed to the email collaborator for critical escalations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyEmail {
    pub recipient_email: String,
    pub recipient_name: String,
    pub project_name: String,
    pub material_name: String,
    pub severity: Severity,
    pub total_discrepancy_cost: f64,
    pub message: String,
}

/// Counts reported back from one alerting pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRunSummary {
    pub discrepancies_found: usize,
    pub notifications_created: usize,
    pub emails_sent: usize,
}
