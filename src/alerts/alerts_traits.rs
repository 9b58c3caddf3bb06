use super::alerts_model::{
    AlertRunSummary, DiscrepancyEmail, NewAuditLog, NewNotification, NewUser, User,
};
use crate::errors::Result;
use async_trait::async_trait;

/// In-app notification collaborator.
#[async_trait]
pub trait NotificationSinkTrait: Send + Sync {
    /// Returns the number of notifications created.
    async fn create_notifications(&self, notifications: Vec<NewNotification>) -> Result<usize>;
}

/// External email collaborator. Individual sends may fail; the orchestrator
/// treats each call as best-effort.
#[async_trait]
pub trait EmailSinkTrait: Send + Sync {
    async fn send_discrepancy_email(&self, email: &DiscrepancyEmail) -> Result<()>;
}

/// Audit trail collaborator.
#[async_trait]
pub trait AuditSinkTrait: Send + Sync {
    async fn create_audit_log(&self, entry: NewAuditLog) -> Result<()>;
}

/// Resolves who gets alerted.
#[async_trait]
pub trait RecipientDirectoryTrait: Send + Sync {
    /// Active users whose role receives discrepancy alerts.
    fn get_alert_recipients(&self) -> Result<Vec<User>>;

    async fn create_user(&self, new_user: NewUser) -> Result<User>;
}

/// Trait defining the contract for the alerting orchestrator.
#[async_trait]
pub trait AlertServiceTrait: Send + Sync {
    /// Scans a project, persists every flagged discrepancy and fans out
    /// notifications, escalating critical findings by email.
    async fn process_project_discrepancies(&self, project_id: &str) -> Result<AlertRunSummary>;
}
