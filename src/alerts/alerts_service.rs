use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};

use crate::discrepancy::discrepancy_model::{DiscrepancyEvaluation, Severity};
use crate::discrepancy::discrepancy_traits::{
    DiscrepancyRepositoryTrait, DiscrepancyServiceTrait,
};
use crate::errors::Result;
use crate::materials::materials_model::MaterialFilters;
use crate::projects::projects_traits::ProjectRepositoryTrait;

use super::alerts_model::{AlertRunSummary, DiscrepancyEmail, NewAuditLog, NewNotification};
use super::alerts_traits::{
    AlertServiceTrait, AuditSinkTrait, EmailSinkTrait, NotificationSinkTrait,
    RecipientDirectoryTrait,
};

pub struct AlertService {
    discrepancy_service: Arc<dyn DiscrepancyServiceTrait>,
    discrepancy_repository: Arc<dyn DiscrepancyRepositoryTrait>,
    project_repository: Arc<dyn ProjectRepositoryTrait>,
    notification_sink: Arc<dyn NotificationSinkTrait>,
    email_sink: Arc<dyn EmailSinkTrait>,
    audit_sink: Arc<dyn AuditSinkTrait>,
    recipient_directory: Arc<dyn RecipientDirectoryTrait>,
}

impl AlertService {
    pub fn new(
        discrepancy_service: Arc<dyn DiscrepancyServiceTrait>,
        discrepancy_repository: Arc<dyn DiscrepancyRepositoryTrait>,
        project_repository: Arc<dyn ProjectRepositoryTrait>,
        notification_sink: Arc<dyn NotificationSinkTrait>,
        email_sink: Arc<dyn EmailSinkTrait>,
        audit_sink: Arc<dyn AuditSinkTrait>,
        recipient_directory: Arc<dyn RecipientDirectoryTrait>,
    ) -> Self {
        AlertService {
            discrepancy_service,
            discrepancy_repository,
            project_repository,
            notification_sink,
            email_sink,
            audit_sink,
            recipient_directory,
        }
    }
}

#[async_trait]
impl AlertServiceTrait for AlertService {
    async fn process_project_discrepancies(&self, project_id: &str) -> Result<AlertRunSummary> {
        debug!("Processing discrepancies for project {}", project_id);

        let flagged =
            self.discrepancy_service
                .scan(project_id, None, &MaterialFilters::default())?;

        let project_name = self
            .project_repository
            .get_project(project_id)?
            .map(|p| p.name)
            .unwrap_or_else(|| project_id.to_string());

        for evaluation in &flagged {
            self.discrepancy_repository
                .upsert_active(evaluation.clone())
                .await?;
        }

        let recipients = self.recipient_directory.get_alert_recipients()?;
        if recipients.is_empty() {
            debug!(
                "No alert recipients configured, {} discrepancies recorded without notifications",
                flagged.len()
            );
            return Ok(AlertRunSummary {
                discrepancies_found: flagged.len(),
                notifications_created: 0,
                emails_sent: 0,
            });
        }

        let mut notifications = Vec::with_capacity(flagged.len() * recipients.len());
        for evaluation in &flagged {
            let title = format!("Material discrepancy: {}", evaluation.material_name);
            let message = compose_alert_message(evaluation);
            for recipient in &recipients {
                notifications.push(NewNotification {
                    id: None,
                    user_id: recipient.id.clone(),
                    notification_type: "discrepancy_alert".to_string(),
                    title: title.clone(),
                    message: message.clone(),
                    project_id: Some(project_id.to_string()),
                    related_model: Some("Material".to_string()),
                    related_id: Some(evaluation.material_id.clone()),
                });
            }
        }

        let notifications_created = self
            .notification_sink
            .create_notifications(notifications)
            .await?;

        // Only the worst tier escalates to email, and only for recipients
        // who have not opted out. One failed send must not stop the rest.
        let mut emails_sent = 0;
        for evaluation in flagged.iter().filter(|e| e.severity == Severity::Critical) {
            for recipient in recipients.iter().filter(|r| r.wants_discrepancy_email()) {
                let email = DiscrepancyEmail {
                    recipient_email: recipient.email.clone(),
                    recipient_name: recipient.name.clone(),
                    project_name: project_name.clone(),
                    material_name: evaluation.material_name.clone(),
                    severity: evaluation.severity,
                    total_discrepancy_cost: evaluation.metrics.total_discrepancy_cost,
                    message: compose_alert_message(evaluation),
                };
                match self.email_sink.send_discrepancy_email(&email).await {
                    Ok(()) => emails_sent += 1,
                    Err(e) => {
                        error!(
                            "Failed to send discrepancy email to {}: {}",
                            recipient.email, e
                        );
                    }
                }
            }
        }

        // TODO: thread the triggering principal through instead of
        // attributing the run to the first recipient.
        let changes = serde_json::json!({
            "discrepanciesFound": flagged.len(),
            "notificationsCreated": notifications_created,
        });
        self.audit_sink
            .create_audit_log(NewAuditLog {
                id: None,
                user_id: recipients[0].id.clone(),
                action: "discrepancy_scan".to_string(),
                entity_type: "project".to_string(),
                entity_id: project_id.to_string(),
                changes: Some(changes.to_string()),
                project_id: Some(project_id.to_string()),
            })
            .await?;

        info!(
            "Project {}: {} discrepancies, {} notifications, {} escalation emails",
            project_id,
            flagged.len(),
            notifications_created,
            emails_sent
        );

        Ok(AlertRunSummary {
            discrepancies_found: flagged.len(),
            notifications_created,
            emails_sent,
        })
    }
}

/// Builds the notification body from whichever dimensions are flagged.
fn compose_alert_message(evaluation: &DiscrepancyEvaluation) -> String {
    let mut clauses = Vec::new();
    let metrics = &evaluation.metrics;

    if evaluation.alerts.variance {
        clauses.push(format!(
            "{:.1} units purchased but not delivered ({:.1}%)",
            metrics.variance, metrics.variance_percentage
        ));
    }
    if evaluation.alerts.loss {
        clauses.push(format!(
            "{:.1} units delivered but unaccounted for ({:.1}%)",
            metrics.loss, metrics.loss_percentage
        ));
    }
    if evaluation.alerts.wastage {
        clauses.push(format!("overall wastage at {:.1}%", metrics.wastage));
    }

    format!(
        "{}: {}. Estimated cost impact: {:.2}.",
        evaluation.material_name,
        clauses.join("; "),
        metrics.total_discrepancy_cost
    )
}

/// Email sink that only logs. Useful for wiring the orchestrator where no
/// mail transport is configured.
pub struct LogOnlyEmailSink;

#[async_trait]
impl EmailSinkTrait for LogOnlyEmailSink {
    async fn send_discrepancy_email(&self, email: &DiscrepancyEmail) -> Result<()> {
        info!(
            "Discrepancy email (not sent, log-only): to={} project={} material={}",
            email.recipient_email, email.project_name, email.material_name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discrepancy::discrepancy_model::{
        DiscrepancyAlerts, DiscrepancyMetrics, Severity,
    };

    fn evaluation(alerts: DiscrepancyAlerts, metrics: DiscrepancyMetrics) -> DiscrepancyEvaluation {
        DiscrepancyEvaluation {
            material_id: "mat-1".to_string(),
            project_id: "proj-1".to_string(),
            material_name: "Rebar".to_string(),
            category: Some("steel".to_string()),
            supplier_name: None,
            metrics,
            alerts,
            severity: Severity::High,
        }
    }

    #[test]
    fn message_only_mentions_flagged_dimensions() {
        let msg = compose_alert_message(&evaluation(
            DiscrepancyAlerts {
                variance: true,
                loss: false,
                wastage: false,
                has_any_alert: true,
            },
            DiscrepancyMetrics {
                variance: 200.0,
                variance_percentage: 20.0,
                total_discrepancy_cost: 2000.0,
                ..Default::default()
            },
        ));
        assert!(msg.contains("not delivered"));
        assert!(!msg.contains("unaccounted"));
        assert!(!msg.contains("wastage"));
        assert!(msg.contains("2000.00"));
    }

    #[test]
    fn message_joins_multiple_clauses() {
        let msg = compose_alert_message(&evaluation(
            DiscrepancyAlerts {
                variance: true,
                loss: true,
                wastage: true,
                has_any_alert: true,
            },
            DiscrepancyMetrics {
                variance: 10.0,
                variance_percentage: 10.0,
                loss: 5.0,
                loss_percentage: 6.0,
                wastage: 16.0,
                total_discrepancy_cost: 150.0,
                ..Default::default()
            },
        ));
        assert!(msg.contains("not delivered"));
        assert!(msg.contains("unaccounted"));
        assert!(msg.contains("wastage at 16.0%"));
    }
}
