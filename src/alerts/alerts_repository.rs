use crate::constants::ALERT_RECIPIENT_ROLES;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::schema::{audit_logs, notifications, users};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::alerts_model::{NewAuditLog, NewNotification, NewUser, User};
use super::alerts_traits::{AuditSinkTrait, NotificationSinkTrait, RecipientDirectoryTrait};

/// Diesel-backed notification/audit sinks and recipient directory.
pub struct AlertRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AlertRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AlertRepository { pool, writer }
    }
}

#[async_trait]
impl NotificationSinkTrait for AlertRepository {
    async fn create_notifications(&self, new_notifications: Vec<NewNotification>) -> Result<usize> {
        if new_notifications.is_empty() {
            return Ok(0);
        }

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let records: Vec<NewNotification> = new_notifications
                    .into_iter()
                    .map(|mut n| {
                        if n.id.is_none() {
                            n.id = Some(Uuid::new_v4().to_string());
                        }
                        n
                    })
                    .collect();

                Ok(diesel::insert_into(notifications::table)
                    .values(&records)
                    .execute(conn)?)
            })
            .await
    }
}

#[async_trait]
impl AuditSinkTrait for AlertRepository {
    async fn create_audit_log(&self, entry: NewAuditLog) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let mut record = entry;
                if record.id.is_none() {
                    record.id = Some(Uuid::new_v4().to_string());
                }

                diesel::insert_into(audit_logs::table)
                    .values(&record)
                    .execute(conn)?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl RecipientDirectoryTrait for AlertRepository {
    fn get_alert_recipients(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let roles: Vec<String> = ALERT_RECIPIENT_ROLES
            .iter()
            .map(|r| r.to_string())
            .collect();

        Ok(users::table
            .filter(users::is_active.eq(true))
            .filter(users::role.eq_any(roles))
            .order(users::created_at.asc())
            .load::<User>(&mut conn)?)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let mut record = new_user;
                if record.id.is_none() {
                    record.id = Some(Uuid::new_v4().to_string());
                }

                diesel::insert_into(users::table)
                    .values(&record)
                    .execute(conn)?;

                Ok(users::table
                    .find(record.id.unwrap())
                    .first::<User>(conn)?)
            })
            .await
    }
}
