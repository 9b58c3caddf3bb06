use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use crate::errors::{DatabaseError, Error, Result};

type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Handle to the single writer thread. SQLite allows one writer at a time;
/// funnelling every write through one dedicated connection avoids
/// SQLITE_BUSY contention between pooled connections.
#[derive(Clone)]
pub struct WriteHandle {
    sender: mpsc::UnboundedSender<WriteJob>,
}

impl WriteHandle {
    /// Executes a write closure on the writer connection and awaits its result.
    pub async fn exec<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Box::new(move |conn: &mut SqliteConnection| {
                let _ = tx.send(job(conn));
            }))
            .map_err(|_| {
                Error::Database(DatabaseError::WriteUnavailable(
                    "writer thread has stopped".to_string(),
                ))
            })?;

        rx.await.map_err(|_| {
            Error::Database(DatabaseError::WriteUnavailable(
                "writer thread dropped the response".to_string(),
            ))
        })?
    }
}

/// Spawns the writer thread with its own connection to `db_path`.
pub fn spawn_writer(db_path: &str) -> Result<WriteHandle> {
    let mut conn =
        SqliteConnection::establish(db_path).map_err(DatabaseError::ConnectionFailed)?;
    conn.batch_execute("PRAGMA busy_timeout = 30000; PRAGMA foreign_keys = ON;")
        .map_err(DatabaseError::QueryFailed)?;

    let (sender, mut receiver) = mpsc::unbounded_channel::<WriteJob>();

    std::thread::Builder::new()
        .name("db-writer".to_string())
        .spawn(move || {
            while let Some(job) = receiver.blocking_recv() {
                job(&mut conn);
            }
        })
        .map_err(|e| {
            error!("Failed to spawn db writer thread: {}", e);
            Error::Database(DatabaseError::WriteUnavailable(e.to_string()))
        })?;

    Ok(WriteHandle { sender })
}
