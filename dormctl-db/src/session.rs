//! Single database session with explicit open/close.
//!
//! One `PgConnection`, no pool. Every statement issued through it runs in
//! autocommit mode, so each insert or DDL statement is its own committed unit.

use dormctl_core::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};

pub struct Session {
    config: DatabaseConfig,
    conn: Option<PgConnection>,
}

impl Session {
    /// Build an unopened session. Nothing touches the network until `open`.
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config, conn: None }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .database(&self.config.name)
            .username(&self.config.user)
            .password(&self.config.password)
    }

    /// Establish the session. Opening an already open session is a no-op.
    pub async fn open(&mut self) -> DbResult<()> {
        if self.conn.is_some() {
            debug!("session already open");
            return Ok(());
        }

        match PgConnection::connect_with(&self.connect_options()).await {
            Ok(conn) => {
                info!(
                    host = %self.config.host,
                    database = %self.config.name,
                    "connection established"
                );
                self.conn = Some(conn);
                Ok(())
            }
            Err(source) => {
                error!(
                    host = %self.config.host,
                    database = %self.config.name,
                    error = %source,
                    "failed to connect"
                );
                Err(DbError::Connection {
                    host: self.config.host.clone(),
                    database: self.config.name.clone(),
                    source,
                })
            }
        }
    }

    /// Release the session. Safe to call any number of times.
    pub async fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        conn.close().await.map_err(DbError::Query)?;
        info!("database connection closed");
        Ok(())
    }

    /// The live connection, or `NotConnected` when the session was never opened
    /// (or already closed).
    pub fn connection(&mut self) -> DbResult<&mut PgConnection> {
        self.conn.as_mut().ok_or(DbError::NotConnected)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.conn.is_some() {
            // Dropping PgConnection closes the socket without the terminate handshake
            warn!("session dropped without close(); releasing connection");
        }
    }
}
