/// Database module for SQLite persistence
///
/// This module stores the member pool, survey questions and answers, and the
/// team set produced by the latest committed balancing run. It uses sqlx with
/// parameterized queries and WAL mode for better concurrency.
use anyhow::{Context, Result};
use async_trait::async_trait;
use sdk::errors::EngineError;
use sdk::{Member, TeamRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::balancing::TeamDraft;
use crate::service::RosterStore;

pub mod import;
pub mod members;
pub mod survey;
pub mod teams;

// Re-export commonly used types
pub use import::{ImportSummary, RosterFile};
pub use members::MemberRepository;
pub use survey::SurveyRepository;
pub use teams::TeamRepository;

/// Database connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    ///
    /// This will:
    /// 1. Create the database file if it doesn't exist
    /// 2. Enable WAL mode and foreign keys
    /// 3. Run migrations to set up the schema
    ///
    /// SQLite replays a leftover WAL on open, so an unclean shutdown needs no
    /// extra recovery step. Call `close()` on shutdown to checkpoint it.
    pub async fn new(db_path: &Path) -> Result<Self> {
        info!("Initializing database at: {}", db_path.display());

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let connection_string = format!("sqlite:{}", db_path.display());
        let options = SqliteConnectOptions::from_str(&connection_string)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        debug!("Database connection established");

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    ///
    /// Migrations are idempotent and can be run multiple times safely.
    async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::raw_sql(include_str!("../../migrations/001_initial.sql"))
            .execute(&self.pool)
            .await
            .context("Failed to execute migration 001_initial.sql")?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Flush the WAL to disk
    pub async fn flush_wal(&self) -> Result<()> {
        info!("Flushing WAL to disk");

        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await
            .context("Failed to flush WAL")?;

        debug!("WAL flushed successfully");
        Ok(())
    }

    /// Close the database connection
    ///
    /// This flushes the WAL and closes all connections in the pool.
    pub async fn close(self) -> Result<()> {
        info!("Closing database connection");

        self.flush_wal().await?;
        self.pool.close().await;

        info!("Database connection closed");
        Ok(())
    }

    /// Create a member repository
    pub fn members(&self) -> MemberRepository {
        MemberRepository::new(self.pool.clone())
    }

    /// Create a survey repository
    pub fn survey(&self) -> SurveyRepository {
        SurveyRepository::new(self.pool.clone())
    }

    /// Create a team repository
    pub fn teams(&self) -> TeamRepository {
        TeamRepository::new(self.pool.clone())
    }

    /// Load a roster file into the store in one transaction
    pub async fn import(&self, roster: &RosterFile) -> Result<ImportSummary> {
        import::import_roster(&self.pool, roster).await
    }
}

#[async_trait]
impl RosterStore for Database {
    async fn eligible_members(&self) -> Result<Vec<Member>, EngineError> {
        self.members()
            .eligible_members()
            .await
            .map_err(into_engine_error)
    }

    async fn all_members(&self) -> Result<Vec<Member>, EngineError> {
        self.members().all_members().await.map_err(into_engine_error)
    }

    async fn replace_teams(
        &self,
        run_id: &str,
        drafts: &[TeamDraft],
    ) -> Result<Vec<TeamRecord>, EngineError> {
        self.teams()
            .replace_all(run_id, drafts)
            .await
            .map_err(into_engine_error)
    }

    async fn stored_teams(&self) -> Result<Vec<TeamRecord>, EngineError> {
        self.teams().list_teams().await.map_err(into_engine_error)
    }

    async fn clear_teams(&self) -> Result<u64, EngineError> {
        self.teams().clear_all().await.map_err(into_engine_error)
    }
}

/// Recover a typed engine error carried through `anyhow`, or wrap the failure
/// as a database error
pub fn into_engine_error(err: anyhow::Error) -> EngineError {
    match err.downcast::<EngineError>() {
        Ok(engine) => engine,
        Err(other) => EngineError::Database(format!("{:#}", other)),
    }
}

/// Current time as Unix seconds
pub(crate) fn unix_now() -> Result<i64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64)
}
