/// Team persistence operations
///
/// The stored team set always belongs to exactly one run. Replacing and
/// clearing it happen in a single transaction together with the members'
/// `grouped` flags, so the flags never point at stale or missing teams.
use anyhow::{Context, Result};
use sdk::errors::EngineError;
use sdk::{MemberId, TeamRecord};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::{info, warn};

use super::unix_now;
use crate::balancing::TeamDraft;

/// Team repository for database operations
pub struct TeamRepository {
    pool: SqlitePool,
}

impl TeamRepository {
    /// Create a new team repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace the stored team set with the drafts of a new run
    ///
    /// Runs as one transaction: old teams are deleted, every `grouped` flag
    /// is reset, each drafted member id is resolved against `members`, then
    /// the new teams are written and their members flagged. A member that
    /// cannot be resolved fails with `EngineError::UnresolvedMember` and
    /// nothing is committed.
    pub async fn replace_all(&self, run_id: &str, drafts: &[TeamDraft]) -> Result<Vec<TeamRecord>> {
        let now = unix_now()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin team transaction")?;

        sqlx::query("DELETE FROM team_members")
            .execute(&mut *tx)
            .await
            .context("Failed to delete team members")?;

        sqlx::query("DELETE FROM teams")
            .execute(&mut *tx)
            .await
            .context("Failed to delete teams")?;

        sqlx::query("UPDATE members SET grouped = 0")
            .execute(&mut *tx)
            .await
            .context("Failed to reset grouped flags")?;

        for member_id in drafts.iter().flat_map(|d| d.members.iter()) {
            let found: Option<i64> = sqlx::query_scalar("SELECT id FROM members WHERE id = ?")
                .bind(member_id.0)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to resolve team member")?;

            if found.is_none() {
                warn!("Run {} references unknown member {}", run_id, member_id);
                // Dropping the transaction rolls everything back
                return Err(EngineError::UnresolvedMember(member_id.0).into());
            }
        }

        let mut records = Vec::with_capacity(drafts.len());
        for (position, draft) in drafts.iter().enumerate() {
            let result = sqlx::query(
                "INSERT INTO teams (run_id, name, position, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(run_id)
            .bind(&draft.name)
            .bind(position as i64)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to create team")?;

            let team_id = result.last_insert_rowid();

            for (seat, member_id) in draft.members.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO team_members (team_id, member_id, position) VALUES (?, ?, ?)",
                )
                .bind(team_id)
                .bind(member_id.0)
                .bind(seat as i64)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to seat member {}", member_id))?;

                sqlx::query("UPDATE members SET grouped = 1 WHERE id = ?")
                    .bind(member_id.0)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to mark member grouped")?;
            }

            records.push(TeamRecord {
                id: team_id,
                run_id: run_id.to_string(),
                name: draft.name.clone(),
                position: position as i64,
                member_ids: draft.members.clone(),
            });
        }

        tx.commit()
            .await
            .context("Failed to commit team run")?;

        info!("Committed run {} with {} teams", run_id, records.len());
        Ok(records)
    }

    /// Stored teams in seating order, members leader first
    pub async fn list_teams(&self) -> Result<Vec<TeamRecord>> {
        let rows = sqlx::query("SELECT id, run_id, name, position FROM teams ORDER BY position ASC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch teams")?;

        let mut teams: Vec<TeamRecord> = rows
            .into_iter()
            .map(|r| TeamRecord {
                id: r.get("id"),
                run_id: r.get("run_id"),
                name: r.get("name"),
                position: r.get("position"),
                member_ids: Vec::new(),
            })
            .collect();

        let index: HashMap<i64, usize> = teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, i))
            .collect();

        let seats = sqlx::query(
            "SELECT team_id, member_id FROM team_members ORDER BY team_id ASC, position ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch team members")?;

        for r in seats {
            let team_id: i64 = r.get("team_id");
            if let Some(&i) = index.get(&team_id) {
                teams[i].member_ids.push(MemberId(r.get("member_id")));
            }
        }

        Ok(teams)
    }

    /// Delete every stored team and reset all `grouped` flags
    ///
    /// Returns the number of teams removed.
    pub async fn clear_all(&self) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin clear transaction")?;

        sqlx::query("DELETE FROM team_members")
            .execute(&mut *tx)
            .await
            .context("Failed to delete team members")?;

        let result = sqlx::query("DELETE FROM teams")
            .execute(&mut *tx)
            .await
            .context("Failed to delete teams")?;

        sqlx::query("UPDATE members SET grouped = 0")
            .execute(&mut *tx)
            .await
            .context("Failed to reset grouped flags")?;

        tx.commit()
            .await
            .context("Failed to commit team clear")?;

        info!("Cleared {} stored teams", result.rows_affected());
        Ok(result.rows_affected())
    }
}
