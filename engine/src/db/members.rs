/// Member persistence operations
///
/// Members are returned with their survey answers attached, in the order the
/// answers were recorded. The balancing engine relies on that order for its
/// first-match-wins lookups.
use anyhow::{Context, Result};
use sdk::{Gender, Member, MemberId, Role, SurveyAnswer};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

use super::survey::load_questions;
use super::unix_now;

/// Member repository for database operations
pub struct MemberRepository {
    pool: SqlitePool,
}

fn member_from_row(r: &SqliteRow) -> Member {
    Member {
        id: MemberId(r.get("id")),
        name: r.get("name"),
        gender: Gender::parse(&r.get::<String, _>("gender")),
        role: Role::parse(&r.get::<String, _>("role")).unwrap_or(Role::Participant),
        grouped: r.get("grouped"),
        image: r.get("image"),
        answers: Vec::new(),
    }
}

impl MemberRepository {
    /// Create a new member repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a member
    pub async fn create_member(
        &self,
        name: &str,
        gender: Gender,
        role: Role,
        image: Option<&str>,
    ) -> Result<MemberId> {
        let now = unix_now()?;

        let result = sqlx::query(
            "INSERT INTO members (name, gender, role, image, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(gender.as_str())
        .bind(role.as_str())
        .bind(image)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to create member '{}'", name))?;

        Ok(MemberId(result.last_insert_rowid()))
    }

    /// Get a member with answers by ID
    pub async fn get_member(&self, id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            "SELECT id, name, gender, role, grouped, image FROM members WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch member")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut members = vec![member_from_row(&row)];
        self.attach_answers(&mut members).await?;
        Ok(members.pop())
    }

    /// The eligible pool, ordered by member id
    pub async fn eligible_members(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            "SELECT id, name, gender, role, grouped, image FROM members WHERE role = ? ORDER BY id ASC",
        )
        .bind(Role::Participant.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch eligible members")?;

        let mut members: Vec<Member> = rows.iter().map(member_from_row).collect();
        self.attach_answers(&mut members).await?;
        Ok(members)
    }

    /// Every member including staff, ordered by member id
    pub async fn all_members(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            "SELECT id, name, gender, role, grouped, image FROM members ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch members")?;

        let mut members: Vec<Member> = rows.iter().map(member_from_row).collect();
        self.attach_answers(&mut members).await?;
        Ok(members)
    }

    /// Number of eligible members not placed by the latest run
    pub async fn count_ungrouped(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE role = ? AND grouped = 0")
                .bind(Role::Participant.as_str())
                .fetch_one(&self.pool)
                .await
                .context("Failed to count ungrouped members")?;

        Ok(count)
    }

    async fn attach_answers(&self, members: &mut [Member]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }

        let questions = load_questions(&self.pool).await?;
        let index: HashMap<MemberId, usize> = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, i))
            .collect();

        let rows =
            sqlx::query("SELECT member_id, question_id, answer FROM survey_answers ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await
                .context("Failed to fetch survey answers")?;

        for r in rows {
            let member_id = MemberId(r.get("member_id"));
            let Some(&position) = index.get(&member_id) else {
                continue;
            };
            let question_id: i64 = r.get("question_id");
            if let Some(question) = questions.get(&question_id) {
                members[position].answers.push(SurveyAnswer {
                    question: question.clone(),
                    answer: r.get("answer"),
                });
            }
        }

        Ok(())
    }
}
