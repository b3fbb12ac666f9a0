/// Survey question and answer persistence
///
/// Questions are authored with a typed category; the balancing engine reads
/// it directly and only falls back to keyword matching for `general` ones.
use anyhow::{Context, Result};
use sdk::{MemberId, Question, QuestionCategory, QuestionKind};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

use super::unix_now;

/// Survey repository for database operations
pub struct SurveyRepository {
    pool: SqlitePool,
}

impl SurveyRepository {
    /// Create a new survey repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a question together with its choices
    pub async fn create_question(
        &self,
        content: &str,
        category: QuestionCategory,
        kind: QuestionKind,
        choices: &[String],
    ) -> Result<Question> {
        let now = unix_now()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin question transaction")?;

        let result = sqlx::query(
            "INSERT INTO questions (content, category, kind, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(content)
        .bind(category.as_str())
        .bind(kind.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create question")?;

        let id = result.last_insert_rowid();

        for choice in choices {
            sqlx::query("INSERT INTO question_choices (question_id, content) VALUES (?, ?)")
                .bind(id)
                .bind(choice)
                .execute(&mut *tx)
                .await
                .context("Failed to add question choice")?;
        }

        tx.commit()
            .await
            .context("Failed to commit question")?;

        Ok(Question {
            id,
            content: content.to_string(),
            category,
            kind,
            choices: choices.to_vec(),
        })
    }

    /// List every question in authoring order
    pub async fn list_questions(&self) -> Result<Vec<Question>> {
        let mut questions: Vec<Question> = load_questions(&self.pool).await?.into_values().collect();
        questions.sort_by_key(|q| q.id);
        Ok(questions)
    }

    /// Record one member's answer to one question
    pub async fn record_answer(
        &self,
        member_id: MemberId,
        question_id: i64,
        answer: &str,
    ) -> Result<()> {
        let now = unix_now()?;

        sqlx::query(
            "INSERT INTO survey_answers (member_id, question_id, answer, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(member_id.0)
        .bind(question_id)
        .bind(answer)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to record survey answer")?;

        Ok(())
    }
}

/// Load every question with its choices, keyed by question id
pub(crate) async fn load_questions(pool: &SqlitePool) -> Result<HashMap<i64, Question>> {
    let rows = sqlx::query("SELECT id, content, category, kind FROM questions")
        .fetch_all(pool)
        .await
        .context("Failed to fetch questions")?;

    let mut questions: HashMap<i64, Question> = rows
        .into_iter()
        .map(|r| {
            let id: i64 = r.get("id");
            let question = Question {
                id,
                content: r.get("content"),
                category: QuestionCategory::parse(&r.get::<String, _>("category"))
                    .unwrap_or(QuestionCategory::General),
                kind: QuestionKind::parse(&r.get::<String, _>("kind"))
                    .unwrap_or(QuestionKind::Text),
                choices: Vec::new(),
            };
            (id, question)
        })
        .collect();

    let choices = sqlx::query("SELECT question_id, content FROM question_choices ORDER BY id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to fetch question choices")?;

    for r in choices {
        let question_id: i64 = r.get("question_id");
        if let Some(question) = questions.get_mut(&question_id) {
            question.choices.push(r.get("content"));
        }
    }

    Ok(questions)
}
