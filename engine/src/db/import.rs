/// Roster import
///
/// Loads questions, members and survey answers from a JSON file. Answers
/// reference questions by the file-local `key` so a roster can be written by
/// hand before any database ids exist.
///
/// ```json
/// {
///   "questions": [
///     { "key": "lead", "content": "Leadership rank", "category": "leadership", "kind": "metric" }
///   ],
///   "members": [
///     { "name": "Ari", "gender": "female", "answers": [{ "question": "lead", "answer": "2" }] }
///   ]
/// }
/// ```
use anyhow::{Context, Result};
use sdk::errors::EngineError;
use sdk::{Gender, QuestionCategory, QuestionKind, Role};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

use super::unix_now;

/// A roster file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionEntry {
    /// File-local reference used by answers
    pub key: String,
    pub content: String,
    #[serde(default = "default_category")]
    pub category: QuestionCategory,
    #[serde(default = "default_kind")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEntry {
    pub name: String,
    /// Free-form tag, parsed with `Gender::parse`
    #[serde(default)]
    pub gender: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEntry {
    /// Key of a question in the same file
    pub question: String,
    pub answer: String,
}

/// Counts of rows written by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub questions: usize,
    pub members: usize,
    pub answers: usize,
}

fn default_category() -> QuestionCategory {
    QuestionCategory::General
}

fn default_kind() -> QuestionKind {
    QuestionKind::Text
}

fn default_role() -> Role {
    Role::Participant
}

impl RosterFile {
    /// Read and parse a roster file
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse and check a roster document
    pub fn from_json(contents: &str) -> Result<Self, EngineError> {
        let roster: RosterFile = serde_json::from_str(contents)
            .map_err(|e| EngineError::Import(format!("Failed to parse roster: {}", e)))?;
        roster.check()?;
        Ok(roster)
    }

    /// Reject duplicate question keys, duplicate names and dangling answers
    pub fn check(&self) -> Result<(), EngineError> {
        let mut keys = HashSet::new();
        for question in &self.questions {
            if !keys.insert(question.key.as_str()) {
                return Err(EngineError::Import(format!(
                    "duplicate question key '{}'",
                    question.key
                )));
            }
        }

        let mut names = HashSet::new();
        for member in &self.members {
            if member.name.trim().is_empty() {
                return Err(EngineError::Import("member name is empty".to_string()));
            }
            if !names.insert(member.name.as_str()) {
                return Err(EngineError::Import(format!(
                    "duplicate member name '{}'",
                    member.name
                )));
            }
            for answer in &member.answers {
                if !keys.contains(answer.question.as_str()) {
                    return Err(EngineError::Import(format!(
                        "member '{}' answers unknown question '{}'",
                        member.name, answer.question
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Write a checked roster in one transaction
pub(crate) async fn import_roster(pool: &SqlitePool, roster: &RosterFile) -> Result<ImportSummary> {
    roster.check()?;

    let now = unix_now()?;
    let mut summary = ImportSummary::default();
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin import transaction")?;

    let mut question_ids: HashMap<&str, i64> = HashMap::new();
    for question in &roster.questions {
        let result = sqlx::query(
            "INSERT INTO questions (content, category, kind, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&question.content)
        .bind(question.category.as_str())
        .bind(question.kind.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to import question '{}'", question.key))?;

        let id = result.last_insert_rowid();
        for choice in &question.choices {
            sqlx::query("INSERT INTO question_choices (question_id, content) VALUES (?, ?)")
                .bind(id)
                .bind(choice)
                .execute(&mut *tx)
                .await
                .context("Failed to import question choice")?;
        }

        question_ids.insert(question.key.as_str(), id);
        summary.questions += 1;
    }

    for member in &roster.members {
        let result = sqlx::query(
            "INSERT INTO members (name, gender, role, image, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&member.name)
        .bind(Gender::parse(&member.gender).as_str())
        .bind(member.role.as_str())
        .bind(member.image.as_deref())
        .bind(now)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to import member '{}'", member.name))?;

        let member_id = result.last_insert_rowid();
        summary.members += 1;

        for answer in &member.answers {
            let question_id = question_ids
                .get(answer.question.as_str())
                .copied()
                .ok_or_else(|| {
                    EngineError::Import(format!("unknown question '{}'", answer.question))
                })?;

            sqlx::query(
                "INSERT INTO survey_answers (member_id, question_id, answer, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(member_id)
            .bind(question_id)
            .bind(&answer.answer)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to import survey answer")?;

            summary.answers += 1;
        }
    }

    tx.commit()
        .await
        .context("Failed to commit roster import")?;

    info!(
        "Imported {} questions, {} members, {} answers",
        summary.questions, summary.members, summary.answers
    );
    Ok(summary)
}
