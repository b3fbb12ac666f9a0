//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - build: Balance the eligible pool and save the teams
//! - teams: Show the saved teams
//! - clear: Delete the saved teams
//! - import: Load a roster file
//! - members: List the eligible pool

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use crate::balancing::{BalanceRequest, BalancingEngine};
use crate::config::Config;
use crate::db::{Database, RosterFile};
use crate::service::TeamBuildingService;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

async fn open_database(config: &Config) -> Result<Database> {
    Database::new(&config.db_path())
        .await
        .context("Failed to open database")
}

async fn open_service(config: &Config) -> Result<TeamBuildingService<Database>> {
    let database = open_database(config).await?;
    let engine = BalancingEngine::new(config.balancing_policy());
    Ok(TeamBuildingService::new(database, engine))
}

/// Balance the eligible pool into teams and save them
pub async fn handle_build(
    total: usize,
    teams: usize,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let service = open_service(config).await?;
    let outcome = service
        .build_and_save(BalanceRequest::new(total, teams))
        .await?;

    match format {
        OutputFormat::Text => {
            println!(
                "Built {} teams from {} members (run {})",
                outcome.teams.len(),
                total,
                outcome.run_id
            );
            for team in &outcome.teams {
                let ids: Vec<String> = team.member_ids.iter().map(|id| id.to_string()).collect();
                println!("  {}: {}", team.name, ids.join(", "));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

/// Show the saved teams with each member's survey highlights
pub async fn handle_teams(config: &Config, format: OutputFormat) -> Result<()> {
    let service = open_service(config).await?;
    let roster = service.show_teams().await?;

    match format {
        OutputFormat::Text => {
            if roster.teams.is_empty() {
                println!("No teams saved");
            }

            for team in &roster.teams {
                println!("{}", team.name);
                for member in &team.members {
                    let marker = if member.leader { "*" } else { " " };
                    println!(
                        " {} {} [{}] preference {}",
                        marker, member.name, member.personality, member.preference_score
                    );
                    if !member.hobby.is_empty() {
                        println!("      Hobby: {}", member.hobby);
                    }
                    if !member.favorite_food.is_empty() {
                        println!("      Food: {}", member.favorite_food);
                    }
                    if !member.icebreaker.is_empty() {
                        println!("      Icebreaker: {}", member.icebreaker);
                    }
                }
                println!();
            }

            if roster.has_ungrouped {
                println!("Some eligible members are not on a team");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
    }

    Ok(())
}

/// Delete the saved teams and reset grouped markers
pub async fn handle_clear(config: &Config, format: OutputFormat) -> Result<()> {
    let service = open_service(config).await?;
    let removed = service.clear_teams().await?;

    match format {
        OutputFormat::Text => println!("Removed {} teams", removed),
        OutputFormat::Json => {
            let output = json!({ "removed": removed });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Load members, questions and answers from a roster file
pub async fn handle_import(file: &Path, config: &Config, format: OutputFormat) -> Result<()> {
    let roster = RosterFile::from_path(file)
        .with_context(|| format!("Failed to load roster file {}", file.display()))?;

    let database = open_database(config).await?;
    let summary = database.import(&roster).await?;
    database.close().await?;

    match format {
        OutputFormat::Text => println!(
            "Imported {} questions, {} members, {} answers",
            summary.questions, summary.members, summary.answers
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

/// List the eligible pool
pub async fn handle_members(config: &Config, format: OutputFormat) -> Result<()> {
    let service = open_service(config).await?;
    let members = service.list_members().await?;

    match format {
        OutputFormat::Text => {
            if members.is_empty() {
                println!("No eligible members");
                return Ok(());
            }

            println!("Eligible members ({}):", members.len());
            for member in &members {
                println!(
                    "  {:>4}  {:<20} {:<12} {}",
                    member.id,
                    member.name,
                    member.gender.as_str(),
                    if member.grouped { "grouped" } else { "" }
                );
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "members": members
                    .iter()
                    .map(|m| json!({
                        "id": m.id,
                        "name": m.name,
                        "gender": m.gender,
                        "grouped": m.grouped,
                    }))
                    .collect::<Vec<_>>(),
                "count": members.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
