//! Integration tests for the team building service over SQLite
//!
//! Covers the end-to-end flow: import a roster, build and save teams, show
//! them, re-run, and clear.

use roster_engine::balancing::{BalanceRequest, BalancingEngine, BalancingPolicy};
use roster_engine::db::{Database, RosterFile};
use roster_engine::service::TeamBuildingService;
use sdk::errors::EngineError;
use sdk::MemberId;
use std::sync::Arc;
use tempfile::TempDir;

const ROSTER: &str = r#"{
    "questions": [
        { "key": "lead", "content": "Leadership rank", "category": "leadership", "kind": "metric" },
        { "key": "mbti", "content": "Your MBTI", "category": "personality" },
        { "key": "dinner", "content": "회식 선호도", "kind": "metric" },
        { "key": "hobby", "content": "취미가 무엇인가요?" },
        { "key": "food", "content": "Favourite food", "category": "food" },
        { "key": "wild", "content": "야생에서 살아남기", "category": "icebreaker" }
    ],
    "members": [
        { "name": "m1", "gender": "male", "image": "m1.png", "answers": [
            { "question": "lead", "answer": "1" }, { "question": "mbti", "answer": "ENTJ" },
            { "question": "dinner", "answer": "9" }, { "question": "hobby", "answer": "climbing" },
            { "question": "food", "answer": "tteokbokki" }, { "question": "wild", "answer": "fire" } ] },
        { "name": "m2", "gender": "female", "answers": [
            { "question": "lead", "answer": "2" }, { "question": "mbti", "answer": "INFP" },
            { "question": "dinner", "answer": "7" } ] },
        { "name": "m3", "gender": "female", "answers": [
            { "question": "lead", "answer": "5" }, { "question": "mbti", "answer": "ESFJ" },
            { "question": "dinner", "answer": "5" } ] },
        { "name": "m4", "gender": "male", "answers": [
            { "question": "lead", "answer": "6" }, { "question": "mbti", "answer": "ISTP" },
            { "question": "dinner", "answer": "3" } ] },
        { "name": "m5", "gender": "male", "answers": [
            { "question": "lead", "answer": "7" }, { "question": "mbti", "answer": "ENFP" },
            { "question": "dinner", "answer": "2" } ] },
        { "name": "m6", "gender": "female", "answers": [
            { "question": "lead", "answer": "8" }, { "question": "mbti", "answer": "INTJ" },
            { "question": "dinner", "answer": "1" } ] },
        { "name": "host", "gender": "female", "role": "staff" }
    ]
}"#;

async fn service(temp_dir: &TempDir) -> TeamBuildingService<Database> {
    let db = Database::new(&temp_dir.path().join("roster.db")).await.unwrap();
    db.import(&RosterFile::from_json(ROSTER).unwrap())
        .await
        .unwrap();
    TeamBuildingService::new(db, BalancingEngine::new(BalancingPolicy::default()))
}

#[tokio::test]
async fn test_build_and_show() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir).await;

    let outcome = service.build_and_save(BalanceRequest::new(6, 2)).await.unwrap();
    assert_eq!(outcome.teams.len(), 2);
    // Members were imported in order, so ids 1..6 match the names
    assert_eq!(
        outcome.teams[0].member_ids,
        vec![MemberId(1), MemberId(6), MemberId(4)]
    );
    assert_eq!(
        outcome.teams[1].member_ids,
        vec![MemberId(2), MemberId(5), MemberId(3)]
    );

    let roster = service.show_teams().await.unwrap();
    assert!(!roster.has_ungrouped);

    let leader = &roster.teams[0].members[0];
    assert_eq!(leader.name, "m1");
    assert!(leader.leader);
    assert_eq!(leader.personality, "ENTJ");
    assert_eq!(leader.preference_score, 9);
    assert_eq!(leader.hobby, "climbing");
    assert_eq!(leader.favorite_food, "tteokbokki");
    assert_eq!(leader.icebreaker, "fire");
    assert_eq!(leader.image.as_deref(), Some("m1.png"));

    assert!(roster.teams[1].members[0].leader);
    assert!(roster.teams[1].members[1..].iter().all(|m| !m.leader));
}

#[tokio::test]
async fn test_rerun_supersedes() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir).await;

    let first = service.build_and_save(BalanceRequest::new(6, 2)).await.unwrap();
    let second = service.build_and_save(BalanceRequest::new(6, 3)).await.unwrap();
    assert_ne!(first.run_id, second.run_id);

    let roster = service.show_teams().await.unwrap();
    assert_eq!(roster.teams.len(), 3);
    assert_eq!(roster.teams[2].name, "Team 3");

    let stored = service.store().teams().list_teams().await.unwrap();
    assert!(stored.iter().all(|t| t.run_id == second.run_id));
    let seated: usize = stored.iter().map(|t| t.member_ids.len()).sum();
    assert_eq!(seated, 6);
}

#[tokio::test]
async fn test_mismatch_leaves_previous_run() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir).await;

    let first = service.build_and_save(BalanceRequest::new(6, 2)).await.unwrap();

    // The staff member is not part of the pool
    let err = service
        .build_and_save(BalanceRequest::new(7, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let stored = service.store().teams().list_teams().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|t| t.run_id == first.run_id));
}

#[tokio::test]
async fn test_clear_then_show() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir).await;

    service.build_and_save(BalanceRequest::new(6, 2)).await.unwrap();
    assert_eq!(service.clear_teams().await.unwrap(), 2);

    let roster = service.show_teams().await.unwrap();
    assert!(roster.teams.is_empty());
    assert!(roster.has_ungrouped);

    let members = service.list_members().await.unwrap();
    assert_eq!(members.len(), 6);
    assert!(members.iter().all(|m| !m.grouped));
}

#[tokio::test]
async fn test_concurrent_builds_serialize() {
    let temp_dir = TempDir::new().unwrap();
    let service = Arc::new(service(&temp_dir).await);

    let a = {
        let service = service.clone();
        tokio::spawn(async move { service.build_and_save(BalanceRequest::new(6, 2)).await })
    };
    let b = {
        let service = service.clone();
        tokio::spawn(async move { service.build_and_save(BalanceRequest::new(6, 3)).await })
    };

    let a = a.await.unwrap().unwrap();
    let b = b.await.unwrap().unwrap();

    // Whichever committed last owns the whole stored set
    let stored = service.store().teams().list_teams().await.unwrap();
    let owner = &stored[0].run_id;
    assert!(owner == &a.run_id || owner == &b.run_id);
    assert!(stored.iter().all(|t| &t.run_id == owner));
    let seated: usize = stored.iter().map(|t| t.member_ids.len()).sum();
    assert_eq!(seated, 6);
}
