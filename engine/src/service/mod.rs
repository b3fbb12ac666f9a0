//! Team building service
//!
//! Connects the balancing engine to a roster store. The service owns the run
//! lock: at most one build or clear is in flight against a store at a time,
//! and each one reads its member snapshot and commits its result under that
//! lock. The store is responsible for committing a run atomically.

use async_trait::async_trait;
use sdk::errors::EngineError;
use sdk::{Member, MemberId, TeamMemberView, TeamRecord, TeamView};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::balancing::{BalanceRequest, BalancingEngine, Signal, SignalExtractor, TeamDraft};

/// Persistence collaborator for team building
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Eligible members ordered by id, answers in recorded order
    async fn eligible_members(&self) -> Result<Vec<Member>, EngineError>;

    /// Every member including non-eligible ones
    async fn all_members(&self) -> Result<Vec<Member>, EngineError>;

    /// Atomically replace the stored team set and the grouped flags
    async fn replace_teams(
        &self,
        run_id: &str,
        drafts: &[TeamDraft],
    ) -> Result<Vec<TeamRecord>, EngineError>;

    /// The stored team set in seating order
    async fn stored_teams(&self) -> Result<Vec<TeamRecord>, EngineError>;

    /// Delete all teams and reset grouped flags; returns teams removed
    async fn clear_teams(&self) -> Result<u64, EngineError>;
}

/// Result of a committed run
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub run_id: String,
    pub teams: Vec<TeamRecord>,
}

/// Stored teams rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct TeamRoster {
    pub teams: Vec<TeamView>,
    /// Some eligible member is not on any stored team
    pub has_ungrouped: bool,
}

pub struct TeamBuildingService<S> {
    store: S,
    engine: BalancingEngine,
    run_lock: Mutex<()>,
}

impl<S: RosterStore> TeamBuildingService<S> {
    pub fn new(store: S, engine: BalancingEngine) -> Self {
        Self {
            store,
            engine,
            run_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Balance the current eligible pool and commit it as the new team set
    ///
    /// Input errors are returned before anything is written. A commit
    /// failure leaves the previously stored teams in place.
    pub async fn build_and_save(&self, request: BalanceRequest) -> Result<BuildOutcome, EngineError> {
        let _guard = self.run_lock.lock().await;

        let members = self.store.eligible_members().await?;
        let drafts = self.engine.balance(&members, request)?;

        let run_id = Uuid::new_v4().to_string();
        let teams = self.store.replace_teams(&run_id, &drafts).await?;

        info!("Run {} saved {} teams", run_id, teams.len());
        Ok(BuildOutcome { run_id, teams })
    }

    /// Stored teams with each member's survey highlights
    pub async fn show_teams(&self) -> Result<TeamRoster, EngineError> {
        let teams = self.store.stored_teams().await?;
        let members = self.store.all_members().await?;

        let has_ungrouped = members.iter().any(|m| m.is_eligible() && !m.grouped);
        let by_id: HashMap<MemberId, &Member> = members.iter().map(|m| (m.id, m)).collect();
        let extractor = SignalExtractor::new(self.engine.policy());

        let mut views = Vec::with_capacity(teams.len());
        for team in &teams {
            let leader = team.leader_id();
            let mut seated = Vec::with_capacity(team.member_ids.len());
            for id in &team.member_ids {
                let member = by_id.get(id).ok_or_else(|| {
                    warn!("Team {} references missing member {}", team.name, id);
                    EngineError::UnresolvedMember(id.0)
                })?;

                seated.push(TeamMemberView {
                    name: member.name.clone(),
                    personality: extractor.text(member, Signal::Personality),
                    preference_score: extractor.preference_score(member),
                    hobby: extractor.text(member, Signal::Hobby),
                    favorite_food: extractor.text(member, Signal::Food),
                    icebreaker: extractor.text(member, Signal::Icebreaker),
                    image: member.image.clone(),
                    leader: Some(*id) == leader,
                });
            }
            views.push(TeamView {
                name: team.name.clone(),
                members: seated,
            });
        }

        Ok(TeamRoster {
            teams: views,
            has_ungrouped,
        })
    }

    /// Remove every stored team and reset grouped flags
    pub async fn clear_teams(&self) -> Result<u64, EngineError> {
        let _guard = self.run_lock.lock().await;
        self.store.clear_teams().await
    }

    /// The eligible pool ordered by id
    pub async fn list_members(&self) -> Result<Vec<Member>, EngineError> {
        self.store.eligible_members().await
    }
}
