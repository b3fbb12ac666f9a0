//! Team balancing engine
//!
//! Partitions the eligible member pool into `team_count` teams that are
//! balanced on four signals at once: leadership aptitude, personality trait,
//! declared gender and a numeric preference score.
//!
//! # Phases
//!
//! 1. **Extraction** (`extractor`): derive each member's signals once per run
//! 2. **Leader selection** (`leaders`): one leader per team, seated first
//! 3. **Partitioning** (`partition`): followers split by trait and gender,
//!    ordered by preference score
//! 4. **Greedy assignment** (`assigner`): fill open slots one member at a time
//!    with the globally cheapest (member, team) pair
//! 5. **Reconciliation** (`reconciler`): place any leftovers by nearest
//!    preference average
//! 6. **Assembly** (`assembler`): emit "Team 1".."Team N", leader first
//!
//! The engine is synchronous and pure: it reads one snapshot of members and
//! returns drafts. Persisting them is the caller's job.
//!
//! # Examples
//!
//! ```
//! use roster_engine::balancing::{BalanceRequest, BalancingEngine, BalancingPolicy};
//! use sdk::{Gender, Member, Question, QuestionCategory};
//!
//! let lead = Question::new(1, "Leadership rank").with_category(QuestionCategory::Leadership);
//! let members: Vec<Member> = (1..=4)
//!     .map(|id| Member::new(id, format!("m{id}"), Gender::Female).with_answer(lead.clone(), id.to_string()))
//!     .collect();
//!
//! let engine = BalancingEngine::new(BalancingPolicy::default());
//! let teams = engine.balance(&members, BalanceRequest::new(4, 2)).unwrap();
//!
//! assert_eq!(teams.len(), 2);
//! assert_eq!(teams[0].name, "Team 1");
//! ```

use sdk::errors::EngineError;
use sdk::{Gender, Member, MemberId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

pub mod assembler;
pub mod assigner;
pub mod extractor;
pub mod leaders;
pub mod partition;
pub mod reconciler;
pub mod state;

pub use assembler::TeamDraft;
pub use extractor::{DerivedSignal, KeywordTable, Signal, SignalExtractor};
pub use state::{AllocationRun, TeamState};

/// Weight of the preference gap in the greedy imbalance score
pub const DEFAULT_PREFERENCE_WEIGHT: f64 = 0.1;

/// Distance multiplier applied by the reconciler to gender-skewed teams
pub const DEFAULT_GENDER_PENALTY: f64 = 1.5;

/// Trait letter that marks the "outward" personality group
pub const DEFAULT_OUTWARD_LETTER: char = 'E';

/// Largest pool a single run accepts
pub const DEFAULT_MAX_MEMBERS: usize = 500;

/// Which end of the leader score marks a stronger leader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderDirection {
    /// Lowest scores become leaders (survey answer is a rank)
    LowerIsBetter,
    /// Highest scores become leaders (survey answer is an aptitude rating)
    HigherIsBetter,
}

/// Value used when a leader answer is missing or not an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderFallback {
    Zero,
    /// Least leader-like value for the configured direction
    Worst,
}

/// Fixed policy for one balancing run
#[derive(Debug, Clone, PartialEq)]
pub struct BalancingPolicy {
    pub leader_direction: LeaderDirection,
    pub leader_fallback: LeaderFallback,
    pub preference_fallback: i64,
    pub outward_letter: char,
    pub preference_weight: f64,
    pub gender_penalty: f64,
    pub max_members: usize,
    pub keywords: KeywordTable,
}

impl Default for BalancingPolicy {
    fn default() -> Self {
        Self {
            leader_direction: LeaderDirection::LowerIsBetter,
            leader_fallback: LeaderFallback::Worst,
            preference_fallback: 0,
            outward_letter: DEFAULT_OUTWARD_LETTER,
            preference_weight: DEFAULT_PREFERENCE_WEIGHT,
            gender_penalty: DEFAULT_GENDER_PENALTY,
            max_members: DEFAULT_MAX_MEMBERS,
            keywords: KeywordTable::default(),
        }
    }
}

impl BalancingPolicy {
    /// Resolved leader fallback score
    pub fn leader_fallback_score(&self) -> i64 {
        match (self.leader_fallback, self.leader_direction) {
            (LeaderFallback::Zero, _) => 0,
            (LeaderFallback::Worst, LeaderDirection::LowerIsBetter) => i64::MAX,
            (LeaderFallback::Worst, LeaderDirection::HigherIsBetter) => i64::MIN,
        }
    }
}

/// Invocation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRequest {
    /// Must equal the number of eligible members
    pub total_members: usize,
    pub team_count: usize,
}

impl BalanceRequest {
    pub fn new(total_members: usize, team_count: usize) -> Self {
        Self {
            total_members,
            team_count,
        }
    }
}

/// A member together with the signals derived for this run
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: MemberId,
    pub name: String,
    pub signal: DerivedSignal,
    /// Trait letter equals the outward letter
    pub outward: bool,
}

impl Candidate {
    pub fn gender(&self) -> Gender {
        self.signal.gender
    }

    pub fn preference(&self) -> i64 {
        self.signal.preference_score
    }

    pub fn is_male(&self) -> bool {
        self.signal.gender == Gender::Male
    }
}

/// Preference score descending, then member id ascending
pub fn by_preference_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.preference()
        .cmp(&a.preference())
        .then_with(|| a.id.cmp(&b.id))
}

/// Balancing engine
pub struct BalancingEngine {
    policy: BalancingPolicy,
}

impl BalancingEngine {
    pub fn new(policy: BalancingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BalancingPolicy {
        &self.policy
    }

    /// Check invocation parameters against the eligible pool size
    ///
    /// Runs before any allocation work so that a rejected request produces
    /// no partial state.
    pub fn validate(&self, pool_size: usize, request: &BalanceRequest) -> Result<(), EngineError> {
        if request.team_count == 0 {
            return Err(EngineError::invalid_input("team count must be at least 1"));
        }
        if request.total_members != pool_size {
            return Err(EngineError::invalid_input(format!(
                "requested {} members but {} eligible members exist",
                request.total_members, pool_size
            )));
        }
        if request.team_count > request.total_members {
            return Err(EngineError::invalid_input(format!(
                "team count {} exceeds member total {}",
                request.team_count, request.total_members
            )));
        }
        if request.total_members > self.policy.max_members {
            return Err(EngineError::invalid_input(format!(
                "{} members exceeds the limit of {} per run",
                request.total_members, self.policy.max_members
            )));
        }
        Ok(())
    }

    /// Derive the candidate table for the eligible members, ordered by id
    pub fn candidates(&self, members: &[Member]) -> Vec<Candidate> {
        let extractor = SignalExtractor::new(&self.policy);
        let mut candidates: Vec<Candidate> = members
            .iter()
            .filter(|m| m.is_eligible())
            .map(|m| {
                let signal = extractor.derive(m);
                let outward = signal.is_outward(self.policy.outward_letter);
                Candidate {
                    id: m.id,
                    name: m.name.clone(),
                    signal,
                    outward,
                }
            })
            .collect();
        candidates.sort_by_key(|c| c.id);
        candidates
    }

    /// Partition the eligible members into balanced teams
    pub fn balance(
        &self,
        members: &[Member],
        request: BalanceRequest,
    ) -> Result<Vec<TeamDraft>, EngineError> {
        let candidates = self.candidates(members);
        self.validate(candidates.len(), &request)?;

        info!(
            "Balancing {} members into {} teams",
            request.total_members, request.team_count
        );

        let leaders = leaders::select_leaders(
            &candidates,
            request.team_count,
            self.policy.leader_direction,
        )?;
        debug!(
            "Leaders in seating order: {:?}",
            leaders.iter().map(|c| c.id).collect::<Vec<_>>()
        );

        let followers: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| !leaders.iter().any(|l| l.id == c.id))
            .collect();

        let groups = partition::partition(followers);
        debug!(
            "Followers partitioned: {} outward, {} other",
            groups.outward.len(),
            groups.other.len()
        );

        let slots = state::compute_slots(request.total_members, request.team_count)?;
        let mut run = AllocationRun::new(leaders, slots)?;

        let assigner = assigner::BalancedAssigner::new(self.policy.preference_weight);
        let residual = assigner.assign(&mut run, groups.into_priority_order())?;

        if !residual.is_empty() {
            info!("{} members left after greedy pass", residual.len());
            reconciler::reconcile(&mut run, residual, self.policy.gender_penalty)?;
        }

        assembler::assemble(run)
    }
}
