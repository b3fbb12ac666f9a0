//! Final team assembly

use sdk::errors::EngineError;
use sdk::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use super::AllocationRun;

/// A finished team, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDraft {
    /// "Team N", 1-based in seating order
    pub name: String,
    /// Leader first, then members in the order they were placed
    pub members: Vec<MemberId>,
}

impl TeamDraft {
    pub fn leader(&self) -> Option<MemberId> {
        self.members.first().copied()
    }
}

/// Name teams sequentially and check the partition is well formed
///
/// Every team must be non-empty and no member may appear twice; either
/// failure is a logic fault in an earlier phase.
pub fn assemble(run: AllocationRun) -> Result<Vec<TeamDraft>, EngineError> {
    let mut seen = HashSet::new();
    let mut drafts = Vec::with_capacity(run.team_count());

    for (index, team) in run.into_teams().into_iter().enumerate() {
        if team.is_empty() {
            return Err(EngineError::invariant(format!(
                "team {} has no members",
                index + 1
            )));
        }

        let members: Vec<MemberId> = team.members().iter().map(|c| c.id).collect();
        for id in &members {
            if !seen.insert(*id) {
                return Err(EngineError::invariant(format!(
                    "member {} placed in more than one team",
                    id
                )));
            }
        }

        drafts.push(TeamDraft {
            name: format!("Team {}", index + 1),
            members,
        });
    }

    info!(
        "Assembled {} teams covering {} members",
        drafts.len(),
        seen.len()
    );
    Ok(drafts)
}
