//! Residual reconciliation
//!
//! Places members the greedy pass left over. Residuals are taken preference
//! descending (id ascending) and each goes to the team whose running
//! preference average is closest to the member's own score. When the member's
//! gender is already the team's most frequent one, that team's distance is
//! multiplied by the gender penalty. Every residual is placed exactly once.

use sdk::errors::EngineError;
use tracing::info;

use super::{by_preference_desc, AllocationRun, Candidate, TeamState};

/// Distance from `team` to `candidate`, with the gender-skew penalty applied
pub fn distance(team: &TeamState, candidate: &Candidate, gender_penalty: f64) -> f64 {
    let diff = (team.average_preference() - candidate.preference() as f64).abs();

    let own = team.gender_count(candidate.gender());
    let most = team.max_gender_count();
    if most > 0 && own == most {
        diff * gender_penalty
    } else {
        diff
    }
}

/// Place every residual member; returns how many were placed
pub fn reconcile(
    run: &mut AllocationRun,
    mut residual: Vec<Candidate>,
    gender_penalty: f64,
) -> Result<usize, EngineError> {
    if run.team_count() == 0 {
        return Err(EngineError::invariant("no teams to reconcile into"));
    }

    residual.sort_by(by_preference_desc);
    let placed = residual.len();

    for candidate in residual {
        let mut target = 0;
        let mut closest = f64::MAX;
        for (index, team) in run.teams().iter().enumerate() {
            let d = distance(team, &candidate, gender_penalty);
            if d < closest {
                closest = d;
                target = index;
            }
        }

        info!(
            "Reconciled member {} into team {} (distance {:.3})",
            candidate.id,
            target + 1,
            closest
        );
        run.team_mut(target)?.append(candidate);
    }

    Ok(placed)
}
