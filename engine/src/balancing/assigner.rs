//! Greedy balanced assignment
//!
//! Repeatedly places the (member, team) pair with the globally lowest trial
//! score until no team has an open slot or nobody is left. Scores live in a
//! member-by-team cache; after each placement only the receiving team's
//! column is recomputed, since no other team's aggregates changed.
//!
//! Ties keep the first pair found: earlier candidate in priority order, then
//! lower team index.

use sdk::errors::EngineError;
use tracing::debug;

use super::{AllocationRun, Candidate};

pub struct BalancedAssigner {
    preference_weight: f64,
}

struct ScoreCache {
    /// `scores[member][team]`, `None` once the team is full
    scores: Vec<Vec<Option<f64>>>,
}

impl ScoreCache {
    fn build(run: &AllocationRun, pending: &[Option<Candidate>], weight: f64) -> Self {
        let scores = pending
            .iter()
            .map(|slot| {
                run.teams()
                    .iter()
                    .map(|team| match slot {
                        Some(candidate) if team.has_open_slot() => {
                            Some(team.trial_score(candidate, weight))
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect();
        Self { scores }
    }

    fn refresh_team(
        &mut self,
        run: &AllocationRun,
        pending: &[Option<Candidate>],
        team_index: usize,
        weight: f64,
    ) {
        let team = &run.teams()[team_index];
        for (row, slot) in self.scores.iter_mut().zip(pending) {
            row[team_index] = match slot {
                Some(candidate) if team.has_open_slot() => Some(team.trial_score(candidate, weight)),
                _ => None,
            };
        }
    }

    fn best(&self, pending: &[Option<Candidate>]) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (member_index, row) in self.scores.iter().enumerate() {
            if pending[member_index].is_none() {
                continue;
            }
            for (team_index, score) in row.iter().enumerate() {
                let Some(score) = *score else { continue };
                if best.map_or(true, |(_, _, current)| score < current) {
                    best = Some((member_index, team_index, score));
                }
            }
        }
        best
    }
}

impl BalancedAssigner {
    pub fn new(preference_weight: f64) -> Self {
        Self { preference_weight }
    }

    /// Fill open slots from `remaining` (in priority order)
    ///
    /// Returns the members that could not be placed, still in priority order.
    pub fn assign(
        &self,
        run: &mut AllocationRun,
        remaining: Vec<Candidate>,
    ) -> Result<Vec<Candidate>, EngineError> {
        let mut pending: Vec<Option<Candidate>> = remaining.into_iter().map(Some).collect();
        let mut cache = ScoreCache::build(run, &pending, self.preference_weight);

        while let Some((member_index, team_index, score)) = cache.best(&pending) {
            let candidate = pending[member_index]
                .take()
                .ok_or_else(|| EngineError::invariant("best pair refers to a placed member"))?;
            debug!(
                "Assigned member {} to team {} (score {:.4})",
                candidate.id,
                team_index + 1,
                score
            );

            run.team_mut(team_index)?.fill_slot(candidate)?;
            cache.refresh_team(run, &pending, team_index, self.preference_weight);
        }

        Ok(pending.into_iter().flatten().collect())
    }
}
