//! Leader selection
//!
//! Ranks the pool by leader score in the policy direction (ties broken by
//! member id ascending) and takes the first `team_count`. The chosen leaders
//! are then re-ordered by preference score descending, id ascending; that
//! order is the seating order, so leader `i` heads team `i + 1`.

use sdk::errors::EngineError;

use super::{by_preference_desc, Candidate, LeaderDirection};

pub fn select_leaders(
    candidates: &[Candidate],
    team_count: usize,
    direction: LeaderDirection,
) -> Result<Vec<Candidate>, EngineError> {
    if team_count == 0 {
        return Err(EngineError::invalid_input("team count must be at least 1"));
    }
    if team_count > candidates.len() {
        return Err(EngineError::invalid_input(format!(
            "cannot pick {} leaders from {} members",
            team_count,
            candidates.len()
        )));
    }

    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| {
        let by_score = match direction {
            LeaderDirection::LowerIsBetter => a.signal.leader_score.cmp(&b.signal.leader_score),
            LeaderDirection::HigherIsBetter => b.signal.leader_score.cmp(&a.signal.leader_score),
        };
        by_score.then_with(|| a.id.cmp(&b.id))
    });

    let mut leaders: Vec<Candidate> = ranked.into_iter().take(team_count).cloned().collect();
    leaders.sort_by(by_preference_desc);

    Ok(leaders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancing::DerivedSignal;
    use sdk::{Gender, MemberId};

    fn candidate(id: i64, leader_score: i64, preference: i64) -> Candidate {
        Candidate {
            id: MemberId(id),
            name: format!("c{id}"),
            signal: DerivedSignal {
                leader_score,
                trait_letter: String::new(),
                preference_score: preference,
                gender: Gender::Unspecified,
            },
            outward: false,
        }
    }

    fn ids(leaders: &[Candidate]) -> Vec<i64> {
        leaders.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn test_lower_is_better() {
        let pool = vec![
            candidate(1, 5, 0),
            candidate(2, 1, 0),
            candidate(3, 3, 0),
            candidate(4, 2, 0),
        ];
        let leaders = select_leaders(&pool, 2, LeaderDirection::LowerIsBetter).unwrap();
        // equal preference -> seated by id
        assert_eq!(ids(&leaders), vec![2, 4]);
    }

    #[test]
    fn test_higher_is_better() {
        let pool = vec![
            candidate(1, 5, 0),
            candidate(2, 1, 0),
            candidate(3, 9, 0),
        ];
        let leaders = select_leaders(&pool, 2, LeaderDirection::HigherIsBetter).unwrap();
        assert_eq!(ids(&leaders), vec![1, 3]);
    }

    #[test]
    fn test_score_ties_break_by_id() {
        let pool = vec![
            candidate(7, 1, 0),
            candidate(3, 1, 0),
            candidate(5, 1, 0),
        ];
        let leaders = select_leaders(&pool, 2, LeaderDirection::LowerIsBetter).unwrap();
        assert_eq!(ids(&leaders), vec![3, 5]);
    }

    #[test]
    fn test_seating_by_preference_desc() {
        let pool = vec![
            candidate(1, 1, 2),
            candidate(2, 2, 8),
            candidate(3, 3, 8),
            candidate(4, 9, 10),
        ];
        let leaders = select_leaders(&pool, 3, LeaderDirection::LowerIsBetter).unwrap();
        // chosen 1, 2, 3; seated 2 (8), 3 (8), 1 (2)
        assert_eq!(ids(&leaders), vec![2, 3, 1]);
    }

    #[test]
    fn test_rejects_oversized_team_count() {
        let pool = vec![candidate(1, 1, 1)];
        assert!(select_leaders(&pool, 2, LeaderDirection::LowerIsBetter).is_err());
        assert!(select_leaders(&pool, 0, LeaderDirection::LowerIsBetter).is_err());
    }
}
