//! In-memory state of one allocation run
//!
//! Each team keeps running aggregates (outward count, male count, preference
//! sum, gender tally) so that trial scores and averages are O(1) to compute.
//! The leader occupies position 0 from construction on; members are only
//! ever appended.

use sdk::errors::EngineError;
use sdk::Gender;

use super::Candidate;

/// Open slots per team, leader seat excluded
///
/// `slots[i] = total / team_count + (1 if i < total % team_count) - 1`
pub fn compute_slots(total: usize, team_count: usize) -> Result<Vec<usize>, EngineError> {
    if team_count == 0 {
        return Err(EngineError::invariant("slot computation with zero teams"));
    }

    let base = total / team_count;
    let remainder = total % team_count;

    (0..team_count)
        .map(|i| {
            let seats = base + usize::from(i < remainder);
            seats.checked_sub(1).ok_or_else(|| {
                EngineError::invariant(format!("team {} has no seat for its leader", i + 1))
            })
        })
        .collect()
}

/// One team under construction
#[derive(Debug, Clone)]
pub struct TeamState {
    members: Vec<Candidate>,
    slots: usize,
    outward_count: usize,
    male_count: usize,
    preference_sum: f64,
    genders: [usize; 3],
}

fn gender_index(gender: Gender) -> usize {
    match gender {
        Gender::Male => 0,
        Gender::Female => 1,
        Gender::Unspecified => 2,
    }
}

impl TeamState {
    /// Seat `leader` with `slots` open places behind them
    pub fn new(leader: Candidate, slots: usize) -> Self {
        let mut team = Self {
            members: Vec::new(),
            slots,
            outward_count: 0,
            male_count: 0,
            preference_sum: 0.0,
            genders: [0; 3],
        };
        team.seat(leader);
        team
    }

    fn seat(&mut self, candidate: Candidate) {
        if candidate.outward {
            self.outward_count += 1;
        }
        if candidate.is_male() {
            self.male_count += 1;
        }
        self.preference_sum += candidate.preference() as f64;
        self.genders[gender_index(candidate.gender())] += 1;
        self.members.push(candidate);
    }

    pub fn members(&self) -> &[Candidate] {
        &self.members
    }

    pub fn leader(&self) -> Option<&Candidate> {
        self.members.first()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn has_open_slot(&self) -> bool {
        self.slots > 0
    }

    pub fn average_preference(&self) -> f64 {
        if self.members.is_empty() {
            0.0
        } else {
            self.preference_sum / self.members.len() as f64
        }
    }

    pub fn gender_count(&self, gender: Gender) -> usize {
        self.genders[gender_index(gender)]
    }

    /// Count of the team's most frequent gender
    pub fn max_gender_count(&self) -> usize {
        self.genders.iter().copied().max().unwrap_or(0)
    }

    /// Imbalance score if `candidate` joined this team
    ///
    /// `|outward share - 0.5| + |male share - 0.5| + weight * |avg preference - candidate preference|`,
    /// all measured with the candidate included.
    pub fn trial_score(&self, candidate: &Candidate, preference_weight: f64) -> f64 {
        let size = (self.members.len() + 1) as f64;
        let outward = (self.outward_count + usize::from(candidate.outward)) as f64;
        let male = (self.male_count + usize::from(candidate.is_male())) as f64;
        let preference = candidate.preference() as f64;
        let average = (self.preference_sum + preference) / size;

        (outward / size - 0.5).abs()
            + (male / size - 0.5).abs()
            + preference_weight * (average - preference).abs()
    }

    /// Place `candidate` into one of the open slots
    pub fn fill_slot(&mut self, candidate: Candidate) -> Result<(), EngineError> {
        self.slots = self.slots.checked_sub(1).ok_or_else(|| {
            EngineError::invariant(format!("no open slot left for member {}", candidate.id))
        })?;
        self.seat(candidate);
        Ok(())
    }

    /// Append `candidate` regardless of slots (reconciliation path)
    pub fn append(&mut self, candidate: Candidate) {
        self.seat(candidate);
    }
}

/// Teams of one run, indexed by seating order
#[derive(Debug, Clone)]
pub struct AllocationRun {
    teams: Vec<TeamState>,
}

impl AllocationRun {
    /// Seat leaders, in order, at the head of each team
    pub fn new(leaders: Vec<Candidate>, slots: Vec<usize>) -> Result<Self, EngineError> {
        if leaders.len() != slots.len() {
            return Err(EngineError::invariant(format!(
                "{} leaders for {} teams",
                leaders.len(),
                slots.len()
            )));
        }

        let teams = leaders
            .into_iter()
            .zip(slots)
            .map(|(leader, slots)| TeamState::new(leader, slots))
            .collect();

        Ok(Self { teams })
    }

    pub fn teams(&self) -> &[TeamState] {
        &self.teams
    }

    pub fn team_mut(&mut self, index: usize) -> Result<&mut TeamState, EngineError> {
        self.teams
            .get_mut(index)
            .ok_or_else(|| EngineError::invariant(format!("team index {} out of range", index)))
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn into_teams(self) -> Vec<TeamState> {
        self.teams
    }
}
