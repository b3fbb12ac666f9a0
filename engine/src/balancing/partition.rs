//! Trait and gender partitioning of followers

use sdk::Gender;

use super::{by_preference_desc, Candidate};

/// Followers of one trait group, split by gender
#[derive(Debug, Clone, Default)]
pub struct TraitGroup {
    pub male: Vec<Candidate>,
    pub female: Vec<Candidate>,
    pub unspecified: Vec<Candidate>,
}

impl TraitGroup {
    fn from_members(mut members: Vec<Candidate>) -> Self {
        members.sort_by(by_preference_desc);

        let mut group = Self::default();
        for candidate in members {
            match candidate.gender() {
                Gender::Male => group.male.push(candidate),
                Gender::Female => group.female.push(candidate),
                Gender::Unspecified => group.unspecified.push(candidate),
            }
        }
        group
    }

    pub fn len(&self) -> usize {
        self.male.len() + self.female.len() + self.unspecified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All members of the group, preference descending
    pub fn members(&self) -> Vec<&Candidate> {
        let mut all: Vec<&Candidate> = self
            .male
            .iter()
            .chain(&self.female)
            .chain(&self.unspecified)
            .collect();
        all.sort_by(|a, b| by_preference_desc(a, b));
        all
    }
}

/// Followers split into the outward trait group and everyone else
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub outward: TraitGroup,
    pub other: TraitGroup,
}

impl Partition {
    /// Candidates in the order the greedy assigner considers them
    ///
    /// Outward male, outward female, outward unspecified, then the same
    /// three for the other group; each sub-list preference descending.
    pub fn into_priority_order(self) -> Vec<Candidate> {
        let mut order = Vec::with_capacity(self.outward.len() + self.other.len());
        for group in [self.outward, self.other] {
            order.extend(group.male);
            order.extend(group.female);
            order.extend(group.unspecified);
        }
        order
    }
}

/// Split followers by the outward flag, then by gender
pub fn partition(followers: Vec<Candidate>) -> Partition {
    let (outward, other): (Vec<Candidate>, Vec<Candidate>) =
        followers.into_iter().partition(|c| c.outward);

    Partition {
        outward: TraitGroup::from_members(outward),
        other: TraitGroup::from_members(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancing::DerivedSignal;
    use sdk::MemberId;

    fn candidate(id: i64, gender: Gender, outward: bool, preference: i64) -> Candidate {
        Candidate {
            id: MemberId(id),
            name: format!("c{id}"),
            signal: DerivedSignal {
                leader_score: 0,
                trait_letter: if outward { "E" } else { "" }.to_string(),
                preference_score: preference,
                gender,
            },
            outward,
        }
    }

    #[test]
    fn test_split_by_trait_and_gender() {
        let followers = vec![
            candidate(1, Gender::Male, true, 3),
            candidate(2, Gender::Female, true, 5),
            candidate(3, Gender::Male, false, 1),
            candidate(4, Gender::Unspecified, false, 2),
            candidate(5, Gender::Male, true, 7),
        ];
        let p = partition(followers);

        assert_eq!(p.outward.len(), 3);
        assert_eq!(p.other.len(), 2);
        assert_eq!(
            p.outward.male.iter().map(|c| c.id.0).collect::<Vec<_>>(),
            vec![5, 1]
        );
        assert_eq!(p.other.unspecified.len(), 1);
    }

    #[test]
    fn test_members_sorted_with_id_tiebreak() {
        let followers = vec![
            candidate(9, Gender::Female, false, 4),
            candidate(2, Gender::Male, false, 4),
            candidate(5, Gender::Male, false, 6),
        ];
        let p = partition(followers);

        let order: Vec<i64> = p.other.members().iter().map(|c| c.id.0).collect();
        assert_eq!(order, vec![5, 2, 9]);
    }

    #[test]
    fn test_priority_order_keeps_everyone() {
        let followers = vec![
            candidate(1, Gender::Female, false, 1),
            candidate(2, Gender::Unspecified, true, 2),
            candidate(3, Gender::Male, false, 3),
            candidate(4, Gender::Female, true, 4),
            candidate(5, Gender::Male, true, 5),
        ];
        let order: Vec<i64> = partition(followers)
            .into_priority_order()
            .iter()
            .map(|c| c.id.0)
            .collect();

        assert_eq!(order, vec![5, 4, 2, 3, 1]);
    }

    #[test]
    fn test_empty_partition() {
        let p = partition(Vec::new());
        assert!(p.outward.is_empty());
        assert!(p.into_priority_order().is_empty());
    }
}
