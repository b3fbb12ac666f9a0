//! Member, survey and team types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable member identity
///
/// Totally ordered; every tie-break in the balancing engine falls back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared gender tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    /// Parse a free-form gender tag, case-insensitively
    ///
    /// Unknown or empty tags map to `Unspecified`.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "male" | "m" | "man" | "남자" => Gender::Male,
            "female" | "f" | "woman" | "여자" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "unspecified",
        }
    }
}

/// Membership pool role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Eligible for team balancing
    Participant,
    /// Organizers; never balanced into teams
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Participant => "participant",
            Role::Staff => "staff",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "participant" => Some(Role::Participant),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

/// Category assigned to a question when it is authored
///
/// `General` questions carry no declared meaning; the signal extractor
/// falls back to keyword matching on their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Leadership,
    Personality,
    Preference,
    Hobby,
    Food,
    Icebreaker,
    General,
}

impl QuestionCategory {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionCategory::Leadership => "leadership",
            QuestionCategory::Personality => "personality",
            QuestionCategory::Preference => "preference",
            QuestionCategory::Hobby => "hobby",
            QuestionCategory::Food => "food",
            QuestionCategory::Icebreaker => "icebreaker",
            QuestionCategory::General => "general",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "leadership" => Some(QuestionCategory::Leadership),
            "personality" => Some(QuestionCategory::Personality),
            "preference" => Some(QuestionCategory::Preference),
            "hobby" => Some(QuestionCategory::Hobby),
            "food" => Some(QuestionCategory::Food),
            "icebreaker" => Some(QuestionCategory::Icebreaker),
            "general" => Some(QuestionCategory::General),
            _ => None,
        }
    }
}

/// Answer format of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// 1 to 10 scale
    Metric,
    /// Free text
    Text,
    /// One of a fixed set of choices
    Choice,
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionKind::Metric => "metric",
            QuestionKind::Text => "text",
            QuestionKind::Choice => "choice",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "metric" => Some(QuestionKind::Metric),
            "text" => Some(QuestionKind::Text),
            "choice" => Some(QuestionKind::Choice),
            _ => None,
        }
    }
}

/// Survey question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub content: String,
    pub category: QuestionCategory,
    pub kind: QuestionKind,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl Question {
    /// Create an uncategorized free-text question
    pub fn new(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            category: QuestionCategory::General,
            kind: QuestionKind::Text,
            choices: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: QuestionCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_kind(mut self, kind: QuestionKind) -> Self {
        self.kind = kind;
        self
    }
}

/// One member's answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub question: Question,
    pub answer: String,
}

/// A registered member with their survey answers
///
/// Answers are kept in the order they were given; lookups are
/// first-match-wins over that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub gender: Gender,
    pub role: Role,
    /// Set once the member has been placed by a committed run
    #[serde(default)]
    pub grouped: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub answers: Vec<SurveyAnswer>,
}

impl Member {
    /// Create an eligible member with no answers
    pub fn new(id: i64, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: MemberId(id),
            name: name.into(),
            gender,
            role: Role::Participant,
            grouped: false,
            image: None,
            answers: Vec::new(),
        }
    }

    /// Append an answer
    pub fn with_answer(mut self, question: Question, answer: impl Into<String>) -> Self {
        self.answers.push(SurveyAnswer {
            question,
            answer: answer.into(),
        });
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_eligible(&self) -> bool {
        self.role == Role::Participant
    }
}

/// A stored team from a committed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: i64,
    pub run_id: String,
    pub name: String,
    pub position: i64,
    /// Leader first
    pub member_ids: Vec<MemberId>,
}

impl TeamRecord {
    pub fn leader_id(&self) -> Option<MemberId> {
        self.member_ids.first().copied()
    }
}

/// Display projection of one team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberView {
    pub name: String,
    pub personality: String,
    pub preference_score: i64,
    pub hobby: String,
    pub favorite_food: String,
    pub icebreaker: String,
    pub image: Option<String>,
    pub leader: bool,
}

/// Display projection of one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamView {
    pub name: String,
    pub members: Vec<TeamMemberView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_aliases() {
        assert_eq!(Gender::parse("Male"), Gender::Male);
        assert_eq!(Gender::parse(" F "), Gender::Female);
        assert_eq!(Gender::parse("남자"), Gender::Male);
        assert_eq!(Gender::parse("여자"), Gender::Female);
        assert_eq!(Gender::parse(""), Gender::Unspecified);
        assert_eq!(Gender::parse("nonbinary"), Gender::Unspecified);
    }

    #[test]
    fn test_member_id_ordering() {
        let mut ids = vec![MemberId(3), MemberId(1), MemberId(2)];
        ids.sort();
        assert_eq!(ids, vec![MemberId(1), MemberId(2), MemberId(3)]);
    }

    #[test]
    fn test_member_builder() {
        let q = Question::new(1, "Your MBTI?").with_category(QuestionCategory::Personality);
        let member = Member::new(5, "Ari", Gender::Female).with_answer(q, "ENFP");

        assert!(member.is_eligible());
        assert!(!member.grouped);
        assert_eq!(member.answers.len(), 1);
        assert_eq!(member.answers[0].answer, "ENFP");
    }

    #[test]
    fn test_staff_not_eligible() {
        let member = Member::new(1, "Kim", Gender::Male).with_role(Role::Staff);
        assert!(!member.is_eligible());
    }

    #[test]
    fn test_category_round_trip_strings() {
        for category in [
            QuestionCategory::Leadership,
            QuestionCategory::Personality,
            QuestionCategory::Preference,
            QuestionCategory::Hobby,
            QuestionCategory::Food,
            QuestionCategory::Icebreaker,
            QuestionCategory::General,
        ] {
            assert_eq!(QuestionCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(QuestionCategory::parse("unknown"), None);
    }

    #[test]
    fn test_team_record_leader() {
        let record = TeamRecord {
            id: 1,
            run_id: "run".to_string(),
            name: "Team 1".to_string(),
            position: 0,
            member_ids: vec![MemberId(9), MemberId(2)],
        };
        assert_eq!(record.leader_id(), Some(MemberId(9)));
    }

    #[test]
    fn test_member_serde() {
        let member = Member::new(2, "Jun", Gender::Male);
        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains("\"id\":2"));
        assert!(json.contains("\"gender\":\"male\""));

        let parsed: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, member);
    }
}
