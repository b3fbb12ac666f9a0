//! Survey answer extraction
//!
//! Turns a member's free-form survey answers into the signals the engine
//! balances on. A question matches a signal when its authored category says
//! so; questions authored as `General` fall back to case-insensitive keyword
//! matching on their content. The first matching answer wins.
//!
//! Numeric signals never fail: a missing answer or one that is not an
//! integer resolves to the policy fallback.

use sdk::{Gender, Member, Question, QuestionCategory};
use serde::{Deserialize, Serialize};

use super::BalancingPolicy;

/// Signals that can be read from survey answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Leadership,
    Personality,
    Preference,
    Hobby,
    Food,
    Icebreaker,
}

impl Signal {
    /// Category that declares a question as carrying this signal
    pub fn category(&self) -> QuestionCategory {
        match self {
            Signal::Leadership => QuestionCategory::Leadership,
            Signal::Personality => QuestionCategory::Personality,
            Signal::Preference => QuestionCategory::Preference,
            Signal::Hobby => QuestionCategory::Hobby,
            Signal::Food => QuestionCategory::Food,
            Signal::Icebreaker => QuestionCategory::Icebreaker,
        }
    }
}

/// Keywords used to classify uncategorized questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub leadership: Vec<String>,
    pub personality: Vec<String>,
    pub preference: Vec<String>,
    pub hobby: Vec<String>,
    pub food: Vec<String>,
    pub icebreaker: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }

        Self {
            leadership: words(&["leadership", "대화"]),
            personality: words(&["personality", "mbti"]),
            preference: words(&["preference", "회식"]),
            hobby: words(&["hobby", "취미"]),
            food: words(&["food", "음식"]),
            icebreaker: words(&["icebreaker", "야생"]),
        }
    }
}

impl KeywordTable {
    pub fn keywords(&self, signal: Signal) -> &[String] {
        match signal {
            Signal::Leadership => &self.leadership,
            Signal::Personality => &self.personality,
            Signal::Preference => &self.preference,
            Signal::Hobby => &self.hobby,
            Signal::Food => &self.food,
            Signal::Icebreaker => &self.icebreaker,
        }
    }
}

/// Signals derived for one member in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSignal {
    pub leader_score: i64,
    /// Upper-cased first character of the personality answer, or empty
    pub trait_letter: String,
    pub preference_score: i64,
    pub gender: Gender,
}

impl DerivedSignal {
    pub fn is_outward(&self, outward_letter: char) -> bool {
        self.trait_letter.chars().next() == Some(outward_letter.to_ascii_uppercase())
    }
}

/// Reads signals out of a member's answers under a fixed policy
pub struct SignalExtractor<'a> {
    policy: &'a BalancingPolicy,
}

impl<'a> SignalExtractor<'a> {
    pub fn new(policy: &'a BalancingPolicy) -> Self {
        Self { policy }
    }

    fn matches(&self, question: &Question, signal: Signal) -> bool {
        if question.category == signal.category() {
            return true;
        }
        if question.category != QuestionCategory::General {
            return false;
        }

        let content = question.content.to_lowercase();
        self.policy
            .keywords
            .keywords(signal)
            .iter()
            .any(|keyword| content.contains(&keyword.to_lowercase()))
    }

    /// First answer given to a question carrying `signal`
    pub fn answer<'m>(&self, member: &'m Member, signal: Signal) -> Option<&'m str> {
        member
            .answers
            .iter()
            .find(|a| self.matches(&a.question, signal))
            .map(|a| a.answer.as_str())
    }

    /// Answer text for display, empty when unanswered
    pub fn text(&self, member: &Member, signal: Signal) -> String {
        self.answer(member, signal).unwrap_or_default().to_string()
    }

    fn integer(&self, member: &Member, signal: Signal, fallback: i64) -> i64 {
        self.answer(member, signal)
            .and_then(|a| a.trim().parse::<i64>().ok())
            .unwrap_or(fallback)
    }

    pub fn leader_score(&self, member: &Member) -> i64 {
        self.integer(
            member,
            Signal::Leadership,
            self.policy.leader_fallback_score(),
        )
    }

    pub fn preference_score(&self, member: &Member) -> i64 {
        self.integer(member, Signal::Preference, self.policy.preference_fallback)
    }

    pub fn trait_letter(&self, member: &Member) -> String {
        self.answer(member, Signal::Personality)
            .and_then(|a| a.trim().chars().next())
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default()
    }

    /// All balancing signals for `member`
    pub fn derive(&self, member: &Member) -> DerivedSignal {
        DerivedSignal {
            leader_score: self.leader_score(member),
            trait_letter: self.trait_letter(member),
            preference_score: self.preference_score(member),
            gender: member.gender,
        }
    }
}
