//! Roster SDK
//!
//! Shared domain types and error taxonomy for the roster team balancing
//! engine. Used by the engine crate and by anything embedding it.

/// Error types and handling
pub mod errors;

/// Member, survey and team types
pub mod types;

// Re-export commonly used types
pub use errors::{EngineError, RosterErrorExt};
pub use types::{
    Gender, Member, MemberId, Question, QuestionCategory, QuestionKind, Role, SurveyAnswer,
    TeamMemberView, TeamRecord, TeamView,
};
