//! Error types and handling
//!
//! This module provides the error types used throughout the roster engine.
//! All errors implement the `RosterErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Categories
//!
//! - **Input**: rejected before any allocation work starts (`InvalidInput`)
//! - **Consistency**: a drafted team references a member that cannot be
//!   resolved at commit time (`UnresolvedMember`)
//! - **Invariant**: an allocation phase reached a state that indicates a
//!   logic bug (`Invariant`)
//! - **Configuration / Database / Import / IO**: ambient failures
//!
//! Unparseable or missing survey answers are not errors; they resolve to the
//! signal's fallback value.

use thiserror::Error;

/// Trait for roster error extensions
///
/// Provides a short hint that is safe to show to end users, and whether the
/// failed operation may simply be retried.
pub trait RosterErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be fixed by the caller (different input, a
    /// corrected config file). Non-recoverable errors indicate corrupted data
    /// or a logic bug and abort the current run.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, RosterErrorExt};
///
/// let error = EngineError::InvalidInput("team count must be positive".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal = EngineError::UnresolvedMember(42);
/// assert!(!fatal.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Caller errors, raised before allocation begins
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Data consistency faults during persistence
    #[error("Member {0} could not be resolved to a stored member")]
    UnresolvedMember(i64),

    // Allocation logic faults
    #[error("Allocation invariant violated: {0}")]
    Invariant(String),

    // Roster import errors
    #[error("Import error: {0}")]
    Import(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Shorthand for building an `InvalidInput` error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for building an `Invariant` error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

impl RosterErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Database(_) => "Database operation failed. Check the data directory",
            Self::InvalidInput(_) => {
                "Check the member total and team count against the eligible pool"
            }
            Self::UnresolvedMember(_) => {
                "Stored members changed during the run. Nothing was saved; run it again"
            }
            Self::Invariant(_) => "Team balancing hit an internal error. Nothing was saved",
            Self::Import(_) => "Check the roster file format",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UnresolvedMember(_) | Self::Invariant(_))
    }
}
