//! Configuration management
//!
//! This module handles loading, validation, and management of the roster
//! configuration. Configuration is stored in TOML format at
//! ~/.roster/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level, data directory
//! - **balancing**: Leader policy, score weights, pool size limit
//! - **survey**: Outward trait letter and question keywords
//!
//! # Path Expansion
//!
//! `core.data_dir` supports `~` expansion and is created if missing.
//!
//! # Examples
//!
//! ```no_run
//! use roster_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Database: {:?}", config.db_path());
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::balancing::{
    BalancingPolicy, KeywordTable, LeaderDirection, LeaderFallback, DEFAULT_GENDER_PENALTY,
    DEFAULT_MAX_MEMBERS, DEFAULT_OUTWARD_LETTER, DEFAULT_PREFERENCE_WEIGHT,
};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    pub core: CoreConfig,

    /// Balancing policy
    #[serde(default)]
    pub balancing: BalancingConfig,

    /// Survey interpretation
    #[serde(default)]
    pub survey: SurveyConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Balancing policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancingConfig {
    /// Largest eligible pool accepted per run
    #[serde(default = "default_max_members")]
    pub max_members: usize,

    /// lower_is_better or higher_is_better
    #[serde(default = "default_leader_direction")]
    pub leader_direction: LeaderDirection,

    /// Leader score for missing answers: zero or worst
    #[serde(default = "default_leader_fallback")]
    pub leader_fallback: LeaderFallback,

    /// Preference score for missing answers
    #[serde(default)]
    pub preference_fallback: i64,

    /// Weight of the preference gap in the greedy score
    #[serde(default = "default_preference_weight")]
    pub preference_weight: f64,

    /// Reconciliation distance multiplier for gender-skewed teams
    #[serde(default = "default_gender_penalty")]
    pub gender_penalty: f64,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            max_members: default_max_members(),
            leader_direction: default_leader_direction(),
            leader_fallback: default_leader_fallback(),
            preference_fallback: 0,
            preference_weight: default_preference_weight(),
            gender_penalty: default_gender_penalty(),
        }
    }
}

/// Survey interpretation configuration
///
/// Keyword lists match uncategorized questions by case-insensitive substring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Personality letter that marks the outward group
    #[serde(default = "default_outward_letter")]
    pub outward_letter: String,

    #[serde(default = "default_leadership_keywords")]
    pub leadership_keywords: Vec<String>,

    #[serde(default = "default_personality_keywords")]
    pub personality_keywords: Vec<String>,

    #[serde(default = "default_preference_keywords")]
    pub preference_keywords: Vec<String>,

    #[serde(default = "default_hobby_keywords")]
    pub hobby_keywords: Vec<String>,

    #[serde(default = "default_food_keywords")]
    pub food_keywords: Vec<String>,

    #[serde(default = "default_icebreaker_keywords")]
    pub icebreaker_keywords: Vec<String>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            outward_letter: default_outward_letter(),
            leadership_keywords: default_leadership_keywords(),
            personality_keywords: default_personality_keywords(),
            preference_keywords: default_preference_keywords(),
            hobby_keywords: default_hobby_keywords(),
            food_keywords: default_food_keywords(),
            icebreaker_keywords: default_icebreaker_keywords(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.roster")
}

fn default_max_members() -> usize {
    DEFAULT_MAX_MEMBERS
}

fn default_leader_direction() -> LeaderDirection {
    LeaderDirection::LowerIsBetter
}

fn default_leader_fallback() -> LeaderFallback {
    LeaderFallback::Worst
}

fn default_preference_weight() -> f64 {
    DEFAULT_PREFERENCE_WEIGHT
}

fn default_gender_penalty() -> f64 {
    DEFAULT_GENDER_PENALTY
}

fn default_outward_letter() -> String {
    DEFAULT_OUTWARD_LETTER.to_string()
}

fn default_leadership_keywords() -> Vec<String> {
    KeywordTable::default().leadership
}

fn default_personality_keywords() -> Vec<String> {
    KeywordTable::default().personality
}

fn default_preference_keywords() -> Vec<String> {
    KeywordTable::default().preference
}

fn default_hobby_keywords() -> Vec<String> {
    KeywordTable::default().hobby
}

fn default_food_keywords() -> Vec<String> {
    KeywordTable::default().food
}

fn default_icebreaker_keywords() -> Vec<String> {
    KeywordTable::default().icebreaker
}

impl Config {
    /// Load configuration from the default location (~/.roster/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        // Serialize before path expansion so the file keeps the portable "~" form
        let default = Self::default_config();
        let toml_string = toml::to_string_pretty(&default)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        let mut config = default;
        config.validate_and_process()?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.roster/config.toml)
    fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".roster").join("config.toml"))
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            core: CoreConfig {
                log_level: default_log_level(),
                data_dir: default_data_dir(),
            },
            balancing: BalancingConfig::default(),
            survey: SurveyConfig::default(),
        }
    }

    /// SQLite database file inside the data directory
    pub fn db_path(&self) -> PathBuf {
        self.core.data_dir.join("roster.db")
    }

    /// Balancing policy described by this configuration
    pub fn balancing_policy(&self) -> BalancingPolicy {
        let survey = &self.survey;
        BalancingPolicy {
            leader_direction: self.balancing.leader_direction,
            leader_fallback: self.balancing.leader_fallback,
            preference_fallback: self.balancing.preference_fallback,
            outward_letter: self
                .survey
                .outward_letter
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or(DEFAULT_OUTWARD_LETTER),
            preference_weight: self.balancing.preference_weight,
            gender_penalty: self.balancing.gender_penalty,
            max_members: self.balancing.max_members,
            keywords: KeywordTable {
                leadership: survey.leadership_keywords.clone(),
                personality: survey.personality_keywords.clone(),
                preference: survey.preference_keywords.clone(),
                hobby: survey.hobby_keywords.clone(),
                food: survey.food_keywords.clone(),
                icebreaker: survey.icebreaker_keywords.clone(),
            },
        }
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates log level, weights and limits
    /// - Validates the outward letter is a single ASCII letter
    /// - Expands ~ in the data directory and creates it
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.balancing.max_members == 0 {
            return Err(EngineError::Config(
                "max_members must be at least 1".to_string(),
            ));
        }

        if !self.balancing.preference_weight.is_finite() || self.balancing.preference_weight < 0.0
        {
            return Err(EngineError::Config(
                "preference_weight must be a non-negative number".to_string(),
            ));
        }

        if !self.balancing.gender_penalty.is_finite() || self.balancing.gender_penalty < 1.0 {
            return Err(EngineError::Config(
                "gender_penalty must be at least 1.0".to_string(),
            ));
        }

        let letter = self.survey.outward_letter.trim();
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                self.survey.outward_letter = c.to_ascii_uppercase().to_string();
            }
            _ => {
                return Err(EngineError::Config(format!(
                    "outward_letter must be a single letter, got '{}'",
                    self.survey.outward_letter
                )));
            }
        }

        self.core.data_dir = expand_path(&self.core.data_dir)?;

        if !self.core.data_dir.exists() {
            fs::create_dir_all(&self.core.data_dir).map_err(|e| {
                EngineError::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
