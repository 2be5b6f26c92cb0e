//! MindQuest configuration
//!
//! Every section has defaults, so an empty TOML file is a valid config:
//!
//! ```toml
//! generation_endpoint = "https://mindquest.example/api/generateContent"
//!
//! [rewards]
//! big_quest = 60
//!
//! [limits]
//! hydration_goal = 10
//! ```

use crate::error::ConfigError;
use mq_progress::BADGE_BONUS_XP;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// XP paid per action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// First mood check-in of the day
    pub mood: u64,
    /// One small task
    pub task: u64,
    /// The Big Quest
    pub big_quest: u64,
    /// Reaching the hydration goal
    pub hydration: u64,
    /// All fitness tasks of a day
    pub fitness: u64,
    /// Each newly earned badge
    pub badge_bonus: u64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            mood: 5,
            task: 10,
            big_quest: 50,
            hydration: 20,
            fitness: 25,
            badge_bonus: BADGE_BONUS_XP,
        }
    }
}

/// Caps and thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Glasses of water per day
    pub hydration_goal: u8,
    /// Hours between hydration reminders
    pub hydration_reminder_hours: u32,
    /// Mood check-ins kept
    pub mood_history: usize,
    /// Completed task texts kept
    pub task_history: usize,
    /// Completed task texts sent with the daily prompt
    pub prompt_history: usize,
    /// Minimum characters in a journaling-task answer
    pub min_task_journal_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            hydration_goal: 8,
            hydration_reminder_hours: 2,
            mood_history: 30,
            task_history: 50,
            prompt_history: 14,
            min_task_journal_chars: 10,
        }
    }
}

/// Low-mood support notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// Days before the notice may show again
    pub cooldown_days: u64,
    /// Resource linked from the notice
    pub resource_url: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            cooldown_days: 7,
            resource_url: "https://www.who.int/health-topics/mental-health".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindQuestConfig {
    /// Generation proxy URL
    pub generation_endpoint: String,
    /// XP amounts
    pub rewards: Rewards,
    /// Caps and thresholds
    pub limits: Limits,
    /// Support notice
    pub support: SupportConfig,
}

impl Default for MindQuestConfig {
    fn default() -> Self {
        Self {
            generation_endpoint: "http://127.0.0.1:8787/api/generateContent".to_string(),
            rewards: Rewards::default(),
            limits: Limits::default(),
            support: SupportConfig::default(),
        }
    }
}

impl MindQuestConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// With generation endpoint
    #[inline]
    #[must_use]
    pub fn with_generation_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.generation_endpoint = endpoint.into();
        self
    }

    /// With reward amounts
    #[inline]
    #[must_use]
    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// With limits
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// With support resource URL
    #[inline]
    #[must_use]
    pub fn with_support_url(mut self, url: impl Into<String>) -> Self {
        self.support.resource_url = url.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.hydration_goal == 0 {
            return Err(ConfigError::Invalid("limits.hydration_goal must be at least 1".into()));
        }
        if self.limits.mood_history == 0 || self.limits.task_history == 0 {
            return Err(ConfigError::Invalid("history caps must be at least 1".into()));
        }
        if self.generation_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("generation_endpoint is empty".into()));
        }
        Ok(())
    }
}
