//! # Scoring Configuration
//!
//! House-rule knobs for the scoring engine, with presets.
//!
//! ```rust
//! use cricket_core::config::ScoringConfig;
//!
//! let config = ScoringConfig::from_json(r#"{"max_wickets_cap": 6}"#).unwrap();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.max_runs_per_ball, 7);
//! ```

use serde::{Deserialize, Serialize};

/// Most wickets any innings can lose.
pub const MAX_WICKETS: u32 = 10;

/// Ceiling for `ScoringConfig::max_runs_per_ball`.
pub const RUNS_PER_BALL_LIMIT: u32 = 10;

/// Weights of the man-of-the-match impact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManOfTheMatchWeights {
    /// Points per run scored (default: 1)
    pub run_weight: u32,
    /// Points per wicket credited to the bowler (default: 20)
    pub wicket_weight: u32,
    /// Points per maiden over (default: 5)
    pub maiden_weight: u32,
}

impl Default for ManOfTheMatchWeights {
    fn default() -> Self {
        Self { run_weight: 1, wicket_weight: 20, maiden_weight: 5 }
    }
}

/// Retry schedule for the background persistence worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts per job including the first (default: 5)
    pub max_attempts: u32,
    /// First backoff delay in ms (default: 200)
    pub initial_backoff_ms: u64,
    /// Backoff ceiling in ms (default: 10_000)
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, initial_backoff_ms: 200, max_backoff_ms: 10_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Wickets that end an innings, further limited by roster size - 1
    /// (default: 10, at most 10)
    pub max_wickets_cap: u32,
    /// Upper bound on runs entered for a single ball (default: 7, at most 10)
    pub max_runs_per_ball: u32,
    pub man_of_the_match: ManOfTheMatchWeights,
    pub retry: RetryPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_wickets_cap: MAX_WICKETS,
            max_runs_per_ball: 7,
            man_of_the_match: ManOfTheMatchWeights::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ScoringConfig {
    /// Standard limited-overs rules.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_WICKETS).contains(&self.max_wickets_cap) {
            return Err(format!(
                "max_wickets_cap must be between 1 and {MAX_WICKETS}, got {}",
                self.max_wickets_cap
            ));
        }
        if !(1..=RUNS_PER_BALL_LIMIT).contains(&self.max_runs_per_ball) {
            return Err(format!(
                "max_runs_per_ball must be between 1 and {RUNS_PER_BALL_LIMIT}, got {}",
                self.max_runs_per_ball
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be at least 1".to_string());
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(format!(
                "retry.initial_backoff_ms ({}) exceeds retry.max_backoff_ms ({})",
                self.retry.initial_backoff_ms, self.retry.max_backoff_ms
            ));
        }
        Ok(())
    }
}
