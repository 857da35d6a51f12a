//! One-call JSON scoring.
//!
//! A request carries the setup-screen input, the toss and the scorer's
//! command log; the response is the state after replaying those commands.
//! Hosts that keep their own command log call this after every command.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::config_env::scoring_config_from_env;
use crate::config::ScoringConfig;
use crate::engine::{resolve_match_setup, MatchController, MatchSnapshot, ScoringPhase};
use crate::error::ScoringError;
use crate::models::{MatchSetup, MatchSummary, RosterInput, ScoringCommand, TossInput};
use crate::SCHEMA_VERSION;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub schema_version: u8,
    /// Seeds the coin (random toss) and, when `match_id` is absent, the id
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub match_id: Option<Uuid>,
    pub roster: RosterInput,
    pub toss: TossInput,
    #[serde(default)]
    pub commands: Vec<ScoringCommand>,
    /// Overrides `CRICKET_SCORING_CONFIG_PATH` and the defaults
    #[serde(default)]
    pub config: Option<ScoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub schema_version: u8,
    pub phase: ScoringPhase,
    pub setup: MatchSetup,
    pub snapshot: MatchSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<MatchSummary>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON request: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(u8),

    #[error("Invalid scoring config: {0}")]
    Config(String),

    #[error("Command {index} ({name}) rejected: {source}")]
    CommandRejected {
        index: usize,
        name: &'static str,
        #[source]
        source: ScoringError,
    },

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

fn resolve_config(requested: Option<ScoringConfig>) -> Result<ScoringConfig, ApiError> {
    let config = match requested {
        Some(config) => config,
        None => scoring_config_from_env().map_err(ApiError::Config)?.unwrap_or_default(),
    };
    config.validate().map_err(ApiError::Config)?;
    Ok(config)
}

/// Builds the match and replays the request's commands.
pub fn score_match(request: ScoreRequest) -> Result<ScoreResponse, ApiError> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(ApiError::UnsupportedSchema(request.schema_version));
    }

    let ScoreRequest { seed, match_id, roster, toss, commands, config, .. } = request;
    let config = resolve_config(config)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let match_id =
        match_id.unwrap_or_else(|| uuid::Builder::from_random_bytes(rng.gen()).into_uuid());
    let setup = resolve_match_setup(match_id, &roster, &toss, &mut rng)?;

    let mut controller = MatchController::new(setup, config)?;
    for (index, command) in commands.into_iter().enumerate() {
        let name = command.name();
        controller
            .apply(command)
            .map_err(|source| ApiError::CommandRejected { index, name, source })?;
    }

    Ok(ScoreResponse {
        schema_version: SCHEMA_VERSION,
        phase: controller.phase(),
        snapshot: MatchSnapshot::capture(&controller),
        summary: controller.summary().cloned(),
        setup: controller.setup().clone(),
    })
}

/// JSON in, JSON out. Errors come back as display strings.
pub fn score_match_json(request_json: &str) -> Result<String, String> {
    let request: ScoreRequest = serde_json::from_str(request_json)
        .map_err(|e| ApiError::InvalidJson(e).to_string())?;
    let response = score_match(request).map_err(|e| e.to_string())?;
    serde_json::to_string(&response).map_err(|e| format!("Failed to serialize response: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::scripted_commands;
    use crate::models::{MatchResult, TeamSide};
    use serde_json::json;

    fn request(commands: Vec<ScoringCommand>) -> serde_json::Value {
        json!({
            "schema_version": 1,
            "seed": 9,
            "roster": {
                "my_team_name": "Lions",
                "opponent_team_name": "Tigers",
                "my_team_players": (0..11).map(|i| format!("Lion {i}")).collect::<Vec<_>>(),
                "opponent_team_players": (0..11).map(|i| format!("Tiger {i}")).collect::<Vec<_>>(),
                "match_overs": 2
            },
            "toss": {"method": "manual", "winner": "home", "decision": "bat"},
            "commands": commands,
            "config": ScoringConfig::standard()
        })
    }

    #[test]
    fn test_score_full_match_json() {
        let response = score_match_json(&request(scripted_commands()).to_string()).unwrap();
        let response: ScoreResponse = serde_json::from_str(&response).unwrap();

        assert_eq!(response.phase, ScoringPhase::MatchComplete);
        let summary = response.summary.unwrap();
        assert_eq!(summary.winner, Some(TeamSide::Away));
        assert!(matches!(summary.result, MatchResult::SecondSideWins { .. }));
        assert_eq!(response.snapshot.sequence, 33);
    }

    #[test]
    fn test_seed_fixes_the_match_id() {
        let first = score_match(serde_json::from_value(request(Vec::new())).unwrap()).unwrap();
        let second = score_match(serde_json::from_value(request(Vec::new())).unwrap()).unwrap();

        assert_eq!(first.setup.match_id, second.setup.match_id);
        assert!(!first.setup.match_id.is_nil());
        assert_eq!(first.phase, ScoringPhase::AwaitingOpening);
        assert!(first.summary.is_none());
    }

    #[test]
    fn test_rejected_command_is_reported_by_index() {
        let mut commands = scripted_commands();
        commands.insert(1, ScoringCommand::StartNextInnings);

        let err = score_match(serde_json::from_value(request(commands)).unwrap()).unwrap_err();
        assert!(matches!(err, ApiError::CommandRejected { index: 1, name: "start_next_innings", .. }));
    }

    #[test]
    fn test_request_errors() {
        let mut value = request(Vec::new());
        value["schema_version"] = json!(2);
        let err = score_match_json(&value.to_string()).unwrap_err();
        assert_eq!(err, "Unsupported schema version: 2");

        let err = score_match_json("{").unwrap_err();
        assert!(err.starts_with("Invalid JSON request"));

        let mut value = request(Vec::new());
        value["roster"]["match_overs"] = json!(0);
        let err = score_match_json(&value.to_string()).unwrap_err();
        assert!(err.contains("Invalid match overs"));
    }

    #[test]
    fn test_out_of_range_config_is_rejected_before_scoring() {
        let mut value = request(vec![ScoringCommand::ball(crate::models::BallOutcome::wide(7))]);
        value["config"]["max_runs_per_ball"] = json!(u32::MAX);
        let err = score_match(serde_json::from_value(value).unwrap()).unwrap_err();
        assert!(matches!(err, ApiError::Config(ref msg) if msg.contains("max_runs_per_ball")));

        let mut value = request(Vec::new());
        value["config"]["max_wickets_cap"] = json!(14);
        assert!(matches!(
            score_match(serde_json::from_value(value).unwrap()),
            Err(ApiError::Config(_))
        ));
    }
}
