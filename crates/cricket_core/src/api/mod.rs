pub mod json_api;

mod config_env;

pub use json_api::{score_match, score_match_json, ApiError, ScoreRequest, ScoreResponse};
