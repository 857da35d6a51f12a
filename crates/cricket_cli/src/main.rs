//! Cricket scorer CLI
//!
//! Scores a JSON request (setup, toss and command log), settles a coin toss,
//! or prints an archived match.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cricket_core::engine::resolve_toss;
use cricket_core::models::{CoinFace, TeamSide, TossDecision, TossInput};
use cricket_core::save::{load_from_path, MatchRecord};
use cricket_core::{score_match, FileSummarySink, ScoreRequest, SummarySink};

mod render;

#[derive(Parser)]
#[command(name = "cricket")]
#[command(about = "Score cricket matches from a command log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scoring request and print the scorecard
    Score {
        /// Request JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Write the response JSON here
        #[arg(long)]
        out: Option<PathBuf>,

        /// Archive a finished match into this directory
        #[arg(long)]
        archive: Option<PathBuf>,
    },

    /// Settle a coin toss
    Toss {
        #[arg(long, value_enum)]
        calling_side: Side,

        #[arg(long, value_enum)]
        call: Coin,

        /// What the toss winner chooses
        #[arg(long, value_enum, default_value = "bat")]
        decision: Decision,

        /// Fix the coin for reproducible tosses
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print an archived match
    Inspect {
        /// Archive file (.cmr)
        path: PathBuf,

        /// Print the full summary JSON instead of the scorecard
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Home,
    Away,
}

#[derive(Clone, Copy, ValueEnum)]
enum Coin {
    Heads,
    Tails,
}

#[derive(Clone, Copy, ValueEnum)]
enum Decision {
    Bat,
    Bowl,
}

impl From<Side> for TeamSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Home => TeamSide::Home,
            Side::Away => TeamSide::Away,
        }
    }
}

impl From<Coin> for CoinFace {
    fn from(coin: Coin) -> Self {
        match coin {
            Coin::Heads => CoinFace::Heads,
            Coin::Tails => CoinFace::Tails,
        }
    }
}

impl From<Decision> for TossDecision {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Bat => TossDecision::Bat,
            Decision::Bowl => TossDecision::Bowl,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score { r#in, out, archive } => score(r#in, out, archive)?,
        Commands::Toss { calling_side, call, decision, seed } => {
            let input = TossInput::Random {
                calling_side: calling_side.into(),
                call: call.into(),
                winner_decision: decision.into(),
                result: None,
            };
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            let outcome = resolve_toss(&input, &mut rng);
            println!("{}", render::toss(&outcome));
        }
        Commands::Inspect { path, json } => {
            let record = load_from_path(&path)
                .with_context(|| format!("Failed to load archive {}", path.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record.summary)?);
            } else {
                println!("{}", render::summary(&record.summary));
            }
        }
    }

    Ok(())
}

fn score(input: PathBuf, out: Option<PathBuf>, archive: Option<PathBuf>) -> Result<()> {
    let content = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read request {}", input.display()))?;
    let request: ScoreRequest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid request JSON in {}", input.display()))?;

    tracing::info!(commands = request.commands.len(), "Scoring {}", input.display());
    let response = score_match(request)?;

    match &response.summary {
        Some(summary) => println!("{}", render::summary(summary)),
        None => println!("{}", render::snapshot(&response.snapshot)),
    }

    if let Some(out) = out {
        fs::write(&out, serde_json::to_string_pretty(&response)?)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        tracing::info!("Response written to {}", out.display());
    }

    if let Some(dir) = archive {
        let Some(summary) = response.summary else {
            bail!("Match is not finished ({}); nothing to archive", response.snapshot.status);
        };
        let sink = FileSummarySink::new(dir);
        let record = MatchRecord::new(summary);
        sink.store_summary(&record)?;
        println!("Archived to {}", sink.archive_path(record.match_id).display());
    }

    Ok(())
}
