//! Plain-text scorecards.

use std::fmt::Write;

use cricket_core::models::{InningsSummary, MatchSummary, TossDecision, TossOutcome};
use cricket_core::MatchSnapshot;

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn innings(out: &mut String, summary: &MatchSummary, inn: &InningsSummary) {
    let _ = writeln!(
        out,
        "{} innings: {} ({} ov)",
        inn.batting_team,
        inn.score_line(),
        inn.overs
    );

    for line in &inn.batting {
        let f = &line.figures;
        let how = match (f.is_out, f.out_method) {
            (true, Some(method)) => match f.dismissed_by {
                Some(bowler) => format!("{} b {}", method.label(), summary.setup.player_name(bowler)),
                None => method.label().to_string(),
            },
            _ => "not out".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<20} {:<24} {:>4} ({:>3})  4s {:<2} 6s {:<2} SR {}",
            line.name,
            how,
            f.runs_scored,
            f.balls_faced,
            f.fours,
            f.sixes,
            rate(f.strike_rate())
        );
    }
    let e = &inn.extras;
    let _ = writeln!(
        out,
        "  Extras {} (w {}, nb {}, b {}, lb {})",
        e.total(),
        e.wides,
        e.no_balls,
        e.byes,
        e.leg_byes
    );
    if !inn.did_not_bat.is_empty() {
        let names: Vec<&str> =
            inn.did_not_bat.iter().map(|&id| summary.setup.player_name(id)).collect();
        let _ = writeln!(out, "  Did not bat: {}", names.join(", "));
    }
    if !inn.fall_of_wickets.is_empty() {
        let falls: Vec<String> = inn
            .fall_of_wickets
            .iter()
            .map(|fow| {
                format!(
                    "{}-{} ({}, {})",
                    fow.wicket,
                    fow.team_runs,
                    summary.setup.player_name(fow.player),
                    fow.at_over()
                )
            })
            .collect();
        let _ = writeln!(out, "  Fall of wickets: {}", falls.join(", "));
    }

    let _ = writeln!(out, "  {:<20} {:>5} {:>3} {:>4} {:>3}  Econ", "Bowling", "O", "M", "R", "W");
    for line in &inn.bowling {
        let f = &line.figures;
        let _ = writeln!(
            out,
            "  {:<20} {:>5} {:>3} {:>4} {:>3}  {}",
            line.name,
            f.overs().to_string(),
            f.maidens,
            f.runs_conceded,
            f.wickets_taken,
            rate(f.economy())
        );
    }
}

pub fn summary(summary: &MatchSummary) -> String {
    let setup = &summary.setup;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} v {} ({} overs), match {}",
        setup.home.team_name, setup.away.team_name, setup.match_overs, summary.match_id
    );
    let _ = writeln!(out, "{}", toss_line(summary));
    for inn in &summary.innings {
        out.push('\n');
        innings(&mut out, summary, inn);
    }
    out.push('\n');
    let _ = writeln!(out, "{}", summary.result_text);
    if let Some(player) = summary.man_of_the_match {
        let _ = writeln!(out, "Man of the match: {}", setup.player_name(player));
    }
    out
}

fn toss_line(summary: &MatchSummary) -> String {
    let setup = &summary.setup;
    format!(
        "{} won the toss and chose to {}",
        setup.team_name(setup.toss.winner),
        decision(setup.toss.decision)
    )
}

fn decision(decision: TossDecision) -> &'static str {
    match decision {
        TossDecision::Bat => "bat",
        TossDecision::Bowl => "bowl",
    }
}

pub fn toss(outcome: &TossOutcome) -> String {
    let coin = match (outcome.call, outcome.coin) {
        (Some(call), Some(coin)) => format!("called {call:?}, landed {coin:?}: "),
        _ => String::new(),
    };
    format!(
        "{coin}{} side wins the toss and will {}; {} side bats first",
        outcome.winner,
        decision(outcome.decision),
        outcome.first_batting()
    )
}

pub fn snapshot(snapshot: &MatchSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} v {}: {}", snapshot.home_team, snapshot.away_team, snapshot.status);
    if let Some(board) = &snapshot.scoreboard {
        for batter in [&board.striker, &board.non_striker].into_iter().flatten() {
            let f = &batter.figures;
            let _ = writeln!(out, "  {:<20} {:>4} ({:>3})", batter.name, f.runs_scored, f.balls_faced);
        }
        let f = &board.bowler.figures;
        let _ = writeln!(
            out,
            "  {:<20} {}-{}-{}-{}",
            board.bowler.name,
            f.overs(),
            f.maidens,
            f.runs_conceded,
            f.wickets_taken
        );
        let _ = writeln!(
            out,
            "  CRR {}  RRR {}",
            rate(board.current_run_rate),
            rate(board.required_run_rate)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_core::models::{CoinFace, TeamSide};

    #[test]
    fn test_toss_line() {
        let outcome = TossOutcome {
            winner: TeamSide::Away,
            decision: TossDecision::Bowl,
            call: Some(CoinFace::Heads),
            coin: Some(CoinFace::Tails),
        };
        assert_eq!(
            toss(&outcome),
            "called Heads, landed Tails: away side wins the toss and will bowl; home side bats first"
        );
    }
}
