mod recorder;
mod store;

pub use recorder::AutoRecorder;
pub use store::ScoreStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord
{
    pub username: String,
    pub score: u32,
    pub game: String,
    pub date: DateTime<Utc>,
}

/// Best scores first; equal scores keep the earlier date ahead.
pub fn leaderboard<'a>(
    records: &'a [ScoreRecord],
    game: Option<&str>,
    limit: usize,
) -> Vec<&'a ScoreRecord>
{
    let mut ranked: Vec<&ScoreRecord> = records
        .iter()
        .filter(|record| game.is_none_or(|name| record.game.eq_ignore_ascii_case(name)))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.date.cmp(&b.date)));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats
{
    pub plays: u32,
    pub best: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile
{
    pub username: String,
    pub games_played: u32,
    pub total_score: u64,
    pub per_game: BTreeMap<String, GameStats>,
    pub last_played: Option<DateTime<Utc>>,
}

impl Profile
{
    pub fn build(records: &[ScoreRecord], username: &str) -> Self
    {
        let mut profile = Profile {
            username: username.to_string(),
            games_played: 0,
            total_score: 0,
            per_game: BTreeMap::new(),
            last_played: None,
        };
        for record in records.iter().filter(|record| record.username == username) {
            profile.games_played += 1;
            profile.total_score += u64::from(record.score);
            let stats = profile
                .per_game
                .entry(record.game.clone())
                .or_insert(GameStats { plays: 0, best: 0 });
            stats.plays += 1;
            stats.best = stats.best.max(record.score);
            if profile.last_played.is_none_or(|last| record.date > last) {
                profile.last_played = Some(record.date);
            }
        }
        profile
    }

    pub fn render(&self) -> Vec<String>
    {
        let mut lines = vec![format!("Profile: {}", self.username)];
        if self.games_played == 0 {
            lines.push("No games recorded yet.".to_string());
            return lines;
        }
        lines.push(format!("Games played: {}", self.games_played));
        lines.push(format!("Total score: {}", self.total_score));
        if let Some(last) = self.last_played {
            lines.push(format!("Last played: {}", last.format("%Y-%m-%d %H:%M")));
        }
        lines.push(String::new());
        lines.push(format!("  {:<14} {:>6} {:>8}", "game", "plays", "best"));
        for (game, stats) in &self.per_game {
            lines.push(format!("  {:<14} {:>6} {:>8}", game, stats.plays, stats.best));
        }
        lines
    }
}

pub fn render_leaderboard(ranked: &[&ScoreRecord], game: Option<&str>) -> Vec<String>
{
    let mut lines = vec![match game {
        Some(name) => format!("Leaderboard - {name}"),
        None => "Leaderboard - all games".to_string(),
    }];
    if ranked.is_empty() {
        lines.push("No scores yet.".to_string());
        return lines;
    }
    lines.push(format!(
        "  {:>3}  {:<16} {:<14} {:>8}  {}",
        "#", "player", "game", "score", "date"
    ));
    for (idx, record) in ranked.iter().enumerate() {
        lines.push(format!(
            "  {:>3}  {:<16} {:<14} {:>8}  {}",
            idx + 1,
            record.username,
            record.game,
            record.score,
            record.date.format("%Y-%m-%d")
        ));
    }
    lines
}

#[cfg(test)]
mod tests
{
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str, game: &str, score: u32, day: u32) -> ScoreRecord
    {
        ScoreRecord {
            username: name.to_string(),
            score,
            game: game.to_string(),
            date: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<ScoreRecord>
    {
        vec![
            record("ada", "snake", 50, 1),
            record("bob", "snake", 90, 2),
            record("ada", "tetris", 400, 3),
            record("cy", "snake", 90, 1),
            record("ada", "snake", 70, 4),
        ]
    }

    #[test]
    fn leaderboard_sorts_and_breaks_ties_by_date()
    {
        let records = sample();
        let ranked = leaderboard(&records, Some("snake"), 10);
        let names: Vec<_> = ranked.iter().map(|r| (r.username.as_str(), r.score)).collect();
        assert_eq!(
            names,
            vec![("cy", 90), ("bob", 90), ("ada", 70), ("ada", 50)]
        );
    }

    #[test]
    fn leaderboard_limit_and_all_games()
    {
        let records = sample();
        let ranked = leaderboard(&records, None, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].game, "tetris");
        assert!(leaderboard(&records, Some("chess"), 5).is_empty());
        assert_eq!(leaderboard(&records, Some("SNAKE"), 5).len(), 4);
    }

    #[test]
    fn profile_aggregates_per_game()
    {
        let profile = Profile::build(&sample(), "ada");
        assert_eq!(profile.games_played, 3);
        assert_eq!(profile.total_score, 520);
        assert_eq!(profile.per_game["snake"], GameStats { plays: 2, best: 70 });
        assert_eq!(profile.per_game["tetris"], GameStats { plays: 1, best: 400 });
        assert_eq!(
            profile.last_played,
            Some(Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap())
        );
        assert!(profile.render().iter().any(|line| line.contains("tetris")));
    }

    #[test]
    fn empty_profile_renders_placeholder()
    {
        let profile = Profile::build(&sample(), "nobody");
        assert_eq!(profile.games_played, 0);
        assert_eq!(profile.render()[1], "No games recorded yet.");
    }

    #[test]
    fn leaderboard_rendering_numbers_rows()
    {
        let records = sample();
        let ranked = leaderboard(&records, Some("tetris"), 10);
        let lines = render_leaderboard(&ranked, Some("tetris"));
        assert_eq!(lines[0], "Leaderboard - tetris");
        assert!(lines[2].contains("ada"));
        assert!(lines[2].contains("400"));
        assert!(lines[2].contains("2026-03-03"));
    }
}
