pub mod breakout;
pub mod chess;
pub mod mahjong;
pub mod merge;
pub mod minesweeper;
pub mod pong;
pub mod snake;
pub mod tetris;
pub mod tower_defense;
pub mod typing;

use crate::config::Settings;
use crate::engine::game_loop::{self, Outcome};
use crate::engine::Game;
use crate::error::{Error, Result};
use crate::scores::{AutoRecorder, ScoreStore};
use minesweeper::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![
        GameDescriptor {
            name: "snake",
            description: "Eat, grow, and don't bite yourself",
        },
        GameDescriptor {
            name: "tetris",
            description: "Falling blocks with a 7-bag, ghost piece and levels",
        },
        GameDescriptor {
            name: "2048",
            description: "Slide and merge tiles up to 2048",
        },
        GameDescriptor {
            name: "minesweeper",
            description: "Clear the field without touching a mine",
        },
        GameDescriptor {
            name: "breakout",
            description: "Bounce the ball through a wall of bricks",
        },
        GameDescriptor {
            name: "pong",
            description: "First to seven against the computer",
        },
        GameDescriptor {
            name: "tower-defense",
            description: "Build towers to hold off ten waves of creeps",
        },
        GameDescriptor {
            name: "mahjong",
            description: "Match free tile pairs until the stack is gone",
        },
        GameDescriptor {
            name: "chess",
            description: "Play white against a greedy engine",
        },
        GameDescriptor {
            name: "typing",
            description: "Type the falling words before they land",
        },
    ]
}

pub fn find(name: &str) -> Option<GameDescriptor>
{
    registry()
        .into_iter()
        .find(|game| game.name.eq_ignore_ascii_case(name.trim()))
}

/// Per-run overrides from the command line; unset fields fall back to the
/// settings file.
#[derive(Debug, Clone, Default)]
pub struct PlayOptions
{
    pub seed: Option<u64>,
    pub wpm: Option<f32>,
    pub difficulty: Option<Difficulty>,
    pub wrap: bool,
}

pub fn build(name: &str, seed: u64, options: &PlayOptions, settings: &Settings) -> Result<Box<dyn Game>>
{
    let game: Box<dyn Game> = match name {
        "snake" => Box::new(snake::Snake::new(
            seed,
            snake::SnakeOptions {
                wrap: options.wrap || settings.snake.wrap,
            },
        )),
        "tetris" => Box::new(tetris::Tetris::new(seed)),
        "2048" => Box::new(merge::Merge::new(seed)),
        "minesweeper" => Box::new(minesweeper::Minesweeper::new(
            seed,
            options.difficulty.unwrap_or(settings.minesweeper.difficulty),
        )),
        "breakout" => Box::new(breakout::Breakout::new()),
        "pong" => Box::new(pong::Pong::new()),
        "tower-defense" => Box::new(tower_defense::TowerDefense::new()),
        "mahjong" => Box::new(mahjong::Mahjong::new(seed)),
        "chess" => Box::new(chess::Chess::new(seed)),
        "typing" => {
            let wpm = options.wpm.unwrap_or(settings.typing.start_wpm);
            Box::new(typing::Typing::new(seed, typing::TypingConfig::new(wpm)))
        }
        other => return Err(Error::UnknownGame(other.to_string())),
    };
    Ok(game)
}

/// Plays one game in the terminal and records the result for the configured
/// player.
pub fn launch(name: &str, options: &PlayOptions, settings: &Settings) -> Result<Outcome>
{
    let descriptor = find(name).ok_or_else(|| Error::UnknownGame(name.to_string()))?;
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut game = build(descriptor.name, seed, options, settings)?;
    let recorder = AutoRecorder::new(ScoreStore::open(settings.scores_path()?), settings.player());
    tracing::info!(game = descriptor.name, seed, player = recorder.username(), "starting game");

    game_loop::run(game.as_mut(), |outcome| {
        finish_lines(&recorder, descriptor.name, outcome)
    })
}

fn finish_lines(recorder: &AutoRecorder, game: &str, outcome: &Outcome) -> Vec<String>
{
    match recorder.record(game, outcome) {
        Ok(recorded) => vec![AutoRecorder::describe(&recorded)],
        Err(err) => {
            tracing::warn!(%err, game, "could not save score");
            vec![format!("Could not save score: {err}")]
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::engine::{Input, Status};
    use std::collections::HashSet;
    use std::time::Duration;

    #[test]
    fn registry_names_are_unique()
    {
        let names: HashSet<_> = registry().iter().map(|game| game.name).collect();
        assert_eq!(names.len(), registry().len());
        assert_eq!(registry().len(), 10);
    }

    #[test]
    fn lookup_ignores_case()
    {
        assert_eq!(find("Chess").map(|game| game.name), Some("chess"));
        assert_eq!(find(" TOWER-DEFENSE ").map(|game| game.name), Some("tower-defense"));
        assert!(find("solitaire").is_none());
    }

    #[test]
    fn every_registered_game_builds_and_runs()
    {
        let settings = Settings::default();
        let options = PlayOptions::default();
        for descriptor in registry() {
            let mut game = build(descriptor.name, 42, &options, &settings).unwrap();
            assert_eq!(game.status(), Status::Running, "{}", descriptor.name);
            assert!(!game.render().is_empty());
            game.handle_input(Input::Action);
            if game.step_interval().is_some() {
                game.step();
            }
        }
    }

    #[test]
    fn unknown_name_is_an_error()
    {
        let err = build("solitaire", 1, &PlayOptions::default(), &Settings::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownGame(name) if name == "solitaire"));
    }

    #[test]
    fn seeded_builds_repeat()
    {
        let settings = Settings::default();
        let options = PlayOptions::default();
        let first = build("2048", 9, &options, &settings).unwrap().render();
        let second = build("2048", 9, &options, &settings).unwrap().render();
        assert_eq!(first, second);
    }

    #[test]
    fn typing_speed_comes_from_options_then_settings()
    {
        let mut settings = Settings::default();
        settings.typing.start_wpm = 40.0;
        let game = build("typing", 1, &PlayOptions::default(), &settings).unwrap();
        assert_eq!(game.step_interval(), Some(Duration::from_millis(33)));
        assert!(game.render()[0].contains("Start WPM:   40"));

        let options = PlayOptions {
            wpm: Some(60.0),
            ..PlayOptions::default()
        };
        let game = build("typing", 1, &options, &settings).unwrap();
        assert!(game.render()[0].contains("Start WPM:   60"));
    }
}
