use crate::error::{Error, Result};
use crate::games::minesweeper::Difficulty;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "kb-arcade";
const CONFIG_FILE: &str = "config.toml";
const SCORES_FILE: &str = "scores.json";
const DEFAULT_PLAYER: &str = "player";
const DEFAULT_LEADERBOARD_SIZE: usize = 10;

pub const PLAYER_ENV: &str = "KB_ARCADE_PLAYER";
pub const DATA_DIR_ENV: &str = "KB_ARCADE_DATA_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings
{
    pub player: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub leaderboard_size: Option<usize>,
    pub typing: TypingSettings,
    pub snake: SnakeSettings,
    pub minesweeper: MinesweeperSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingSettings
{
    pub start_wpm: f32,
}

impl Default for TypingSettings
{
    fn default() -> Self
    {
        Self { start_wpm: 20.0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings
{
    pub wrap: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MinesweeperSettings
{
    pub difficulty: Difficulty,
}

impl Settings
{
    /// `~/.config/kb-arcade/config.toml` on Linux.
    pub fn default_path() -> Result<PathBuf>
    {
        let dir = dirs::config_dir().ok_or(Error::NoDirectory("config"))?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the given file, or the default one. A missing default file yields
    /// default settings; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self>
    {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self>
    {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self>
    {
        toml::from_str(contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>)
    {
        if let Some(player) = lookup(PLAYER_ENV).filter(|value| !value.trim().is_empty()) {
            self.player = Some(player);
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn player(&self) -> String
    {
        self.player
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PLAYER)
            .to_string()
    }

    pub fn leaderboard_size(&self) -> usize
    {
        self.leaderboard_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
    }

    pub fn data_dir(&self) -> Result<PathBuf>
    {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .ok_or(Error::NoDirectory("data"))?
                .join(APP_DIR)),
        }
    }

    pub fn scores_path(&self) -> Result<PathBuf>
    {
        Ok(self.data_dir()?.join(SCORES_FILE))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn parses_partial_file_with_defaults()
    {
        let settings = Settings::parse(
            "player = \"ada\"\n[typing]\nstart_wpm = 35.0\n",
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(settings.player(), "ada");
        assert_eq!(settings.typing.start_wpm, 35.0);
        assert!(!settings.snake.wrap);
        assert_eq!(settings.minesweeper.difficulty, Difficulty::Beginner);
        assert_eq!(settings.leaderboard_size(), 10);
    }

    #[test]
    fn parses_difficulty_names()
    {
        let settings = Settings::parse(
            "[minesweeper]\ndifficulty = \"expert\"\n",
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(settings.minesweeper.difficulty, Difficulty::Expert);
    }

    #[test]
    fn invalid_toml_reports_path()
    {
        let err = Settings::parse("player = ", Path::new("/tmp/arcade.toml")).unwrap_err();
        assert!(err.to_string().contains("/tmp/arcade.toml"));
    }

    #[test]
    fn environment_overrides_file_values()
    {
        let mut settings = Settings {
            player: Some("file".into()),
            ..Settings::default()
        };
        settings.apply_env(|key| match key {
            PLAYER_ENV => Some("env".into()),
            DATA_DIR_ENV => Some("/srv/arcade".into()),
            _ => None,
        });
        assert_eq!(settings.player(), "env");
        assert_eq!(settings.data_dir().unwrap(), PathBuf::from("/srv/arcade"));
        assert_eq!(
            settings.scores_path().unwrap(),
            PathBuf::from("/srv/arcade/scores.json")
        );
    }

    #[test]
    fn blank_player_falls_back_to_default()
    {
        let settings = Settings {
            player: Some("   ".into()),
            ..Settings::default()
        };
        assert_eq!(settings.player(), "player");
    }

    #[test]
    fn loads_explicit_file()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "leaderboard_size = 3\n").unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.leaderboard_size(), 3);
    }

    #[test]
    fn missing_explicit_file_is_an_error()
    {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
