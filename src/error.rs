use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error
{
    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),
    #[error("failed to access {path}: {source}")]
    Io
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("score file {path} is not valid JSON: {source}")]
    Json
    {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode scores: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("config file {path} is invalid: {source}")]
    Config
    {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    InvalidOption(String),
    #[error("unknown game '{0}', run `kb-arcade list` to see the games")]
    UnknownGame(String),
    #[error("could not determine a {0} directory, set it explicitly")]
    NoDirectory(&'static str),
}

impl Error
{
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self
    {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
