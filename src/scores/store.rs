use super::ScoreRecord;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ScoreFile
{
    version: u32,
    #[serde(default)]
    records: Vec<ScoreRecord>,
}

/// JSON file holding every recorded score.
#[derive(Debug, Clone)]
pub struct ScoreStore
{
    path: PathBuf,
}

impl ScoreStore
{
    pub fn open(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    /// A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<ScoreRecord>>
    {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Error::io(&self.path, err)),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: ScoreFile = serde_json::from_str(&contents).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(file.records)
    }

    pub fn append(&self, record: ScoreRecord) -> Result<Vec<ScoreRecord>>
    {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)?;
        Ok(records)
    }

    /// Writes to a sibling temp file and renames it over the store.
    pub fn save(&self, records: &[ScoreRecord]) -> Result<()>
    {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;
        }
        let file = ScoreFile {
            version: FORMAT_VERSION,
            records: records.to_vec(),
        };
        let contents = serde_json::to_string_pretty(&file).map_err(Error::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|err| Error::io(&tmp, err))?;
        std::fs::rename(&tmp, &self.path).map_err(|err| Error::io(&self.path, err))?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "saved scores");
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, score: u32) -> ScoreRecord
    {
        ScoreRecord {
            username: name.to_string(),
            score,
            game: "snake".to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn missing_file_is_empty()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::open(dir.path().join("scores.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_creates_directories_and_persists()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::open(dir.path().join("nested/data/scores.json"));
        store.append(record("ada", 40)).unwrap();
        let records = store.append(record("bob", 70)).unwrap();
        assert_eq!(records.len(), 2);

        let reopened = ScoreStore::open(&store.path);
        let loaded = reopened.load().unwrap();
        assert_eq!(loaded, records);
        assert!(!store.path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_reported()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ScoreStore::open(&path).load().unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn file_format_is_versioned()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::open(dir.path().join("scores.json"));
        store.save(&[record("ada", 1)]).unwrap();
        let raw = std::fs::read_to_string(&store.path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["records"][0]["username"], "ada");
        assert_eq!(value["records"][0]["game"], "snake");
    }
}
