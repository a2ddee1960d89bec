use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::application::KanjiRepository;
use crate::domain::{DomainError, KanjiRecord};

/// Kanji reference data inside the data directory.
pub const KANJI_FILE_NAME: &str = "merged_kanji.json";

/// Kanji records read from a JSON object keyed by kanji.
///
/// The file is parsed on first access and kept for the life of the process.
/// A missing file yields an empty store.
pub struct JsonKanjiRepository {
    path: PathBuf,
    records: OnceCell<HashMap<String, KanjiRecord>>,
}

impl JsonKanjiRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: OnceCell::new(),
        }
    }

    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(KANJI_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn records(&self) -> Result<&HashMap<String, KanjiRecord>, DomainError> {
        self.records.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> Result<HashMap<String, KanjiRecord>, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Kanji data not found at {:?}; store is empty", self.path);
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records = parse_kanji_json(&content)?;
        info!("Loaded {} kanji from {:?}", records.len(), self.path);
        Ok(records)
    }
}

pub fn parse_kanji_json(content: &str) -> Result<HashMap<String, KanjiRecord>, DomainError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| DomainError::parse(format!("Invalid kanji JSON: {}", e)))?;

    let Value::Object(entries) = value else {
        warn!("Kanji JSON top level is not an object; store is empty");
        return Ok(HashMap::new());
    };

    Ok(entries
        .iter()
        .map(|(kanji, fields)| (kanji.clone(), KanjiRecord::from_json(kanji, fields)))
        .collect())
}

#[async_trait]
impl KanjiRepository for JsonKanjiRepository {
    async fn find(&self, kanji: &str) -> Result<Option<KanjiRecord>, DomainError> {
        Ok(self.records().await?.get(kanji).cloned())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.records().await?.len() as u64)
    }
}
