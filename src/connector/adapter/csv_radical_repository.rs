use std::path::{Path, PathBuf};

use async_trait::async_trait;
use globset::Glob;
use tracing::{debug, info};

use crate::application::RadicalRepository;
use crate::domain::{DomainError, RadicalDocument};

/// Radical description snapshots: one file per generation run, names sort by
/// their timestamp suffix.
pub const RADICAL_SNAPSHOT_PATTERN: &str = "radicals_with_visual_form_*.csv";

const RADICAL_COLUMN: &str = "Radical";
const MEANING_COLUMN: &str = "Meaning";
const BOM: char = '\u{feff}';

/// Radical documents read from the newest CSV snapshot in a directory.
pub struct CsvRadicalRepository {
    data_dir: PathBuf,
}

impl CsvRadicalRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

/// Lexicographically last file in `dir` whose name matches
/// [`RADICAL_SNAPSHOT_PATTERN`].
pub fn latest_snapshot(dir: &Path) -> Option<PathBuf> {
    let matcher = Glob::new(RADICAL_SNAPSHOT_PATTERN).ok()?.compile_matcher();
    let entries = std::fs::read_dir(dir).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| path.file_name().is_some_and(|name| matcher.is_match(name)))
        .max()
}

/// One document per row, built from the `Radical` and `Meaning` columns.
pub fn read_radical_csv(path: &Path) -> Result<Vec<RadicalDocument>, DomainError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DomainError::parse(format!("Failed to open {:?}: {}", path, e)))?;

    let headers = reader
        .headers()
        .map_err(|e| DomainError::parse(format!("Failed to read CSV header: {}", e)))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches(BOM).trim() == name)
            .ok_or_else(|| {
                DomainError::parse(format!("Column '{}' missing in {:?}", name, path))
            })
    };
    let radical_idx = column(RADICAL_COLUMN)?;
    let meaning_idx = column(MEANING_COLUMN)?;

    let mut documents = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| DomainError::parse(format!("Malformed CSV row: {}", e)))?;
        documents.push(RadicalDocument::new(
            record.get(radical_idx).unwrap_or_default(),
            record.get(meaning_idx).unwrap_or_default(),
        ));
    }
    Ok(documents)
}

#[async_trait]
impl RadicalRepository for CsvRadicalRepository {
    async fn load_documents(&self) -> Result<Option<Vec<RadicalDocument>>, DomainError> {
        let Some(path) = self.snapshot_path() else {
            debug!("No radical snapshot in {:?}", self.data_dir);
            return Ok(None);
        };

        let documents = tokio::task::spawn_blocking({
            let path = path.clone();
            move || read_radical_csv(&path)
        })
        .await
        .map_err(|e| DomainError::internal(format!("CSV reader task failed: {}", e)))??;

        info!("Loaded {} radicals from {:?}", documents.len(), path);
        Ok(Some(documents))
    }

    fn snapshot_path(&self) -> Option<PathBuf> {
        latest_snapshot(&self.data_dir)
    }
}
