use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::application::MnemonicArchive;
use crate::domain::{DomainError, SavedMnemonic};

pub const ARCHIVE_FILE_NAME: &str = "generated_mnemonics_v3.jsonl";

#[derive(Deserialize)]
struct ArchiveEntry {
    #[serde(default)]
    kanji: Option<String>,
    #[serde(default)]
    mnemonic: Option<String>,
    #[serde(default)]
    reminder: Option<String>,
}

/// Read-only view over a JSONL file of earlier generation results.
pub struct JsonlMnemonicArchive {
    path: PathBuf,
    entries: OnceCell<HashMap<String, SavedMnemonic>>,
}

impl JsonlMnemonicArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceCell::new(),
        }
    }

    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(ARCHIVE_FILE_NAME))
    }

    async fn entries(&self) -> Result<&HashMap<String, SavedMnemonic>, DomainError> {
        self.entries
            .get_or_try_init(|| async {
                match tokio::fs::read_to_string(&self.path).await {
                    Ok(content) => {
                        let entries = parse_archive(&content);
                        info!("Loaded {} saved mnemonics from {:?}", entries.len(), self.path);
                        Ok(entries)
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        debug!("No mnemonic archive at {:?}", self.path);
                        Ok(HashMap::new())
                    }
                    Err(e) => Err(DomainError::from(e)),
                }
            })
            .await
    }
}

/// Later lines override earlier ones for the same kanji.
pub fn parse_archive(content: &str) -> HashMap<String, SavedMnemonic> {
    let mut entries = HashMap::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Ok(entry) = serde_json::from_str::<ArchiveEntry>(line) else {
            debug!("Skipping malformed archive line");
            continue;
        };
        let kanji = entry.kanji.as_deref().map(str::trim).unwrap_or_default();
        if kanji.is_empty() {
            continue;
        }
        entries.insert(
            kanji.to_string(),
            SavedMnemonic {
                mnemonic: trimmed(entry.mnemonic),
                reminder: trimmed(entry.reminder),
            },
        );
    }
    entries
}

fn trimmed(value: Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

#[async_trait]
impl MnemonicArchive for JsonlMnemonicArchive {
    async fn find(&self, kanji: &str) -> Result<Option<SavedMnemonic>, DomainError> {
        Ok(self.entries().await?.get(kanji).cloned())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.entries().await?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_entry_wins_and_bad_lines_are_skipped() {
        let content = concat!(
            r#"{"kanji": "買", "mnemonic": "old", "reminder": "r1"}"#,
            "\n\nnot json\n",
            r#"{"mnemonic": "orphan"}"#,
            "\n",
            r#"{"kanji": "買", "mnemonic": "new"}"#,
            "\n"
        );

        let entries = parse_archive(content);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries["買"].mnemonic, "new");
        assert!(!entries["買"].has_reminder());
    }

    #[test]
    fn null_fields_and_padding_are_tolerated() {
        let content = concat!(
            r#"{"kanji": " 買 ", "mnemonic": "  Shells buy things.  ", "reminder": null}"#,
            "\n",
            r#"{"kanji": null, "mnemonic": "orphan"}"#,
            "\n",
            r#"{"kanji": "木", "mnemonic": null, "reminder": " A tree. "}"#,
            "\n"
        );

        let entries = parse_archive(content);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries["買"].mnemonic, "Shells buy things.");
        assert_eq!(entries["買"].reminder, "");
        assert_eq!(entries["木"].mnemonic, "");
        assert_eq!(entries["木"].reminder, "A tree.");
    }

    #[tokio::test]
    async fn reads_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ARCHIVE_FILE_NAME);
        std::fs::write(&path, r#"{"kanji": "木", "mnemonic": "m", "reminder": "r"}"#).unwrap();

        let archive = JsonlMnemonicArchive::in_data_dir(dir.path());
        assert_eq!(archive.count().await.unwrap(), 1);

        std::fs::remove_file(&path).unwrap();
        let saved = archive.find("木").await.unwrap().unwrap();
        assert_eq!(saved.reminder, "r");
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let archive = JsonlMnemonicArchive::in_data_dir(dir.path());
        assert_eq!(archive.count().await.unwrap(), 0);
    }
}
