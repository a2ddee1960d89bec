use async_trait::async_trait;

use crate::domain::{DomainError, SavedMnemonic};

/// Previously generated mnemonics, keyed by kanji.
#[async_trait]
pub trait MnemonicArchive: Send + Sync {
    async fn find(&self, kanji: &str) -> Result<Option<SavedMnemonic>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
