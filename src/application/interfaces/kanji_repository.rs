use async_trait::async_trait;

use crate::domain::{DomainError, KanjiRecord};

/// Read-only access to kanji reference data.
#[async_trait]
pub trait KanjiRepository: Send + Sync {
    async fn find(&self, kanji: &str) -> Result<Option<KanjiRecord>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
