use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::use_cases::{RetrieveRadicalsUseCase, DEFAULT_TOP_K};
use crate::application::{KanjiRepository, TextGenerator};
use crate::domain::{
    build_prompt, fallback_line, join_context, normalize_response, DegradeReason, DomainError,
    KanjiRecord, MnemonicOutcome, PLACEHOLDER_LHS,
};

/// Kanji-specific inputs shared by the prompt and the normalizer.
struct MnemonicSubject {
    kanji: String,
    lhs: String,
    meanings: String,
}

impl MnemonicSubject {
    fn from_record(record: &KanjiRecord) -> Self {
        let lhs = record.lhs();
        Self {
            kanji: record.kanji.clone(),
            lhs: if lhs.is_empty() {
                PLACEHOLDER_LHS.to_string()
            } else {
                lhs
            },
            meanings: record.meanings_text(),
        }
    }

    fn fallback(&self, reason: DegradeReason) -> MnemonicOutcome {
        MnemonicOutcome::Degraded {
            line: fallback_line(&self.kanji, &self.lhs, &self.meanings),
            reason,
        }
    }
}

/// Retrieval, prompting, generation and normalization for one kanji.
///
/// `execute` never fails: every absorbed problem turns into a degraded
/// outcome that still carries a well-formed line.
pub struct GenerateMnemonicUseCase {
    kanji_repo: Arc<dyn KanjiRepository>,
    retriever: Arc<RetrieveRadicalsUseCase>,
    generator: Option<Arc<dyn TextGenerator>>,
    top_k: usize,
}

impl GenerateMnemonicUseCase {
    pub fn new(
        kanji_repo: Arc<dyn KanjiRepository>,
        retriever: Arc<RetrieveRadicalsUseCase>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            kanji_repo,
            retriever,
            generator,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub async fn execute(&self, kanji: &str) -> MnemonicOutcome {
        let kanji = kanji.trim();

        let record = match self.kanji_repo.find(kanji).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("Kanji {} not found", kanji);
                return MnemonicOutcome::Degraded {
                    line: fallback_line(kanji, "", ""),
                    reason: DegradeReason::UnknownKanji,
                };
            }
            Err(e) => {
                warn!("Kanji store unavailable: {}", e);
                return MnemonicOutcome::Degraded {
                    line: fallback_line(kanji, "", ""),
                    reason: DegradeReason::KanjiStoreUnavailable,
                };
            }
        };

        self.execute_for_record(&record).await
    }

    /// Same as [`execute`](Self::execute) for a record the caller already holds.
    pub async fn execute_for_record(&self, record: &KanjiRecord) -> MnemonicOutcome {
        let subject = MnemonicSubject::from_record(record);

        let Some(generator) = &self.generator else {
            warn!("No text generator configured; using fallback line");
            return subject.fallback(DegradeReason::GeneratorUnavailable);
        };

        let prompt = self.prompt_for_record(record).await;

        let start_time = Instant::now();
        let raw = match generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) if e.is_unavailable() => {
                warn!("Generator {} unavailable: {}", generator.model_name(), e);
                return subject.fallback(DegradeReason::GeneratorUnavailable);
            }
            Err(e) => {
                warn!("Generation failed for {}: {}", subject.kanji, e);
                return subject.fallback(DegradeReason::GenerationFailed);
            }
        };
        debug!("Raw generator output for {}: {:?}", subject.kanji, raw);

        let line = normalize_response(&raw, &subject.kanji, &subject.lhs, &subject.meanings);
        info!(
            "Generated mnemonic for {} with {} in {:?}",
            subject.kanji,
            generator.model_name(),
            start_time.elapsed()
        );

        MnemonicOutcome::Generated(line)
    }

    /// The exact prompt that would be sent for `kanji`.
    pub async fn prompt(&self, kanji: &str) -> Result<String, DomainError> {
        let kanji = kanji.trim();
        let record = self
            .kanji_repo
            .find(kanji)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Kanji {} not found", kanji)))?;
        Ok(self.prompt_for_record(&record).await)
    }

    async fn prompt_for_record(&self, record: &KanjiRecord) -> String {
        let subject = MnemonicSubject::from_record(record);

        let context = match self.retriever.retrieve(&record.radicals, self.top_k).await {
            Ok(documents) => join_context(&documents),
            Err(e) => {
                warn!("Radical retrieval failed for {}: {}", subject.kanji, e);
                String::new()
            }
        };

        build_prompt(&subject.kanji, &subject.lhs, &subject.meanings, &context)
    }
}
