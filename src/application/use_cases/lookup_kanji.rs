use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::application::{KanjiRepository, MnemonicArchive, StrokeDiagramRepository};
use crate::domain::{
    inject_stroke_style, sanitize_svg, DomainError, KanjiRecord, SavedMnemonic, StrokeStyle,
};

/// Everything known about one kanji, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct KanjiDetails {
    pub record: KanjiRecord,
    pub saved_mnemonic: Option<SavedMnemonic>,
    /// Sanitized, restyled stroke-order diagram.
    pub stroke_svg: Option<String>,
}

pub struct LookupKanjiUseCase {
    kanji_repo: Arc<dyn KanjiRepository>,
    archive: Option<Arc<dyn MnemonicArchive>>,
    strokes: Option<Arc<dyn StrokeDiagramRepository>>,
    style: StrokeStyle,
}

impl LookupKanjiUseCase {
    pub fn new(kanji_repo: Arc<dyn KanjiRepository>) -> Self {
        Self {
            kanji_repo,
            archive: None,
            strokes: None,
            style: StrokeStyle::default(),
        }
    }

    pub fn with_archive(mut self, archive: Arc<dyn MnemonicArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn with_strokes(mut self, strokes: Arc<dyn StrokeDiagramRepository>) -> Self {
        self.strokes = Some(strokes);
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub async fn execute(&self, kanji: &str) -> Result<KanjiDetails, DomainError> {
        let kanji = kanji.trim();
        if kanji.chars().count() != 1 {
            return Err(DomainError::invalid_input(format!(
                "Expected a single kanji, got '{}'",
                kanji
            )));
        }

        let record = self
            .kanji_repo
            .find(kanji)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Kanji {} not found", kanji)))?;

        let saved_mnemonic = self.saved_mnemonic(kanji).await;
        let stroke_svg = self.stroke_svg(&record).await;

        Ok(KanjiDetails {
            record,
            saved_mnemonic,
            stroke_svg,
        })
    }

    async fn saved_mnemonic(&self, kanji: &str) -> Option<SavedMnemonic> {
        let archive = self.archive.as_ref()?;
        match archive.find(kanji).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Failed to read saved mnemonic for {}: {}", kanji, e);
                None
            }
        }
    }

    async fn stroke_svg(&self, record: &KanjiRecord) -> Option<String> {
        let strokes = self.strokes.as_ref()?;
        let file_name = record.stroke_svg.as_deref()?;
        match strokes.load_svg(file_name).await {
            Ok(svg) => svg.map(|raw| inject_stroke_style(&sanitize_svg(&raw), &self.style)),
            Err(e) => {
                warn!("Failed to read stroke diagram {}: {}", file_name, e);
                None
            }
        }
    }
}
