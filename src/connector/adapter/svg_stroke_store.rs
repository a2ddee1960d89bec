use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::StrokeDiagramRepository;
use crate::domain::DomainError;

/// KanjiVG diagrams inside the data directory.
pub const STROKE_DIR_NAME: &str = "Kanji_SVG";

/// Stroke-order SVG files read from one directory.
pub struct SvgStrokeStore {
    dir: PathBuf,
}

impl SvgStrokeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STROKE_DIR_NAME))
    }
}

/// Plain file names only; anything that could leave the directory is refused.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[async_trait]
impl StrokeDiagramRepository for SvgStrokeStore {
    async fn load_svg(&self, file_name: &str) -> Result<Option<String>, DomainError> {
        if !is_plain_file_name(file_name) {
            return Err(DomainError::invalid_input(format!(
                "Invalid stroke diagram name: {}",
                file_name
            )));
        }

        let path = self.dir.join(file_name);
        match tokio::fs::read_to_string(&path).await {
            Ok(svg) => Ok(Some(svg)),
            Err(e) => {
                debug!("Stroke diagram {:?} unavailable: {}", path, e);
                Ok(None)
            }
        }
    }
}
