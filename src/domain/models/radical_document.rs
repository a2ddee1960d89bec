use serde::{Deserialize, Serialize};

/// Short visual description of one radical, embedded into the similarity index.
///
/// The text is ASCII-only: every run of non-ASCII characters in the source
/// fields is replaced by a single space before the document is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadicalDocument {
    radical: String,
    meaning: String,
    text: String,
}

impl RadicalDocument {
    pub fn new(radical: &str, meaning: &str) -> Self {
        let radical = to_ascii(radical);
        let meaning = to_ascii(meaning);
        let text = format!("Radical: {}\nMeaning: {}", radical, meaning);
        Self {
            radical,
            meaning,
            text,
        }
    }

    pub fn radical(&self) -> &str {
        &self.radical
    }

    pub fn meaning(&self) -> &str {
        &self.meaning
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Replace each run of non-ASCII characters with one space, then trim.
pub fn to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push(' ');
            in_run = true;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_text_has_fixed_shape() {
        let doc = RadicalDocument::new("Net", "catching things");
        assert_eq!(doc.text(), "Radical: Net\nMeaning: catching things");
    }

    #[test]
    fn non_ascii_runs_become_single_spaces() {
        assert_eq!(to_ascii("木 tree"), "tree");
        assert_eq!(to_ascii("a火水b"), "a b");
        assert_eq!(to_ascii("一"), "");
    }

    #[test]
    fn document_is_ascii_only() {
        let doc = RadicalDocument::new("亻 Person", "人 leaning person");
        assert!(doc.text().is_ascii());
        assert_eq!(doc.radical(), "Person");
        assert_eq!(doc.meaning(), "leaning person");
    }
}
