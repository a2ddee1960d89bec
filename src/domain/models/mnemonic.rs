use std::fmt;

use serde::{Deserialize, Serialize};

/// A finished `<kanji> = <lhs> → <rhs>` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnemonicLine(String);

impl MnemonicLine {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MnemonicLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A mnemonic produced by an earlier run and kept in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedMnemonic {
    pub mnemonic: String,
    pub reminder: String,
}

impl SavedMnemonic {
    pub fn has_mnemonic(&self) -> bool {
        !self.mnemonic.is_empty()
    }

    pub fn has_reminder(&self) -> bool {
        !self.reminder.is_empty()
    }
}

/// Why a request fell back to the templated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    UnknownKanji,
    KanjiStoreUnavailable,
    GeneratorUnavailable,
    GenerationFailed,
}

impl DegradeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradeReason::UnknownKanji => "unknown_kanji",
            DegradeReason::KanjiStoreUnavailable => "kanji_store_unavailable",
            DegradeReason::GeneratorUnavailable => "generator_unavailable",
            DegradeReason::GenerationFailed => "generation_failed",
        }
    }
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a mnemonic request. Both variants carry a well-formed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MnemonicOutcome {
    Generated(MnemonicLine),
    Degraded {
        line: MnemonicLine,
        reason: DegradeReason,
    },
}

impl MnemonicOutcome {
    pub fn line(&self) -> &MnemonicLine {
        match self {
            MnemonicOutcome::Generated(line) => line,
            MnemonicOutcome::Degraded { line, .. } => line,
        }
    }

    pub fn into_line(self) -> MnemonicLine {
        match self {
            MnemonicOutcome::Generated(line) => line,
            MnemonicOutcome::Degraded { line, .. } => line,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, MnemonicOutcome::Degraded { .. })
    }

    pub fn degrade_reason(&self) -> Option<DegradeReason> {
        match self {
            MnemonicOutcome::Generated(_) => None,
            MnemonicOutcome::Degraded { reason, .. } => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_mnemonic_flags_empty_fields() {
        let blank = SavedMnemonic::default();
        assert!(!blank.has_mnemonic());
        assert!(!blank.has_reminder());

        let saved = SavedMnemonic {
            mnemonic: "買 = Net + Shell → Buying with shells.".to_string(),
            reminder: String::new(),
        };
        assert!(saved.has_mnemonic());
        assert!(!saved.has_reminder());
    }

    #[test]
    fn outcome_exposes_line_in_both_variants() {
        let generated = MnemonicOutcome::Generated(MnemonicLine::new("a = b → c."));
        let degraded = MnemonicOutcome::Degraded {
            line: MnemonicLine::new("a = b → d."),
            reason: DegradeReason::GenerationFailed,
        };

        assert_eq!(generated.line().as_str(), "a = b → c.");
        assert!(!generated.is_degraded());
        assert_eq!(degraded.degrade_reason(), Some(DegradeReason::GenerationFailed));
        assert_eq!(degraded.into_line().into_string(), "a = b → d.");
    }
}
