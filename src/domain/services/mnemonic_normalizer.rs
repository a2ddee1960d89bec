//! Turns free-form generator output into a strict one-line mnemonic.
//!
//! The stages below run in a fixed order and each one is a pure string
//! transform. Order matters: CJK stripping must happen before the sentence
//! split, and the leading-repetition passes expect an already trimmed sentence.
//!
//! ```text
//! raw text
//!   └─ collapse_whitespace
//!        └─ extract_arrow_line ──(no match)──▶ synthesized line
//!             └─ split_at_arrow ─▶ left │ right
//!                                       ├─ strip_cjk
//!                                       ├─ first_sentence (≤ 120 chars)
//!                                       ├─ strip_leading_equals
//!                                       ├─ strip_leading_repetition(lhs)
//!                                       ├─ strip_leading_repetition(meanings)
//!                                       ├─ regenerate when empty
//!                                       └─ ensure_terminal_punctuation
//! ```

use regex::{Regex, RegexBuilder};

use crate::domain::MnemonicLine;

/// Arrow token separating the parts from the explanation.
pub const ARROW: char = '→';

/// Upper bound on the explanation, ellipsis included.
pub const MAX_EXPLANATION_CHARS: usize = 120;

const ELLIPSIS: char = '…';
const TERMINAL_PUNCTUATION: [char; 4] = ['.', '!', '?', ELLIPSIS];
const TRUNCATION_TRIM: [char; 4] = [' ', ',', ';', ':'];
/// Stand-in left-hand side when a record has neither radicals nor meanings.
pub const PLACEHOLDER_LHS: &str = "—";

/// Full pipeline over raw generator text.
pub fn normalize_response(raw: &str, kanji: &str, lhs: &str, meanings: &str) -> MnemonicLine {
    let text = collapse_whitespace(raw);
    let line = extract_arrow_line(&text, kanji)
        .unwrap_or_else(|| synthesized_line(kanji, lhs, meanings));
    MnemonicLine::new(normalize_line(&line, lhs, meanings))
}

/// Sanitize an arrow-style line. Lines without an arrow are returned unchanged.
///
/// Feeding an already normalized line back through this function yields the
/// same line.
pub fn normalize_line(line: &str, lhs: &str, meanings: &str) -> String {
    let Some((left, right)) = split_at_arrow(line) else {
        return line.to_string();
    };

    let right = strip_cjk(right);
    let right = first_sentence(&right, MAX_EXPLANATION_CHARS);
    let right = strip_leading_equals(&right);
    let right = strip_leading_repetition(right, lhs);
    let right = strip_leading_repetition(right, meanings);
    let right = right.trim();

    let right = if right.is_empty() {
        first_sentence(
            &format!("Represents {}.", meanings.to_lowercase()),
            MAX_EXPLANATION_CHARS,
        )
    } else {
        right.to_string()
    };
    let right = ensure_terminal_punctuation(&right, MAX_EXPLANATION_CHARS);

    format!("{} {} {}", left.trim(), ARROW, right)
}

/// Degraded line used whenever generation or normalization cannot run.
/// Performs no I/O and cannot fail.
pub fn fallback_line(kanji: &str, lhs: &str, meanings: &str) -> MnemonicLine {
    let shown_lhs = if !lhs.is_empty() {
        lhs
    } else if !meanings.is_empty() {
        meanings
    } else {
        PLACEHOLDER_LHS
    };
    let lowered = meanings.to_lowercase();
    let subject = if lowered.is_empty() { "meaning" } else { lowered.as_str() };

    MnemonicLine::new(format!(
        "{} = {} {} Represents {} through its parts.",
        kanji, shown_lhs, ARROW, subject
    ))
}

fn synthesized_line(kanji: &str, lhs: &str, meanings: &str) -> String {
    format!(
        "{} = {} {} Represents {} through its parts.",
        kanji,
        lhs,
        ARROW,
        meanings.to_lowercase()
    )
}

/// Replace `|` with spaces, then collapse whitespace runs to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.replace('|', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `<kanji> = … → …` span in `text`, running to the end of the text.
pub fn extract_arrow_line(text: &str, kanji: &str) -> Option<String> {
    let pattern = format!(r"{}\s*=\s*.*?{}.*", regex::escape(kanji), ARROW);
    let re = Regex::new(&pattern).ok()?;
    re.find(text).map(|m| m.as_str().trim().to_string())
}

/// Split at the first arrow only.
pub fn split_at_arrow(line: &str) -> Option<(&str, &str)> {
    line.split_once(ARROW)
}

/// Hiragana, Katakana, CJK Extension A, CJK Unified and CJK Compatibility.
pub fn is_cjk(c: char) -> bool {
    matches!(
        c,
        '\u{3040}'..='\u{30FF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
    )
}

pub fn strip_cjk(text: &str) -> String {
    text.chars().filter(|c| !is_cjk(*c)).collect()
}

/// Reduce `text` to its first sentence and cap it at `max_chars`.
///
/// Tag-like `<…>` fragments and anything after a further arrow are dropped.
/// When the sentence is too long it is cut, trailing separators are trimmed
/// and an ellipsis is appended; the result never exceeds `max_chars`.
pub fn first_sentence(text: &str, max_chars: usize) -> String {
    let stripped = strip_tags(text.trim());
    let before_arrow = stripped.split(ARROW).next().unwrap_or_default();
    let one = collapse_runs(up_to_first_sentence_end(before_arrow));

    if one.chars().count() > max_chars {
        truncate_with_ellipsis(&one, max_chars)
    } else {
        one
    }
}

/// Drop every `<…>` fragment that has a closing bracket.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Text up to and including the first `.`, `!` or `?` that is followed by
/// whitespace.
fn up_to_first_sentence_end(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let ends_sentence = matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace());
        if ends_sentence {
            return &text[..i + c.len_utf8()];
        }
    }
    text
}

fn collapse_runs(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    let mut out = kept.trim_end_matches(TRUNCATION_TRIM).to_string();
    out.push(ELLIPSIS);
    out
}

pub fn strip_leading_equals(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '=' || c.is_whitespace())
}

/// Remove any leading repetitions of `phrase` (case-insensitive, each
/// optionally followed by a colon).
pub fn strip_leading_repetition<'a>(text: &'a str, phrase: &str) -> &'a str {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return text;
    }
    let pattern = format!(r"^(?:{}\b\s*:?\s*)+", regex::escape(phrase));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => match re.find(text) {
            Some(m) => &text[m.end()..],
            None => text,
        },
        Err(_) => text,
    }
}

/// Make sure the explanation ends in `. ! ? …` without growing past `max_chars`.
pub fn ensure_terminal_punctuation(text: &str, max_chars: usize) -> String {
    match text.chars().last() {
        None => text.to_string(),
        Some(c) if TERMINAL_PUNCTUATION.contains(&c) => text.to_string(),
        Some(_) if text.chars().count() < max_chars => format!("{}.", text),
        Some(_) => truncate_with_ellipsis(text, max_chars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KANJI: &str = "買";
    const LHS: &str = "Net + Shell";
    const MEANINGS: &str = "buy, purchase";

    fn normalize(raw: &str) -> String {
        normalize_response(raw, KANJI, LHS, MEANINGS).into_string()
    }

    #[test]
    fn collapse_whitespace_replaces_bars_and_runs() {
        assert_eq!(collapse_whitespace("  a |b\n\n c\t| "), "a b c");
    }

    #[test]
    fn extract_takes_first_match_to_end() {
        let text = "Sure! 買 = Net + Shell → Nets catch shells. Extra words";
        assert_eq!(
            extract_arrow_line(text, KANJI).as_deref(),
            Some("買 = Net + Shell → Nets catch shells. Extra words")
        );
    }

    #[test]
    fn extract_requires_equals_and_arrow() {
        assert!(extract_arrow_line("買 Net + Shell → x", KANJI).is_none());
        assert!(extract_arrow_line("買 = Net + Shell: x", KANJI).is_none());
        assert!(extract_arrow_line("no kanji = here → x", KANJI).is_none());
    }

    #[test]
    fn extract_escapes_regex_metacharacters() {
        let text = "a+ = b → c";
        assert_eq!(extract_arrow_line(text, "a+").as_deref(), Some("a+ = b → c"));
    }

    #[test]
    fn split_uses_first_arrow() {
        assert_eq!(split_at_arrow("a → b → c"), Some(("a ", " b → c")));
        assert_eq!(split_at_arrow("no arrow"), None);
    }

    #[test]
    fn strip_cjk_removes_every_block() {
        assert_eq!(strip_cjk("あア一㐀豈 ok"), " ok");
        assert_eq!(strip_cjk("café"), "café");
    }

    #[test]
    fn first_sentence_keeps_first_only() {
        assert_eq!(first_sentence("One. Two! Three?", 120), "One.");
        assert_eq!(first_sentence("Decimal 3.5 stays", 120), "Decimal 3.5 stays");
        assert_eq!(first_sentence("Ends here.", 120), "Ends here.");
    }

    #[test]
    fn first_sentence_drops_tags_and_later_arrows() {
        assert_eq!(first_sentence("<b>Bold</b>   move → more", 120), "Bold move");
    }

    #[test]
    fn first_sentence_truncates_with_ellipsis() {
        let long = "word, ".repeat(40);
        let out = first_sentence(&long, 120);

        assert!(out.chars().count() <= 120);
        assert!(out.ends_with('…'));
        assert!(!out.trim_end_matches('…').ends_with(','));
    }

    #[test]
    fn strip_leading_equals_trims_marks_and_space() {
        assert_eq!(strip_leading_equals(" == = text"), "text");
    }

    #[test]
    fn strip_leading_repetition_is_case_insensitive() {
        assert_eq!(
            strip_leading_repetition("net + shell: Nets catch shells.", LHS),
            "Nets catch shells."
        );
        assert_eq!(
            strip_leading_repetition("Net + Shell Net + Shell: x", LHS),
            "x"
        );
        assert_eq!(strip_leading_repetition("Network of shells.", "Net"), "Network of shells.");
        assert_eq!(strip_leading_repetition("anything", "  "), "anything");
    }

    #[test]
    fn ensure_terminal_punctuation_appends_period() {
        assert_eq!(ensure_terminal_punctuation("Nets catch shells", 120), "Nets catch shells.");
        assert_eq!(ensure_terminal_punctuation("Wow!", 120), "Wow!");
        assert_eq!(ensure_terminal_punctuation("Hmm…", 120), "Hmm…");
    }

    #[test]
    fn ensure_terminal_punctuation_respects_cap() {
        let full = "a".repeat(120);
        let out = ensure_terminal_punctuation(&full, 120);
        assert_eq!(out.chars().count(), 120);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn well_formed_line_is_unchanged() {
        let line = "買 = Net + Shell → Buying involves catching valuable shells in a net.";
        assert_eq!(normalize(line), line);
    }

    #[test]
    fn free_text_falls_back_to_synthesized_line() {
        assert_eq!(
            normalize("I cannot help with that request"),
            "買 = Net + Shell → Represents buy, purchase through its parts."
        );
    }

    #[test]
    fn cjk_prefix_is_stripped() {
        let out = normalize(
            "買 = Net + Shell → 購入 means buying shells as valuable items obtained via a net, literally.",
        );
        assert_eq!(
            out,
            "買 = Net + Shell → means buying shells as valuable items obtained via a net, literally."
        );
    }

    #[test]
    fn repeated_lhs_prefix_is_removed() {
        let out = normalize("買 = Net + Shell → NET + SHELL: Nets catch shells worth buying");
        assert_eq!(out, "買 = Net + Shell → Nets catch shells worth buying.");
    }

    #[test]
    fn repeated_meanings_prefix_is_removed() {
        let out = normalize("買 = Net + Shell → Buy, purchase: shells caught in nets.");
        assert_eq!(out, "買 = Net + Shell → shells caught in nets.");
    }

    #[test]
    fn empty_explanation_is_regenerated() {
        let out = normalize("買 = Net + Shell → 購入");
        assert_eq!(out, "買 = Net + Shell → Represents buy, purchase.");
    }

    #[test]
    fn bars_and_newlines_do_not_break_extraction() {
        let out = normalize("Answer:\n| 買 = Net + Shell → Nets |\n catch shells. Then more.");
        assert_eq!(out, "買 = Net + Shell → Nets catch shells.");
    }

    #[test]
    fn normalize_line_is_idempotent() {
        let lines = [
            "買 = Net + Shell → Buying involves catching valuable shells in a net.",
            "買 = Net + Shell → Represents buy, purchase through its parts.",
            "買 = Net + Shell → Wow!",
        ];
        for line in lines {
            let once = normalize_line(line, LHS, MEANINGS);
            let twice = normalize_line(&once, LHS, MEANINGS);
            assert_eq!(once, twice);
        }

        let long = format!("買 = Net + Shell → {}", "shells and nets ".repeat(20));
        let once = normalize_line(&long, LHS, MEANINGS);
        assert_eq!(normalize_line(&once, LHS, MEANINGS), once);
    }

    #[test]
    fn long_explanation_obeys_truncation_law() {
        let out = normalize(&format!("買 = Net + Shell → {}", "shells and nets ".repeat(20)));
        let right = out.split_once(ARROW).map(|(_, r)| r.trim()).unwrap_or_default();

        assert!(right.chars().count() <= MAX_EXPLANATION_CHARS);
        assert!(right.ends_with('…'));
    }

    #[test]
    fn fallback_line_degrades_gracefully() {
        assert_eq!(
            fallback_line(KANJI, LHS, MEANINGS).as_str(),
            "買 = Net + Shell → Represents buy, purchase through its parts."
        );
        assert_eq!(
            fallback_line("一", "", "One").as_str(),
            "一 = One → Represents one through its parts."
        );
        assert_eq!(
            fallback_line("一", "", "").as_str(),
            "一 = — → Represents meaning through its parts."
        );
    }
}
