//! Deterministic instruction prompt for the mnemonic generator.
//!
//! The wording, the rules block and the worked example are tuned to the output
//! shape the normalizer expects; keep them byte-for-byte stable.

/// Worked example shown to the model.
pub const EXAMPLE_LINE: &str = "買 = Net + Shell → Buying involves catching valuable shells in a net.";

/// Separator between retrieved context documents.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join retrieved radical documents into the prompt's context block.
pub fn join_context(documents: &[String]) -> String {
    documents.join(CONTEXT_SEPARATOR)
}

/// Assemble the prompt for `kanji`.
///
/// `lhs` is the radical list (or meanings) that must appear on the left of the
/// arrow, `meanings` the comma-joined meanings and `context` the already joined
/// retrieval block, which may be empty.
pub fn build_prompt(kanji: &str, lhs: &str, meanings: &str, context: &str) -> String {
    format!(
        "
You are a Kanji mnemonic generator.
Combine the radicals’ meanings to create a short, logical English mnemonic.

Follow this exact one-line format:
{kanji} = {lhs} → <short, clear mnemonic>

Rules:
- Use ONLY English words and ASCII punctuation. Never include Japanese/Chinese (kanji, kana, hanzi) in the mnemonic.
- Ignore any non-English visual descriptions; translate their ideas into simple English or omit them.
- Keep it under 120 characters.
- Output exactly one line. No extra text.

Example:
{EXAMPLE_LINE}

Context about the radicals (English-only):
{context}

Now generate for {kanji} (\"{meanings}\").
"
    )
}
