//! End-to-end mnemonic generation over fixture data with scripted generators.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;

use kanji_mnemonics::domain::services::mnemonic_normalizer::is_cjk;
use kanji_mnemonics::{
    Container, ContainerConfig, DegradeReason, MnemonicLine, MnemonicOutcome, MockGenerator,
};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/data")
}

fn config(data_dir: &Path) -> ContainerConfig {
    ContainerConfig {
        data_dir: data_dir.to_path_buf(),
        mock_embeddings: true,
        ..ContainerConfig::default()
    }
}

/// Data directory holding only the kanji store, so retrieval has nothing to
/// work with.
fn kanji_only_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::copy(
        fixture_dir().join("merged_kanji.json"),
        dir.path().join("merged_kanji.json"),
    )
    .expect("copy kanji fixture");
    dir
}

async fn run(data_dir: &Path, generator: Arc<MockGenerator>, kanji: &str) -> MnemonicOutcome {
    let container = Container::new(config(data_dir)).with_generator(generator);
    container.generate_mnemonic_use_case().await.execute(kanji).await
}

fn assert_well_formed(line: &str, kanji: &str) {
    let shape = Regex::new(&format!("^{} = .+ → .+$", regex::escape(kanji))).unwrap();
    assert!(shape.is_match(line), "bad shape: {line}");

    let (_, right) = line.split_once('→').unwrap();
    assert!(!right.chars().any(is_cjk), "CJK after arrow: {line}");
    assert!(
        right.ends_with(['.', '!', '?', '…']),
        "no terminal punctuation: {line}"
    );
}

#[tokio::test]
async fn well_formed_answer_is_returned_unchanged() {
    let dir = kanji_only_dir();
    let expected = "買 = Net + Shell → Buying involves catching valuable shells in a net.";

    let outcome = run(dir.path(), Arc::new(MockGenerator::responding(expected)), "買").await;

    assert_eq!(outcome, MnemonicOutcome::Generated(MnemonicLine::new(expected)));
}

#[tokio::test]
async fn free_text_answer_becomes_synthesized_line() {
    let dir = kanji_only_dir();
    let generator = Arc::new(MockGenerator::responding("I think this kanji is about shopping"));

    let outcome = run(dir.path(), generator, "買").await;

    assert!(!outcome.is_degraded());
    assert_eq!(
        outcome.line().as_str(),
        "買 = Net + Shell → Represents buy, purchase through its parts."
    );
}

#[tokio::test]
async fn cjk_prefix_is_removed() {
    let dir = kanji_only_dir();
    let generator = Arc::new(MockGenerator::responding(
        "買 = Net + Shell → 購入 means buying shells as valuable items obtained via a net, literally.",
    ));

    let outcome = run(dir.path(), generator, "買").await;

    assert_eq!(
        outcome.line().as_str(),
        "買 = Net + Shell → means buying shells as valuable items obtained via a net, literally."
    );
    assert_well_formed(outcome.line().as_str(), "買");
}

#[tokio::test]
async fn empty_context_still_yields_required_shape() {
    let dir = kanji_only_dir();
    let noisy = "Sure!\n買 = Net + Shell → Net + Shell: 網 catches shells | then sells them. More text";

    for kanji in ["買", "木", "丶"] {
        let generator = Arc::new(MockGenerator::responding(noisy));
        let outcome = run(dir.path(), generator.clone(), kanji).await;

        assert_well_formed(outcome.line().as_str(), kanji);
        let prompt = generator.last_prompt().expect("generator was called");
        assert!(prompt.contains("(English-only):\n\n\nNow generate"));
    }
}

#[tokio::test]
async fn absent_radical_store_still_generates() {
    let dir = kanji_only_dir();
    let container = Container::new(config(dir.path()))
        .with_generator(Arc::new(MockGenerator::responding("")));

    let retriever = container.retrieve_radicals_use_case().await;
    let context = retriever
        .retrieve(&["Net".to_string(), "Shell".to_string()], 3)
        .await
        .unwrap();
    assert!(context.is_empty());

    let outcome = container.generate_mnemonic_use_case().await.execute("買").await;
    assert!(!outcome.is_degraded());
    assert_well_formed(outcome.line().as_str(), "買");
}

#[tokio::test]
async fn retrieved_radicals_reach_the_prompt() {
    let generator = Arc::new(MockGenerator::responding(""));

    run(&fixture_dir(), generator.clone(), "買").await;

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("Radical: Net\nMeaning: net"));
    assert!(prompt.contains("Radical: Shell\nMeaning: shell, money"));
    assert!(!prompt.contains("Stale"), "older snapshot must not be used");
}

#[tokio::test]
async fn failing_generator_degrades_to_fallback() {
    let dir = kanji_only_dir();

    let outcome = run(dir.path(), Arc::new(MockGenerator::failing("out of memory")), "買").await;

    assert_eq!(outcome.degrade_reason(), Some(DegradeReason::GenerationFailed));
    assert_eq!(
        outcome.line().as_str(),
        "買 = Net + Shell → Represents buy, purchase through its parts."
    );
}

#[tokio::test]
async fn unreachable_generator_degrades_to_fallback() {
    let dir = kanji_only_dir();

    let outcome = run(dir.path(), Arc::new(MockGenerator::unavailable("refused")), "木").await;

    assert_eq!(outcome.degrade_reason(), Some(DegradeReason::GeneratorUnavailable));
    assert_eq!(
        outcome.line().as_str(),
        "木 = tree, wood → Represents tree, wood through its parts."
    );
}

#[tokio::test]
async fn unknown_kanji_skips_generation() {
    let dir = kanji_only_dir();
    let generator = Arc::new(MockGenerator::responding("ignored"));

    let outcome = run(dir.path(), generator.clone(), " 犬 ").await;

    assert_eq!(outcome.degrade_reason(), Some(DegradeReason::UnknownKanji));
    assert_eq!(
        outcome.line().as_str(),
        "犬 = — → Represents meaning through its parts."
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn unreadable_kanji_store_degrades() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("merged_kanji.json"), "{ not json").unwrap();

    let outcome = run(dir.path(), Arc::new(MockGenerator::responding("x")), "買").await;

    assert_eq!(
        outcome.degrade_reason(),
        Some(DegradeReason::KanjiStoreUnavailable)
    );
    assert_well_formed(outcome.line().as_str(), "買");
}

#[tokio::test]
async fn record_without_parts_uses_placeholder() {
    let dir = kanji_only_dir();

    let outcome = run(dir.path(), Arc::new(MockGenerator::failing("boom")), "丶").await;

    assert_eq!(
        outcome.line().as_str(),
        "丶 = — → Represents meaning through its parts."
    );
}

#[tokio::test]
async fn prompt_command_matches_what_generator_sees() {
    let dir = kanji_only_dir();
    let generator = Arc::new(MockGenerator::responding(""));
    let container = Container::new(config(dir.path())).with_generator(generator.clone());
    let use_case = container.generate_mnemonic_use_case().await;

    let prompt = use_case.prompt("買").await.unwrap();
    use_case.execute("買").await;

    assert_eq!(generator.last_prompt().as_deref(), Some(prompt.as_str()));
    assert!(use_case.prompt("犬").await.unwrap_err().is_not_found());
}
