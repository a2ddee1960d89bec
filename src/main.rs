mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Commands;
use kanji_mnemonics::{Container, ContainerConfig, KanjiDetails, MnemonicOutcome, StrokeStyle};

#[derive(Parser)]
#[command(name = "kanji-mnemonics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = ".")]
    data_dir: String,

    #[arg(long, global = true)]
    mock_embeddings: bool,

    #[arg(long, global = true)]
    mock_generator: bool,

    /// Number of radical documents used as prompt context
    #[arg(long, global = true, default_value = "3")]
    top_k: usize,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        data_dir: PathBuf::from(expand_tilde(&cli.data_dir)),
        mock_embeddings: cli.mock_embeddings,
        mock_generator: cli.mock_generator,
        top_k: cli.top_k,
        ..ContainerConfig::default()
    });

    match cli.command {
        Commands::Lookup {
            kanji,
            no_mnemonic,
            svg,
            standard_colors,
            no_numbers,
            stroke_width,
        } => {
            let style = stroke_style(standard_colors, no_numbers, stroke_width);
            let details = container
                .lookup_kanji_use_case()
                .with_style(style)
                .execute(&kanji)
                .await?;
            print_details(&details);

            if let Some(path) = svg {
                match &details.stroke_svg {
                    Some(diagram) => {
                        std::fs::write(&path, diagram)
                            .with_context(|| format!("Failed to write {}", path))?;
                        println!("Stroke order:   written to {}", path);
                    }
                    None => println!("Stroke order:   (not available)"),
                }
            }

            if !no_mnemonic {
                let use_case = container.generate_mnemonic_use_case().await;
                let outcome = use_case.execute_for_record(&details.record).await;
                println!("Mnemonic:       {}", outcome.line());
                report_degraded(&outcome);
            }
        }

        Commands::Mnemonic { kanji } => {
            let use_case = container.generate_mnemonic_use_case().await;
            let outcome = use_case.execute(&kanji).await;
            println!("{}", outcome.line());
            report_degraded(&outcome);
        }

        Commands::Retrieve { radicals } => {
            let use_case = container.retrieve_radicals_use_case().await;
            let documents = use_case.retrieve(&radicals, cli.top_k).await?;

            if documents.is_empty() {
                println!("No radical documents retrieved.");
            } else {
                for (i, document) in documents.iter().enumerate() {
                    println!("{}. {}\n", i + 1, document.replace('\n', "\n   "));
                }
            }
        }

        Commands::Prompt { kanji } => {
            let use_case = container.generate_mnemonic_use_case().await;
            print!("{}", use_case.prompt(&kanji).await?);
        }

        Commands::Stats => {
            let kanji_count = container.kanji_repository().count().await?;
            let saved_count = container.mnemonic_archive().count().await?;
            let snapshot = container.radical_repository().snapshot_path();

            println!("Kanji Mnemonics Statistics");
            println!("==========================");
            println!("Kanji:           {}", kanji_count);
            println!("Saved mnemonics: {}", saved_count);
            match snapshot {
                Some(path) => println!("Radical store:   {}", path.display()),
                None => println!("Radical store:   (none)"),
            }
            println!("Data Dir:        {}", container.data_dir().display());
        }
    }

    Ok(())
}

fn print_details(details: &KanjiDetails) {
    let record = &details.record;
    let or_dash = |values: &[String], sep: &str| {
        if values.is_empty() {
            "-".to_string()
        } else {
            values.join(sep)
        }
    };

    println!("Kanji:          {}", record.kanji);
    println!("Meanings:       {}", or_dash(&record.meanings, ", "));
    println!("Radicals:       {}", or_dash(&record.radicals, " + "));
    println!(
        "JLPT:           {}",
        record
            .jlpt
            .as_ref()
            .map(|level| level.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("On readings:    {}", or_dash(&record.readings_on, ", "));
    println!("Kun readings:   {}", or_dash(&record.readings_kun, ", "));

    for line in saved_lines(details) {
        println!("{}", line);
    }
}

fn saved_lines(details: &KanjiDetails) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(saved) = details.saved_mnemonic.as_ref().filter(|s| s.has_mnemonic()) {
        lines.push(format!("Saved:          {}", saved.mnemonic));
        if saved.has_reminder() {
            lines.push(format!("Reminder:       {}", saved.reminder));
        }
    }
    lines
}

fn stroke_style(standard_colors: bool, no_numbers: bool, stroke_width: u32) -> StrokeStyle {
    let base = if standard_colors {
        StrokeStyle::standard()
    } else {
        StrokeStyle::high_contrast()
    };
    base.with_stroke_width(stroke_width).with_numbers(!no_numbers)
}

fn report_degraded(outcome: &MnemonicOutcome) {
    if let Some(reason) = outcome.degrade_reason() {
        eprintln!("(fallback: {})", reason);
    }
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
