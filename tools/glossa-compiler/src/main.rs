mod glossary;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glossa_lexer::{Analyzer, LemmaTable, SurfaceAnalyzer};
use glossa_matcher::MatchSession;
use glossa_protocol::Lang;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Compiles glossary exports and runs glossary matches")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JSON glossary export to an rkyv snapshot
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Lemma table used for entries exported without lemmas
        #[arg(long, value_name = "FILE")]
        lemmas: Option<PathBuf>,
    },
    /// Match a text against a glossary and print the match groups as JSON
    Match {
        /// JSON export or compiled .rkyv snapshot
        #[arg(short, long, value_name = "FILE")]
        glossary: PathBuf,

        #[arg(short, long)]
        lang: String,

        #[arg(short, long)]
        text: String,

        #[arg(long, value_name = "FILE")]
        lemmas: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Compile { input, output, lemmas } => compile(input, output, lemmas),
        Command::Match {
            glossary,
            lang,
            text,
            lemmas,
            pretty,
        } => run_match(glossary, Lang::new(lang), &text, lemmas, pretty),
    }
}

fn analyzer(lemmas: Option<PathBuf>) -> anyhow::Result<SurfaceAnalyzer> {
    let table = match lemmas {
        Some(path) => LemmaTable::load(&path)?,
        None => LemmaTable::new(),
    };
    tracing::debug!(forms = table.len(), "lemma table loaded");
    Ok(SurfaceAnalyzer::new(table))
}

fn compile(input: PathBuf, output: PathBuf, lemmas: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!(path = ?input, "reading glossary export");
    let mut snapshot = glossary::load(&input)?;

    let filled = glossary::fill_missing_lemmas(&mut snapshot, &analyzer(lemmas)?)?;
    snapshot.validate()?;

    tracing::info!(
        version = snapshot.version,
        terms = snapshot.terms.len(),
        translations = snapshot.translations.len(),
        filled,
        "compiling snapshot"
    );

    let bytes = snapshot.to_archive_bytes()?;
    fs::write(&output, &bytes)?;

    tracing::info!(path = ?output, bytes = bytes.len(), "snapshot written");
    Ok(())
}

fn run_match(glossary: PathBuf, lang: Lang, text: &str, lemmas: Option<PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let snapshot = glossary::load(&glossary)?;
    let session = MatchSession::from_snapshot(lang.clone(), &snapshot);

    let tokens = analyzer(lemmas)?.analyze(text, &lang)?;
    let groups = session.match_tokens(&tokens);
    tracing::info!(tokens = tokens.len(), groups = groups.len(), "matched");

    let json = if pretty {
        serde_json::to_string_pretty(&groups)?
    } else {
        serde_json::to_string(&groups)?
    };
    println!("{}", json);
    Ok(())
}
