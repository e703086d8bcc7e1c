use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hotspot_engine::{catalog::Category, LocatorEngine};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hotspot", about = "Resolve Korean place questions against Seoul's city-data hotspots")]
struct Cli {
    /// Place table (.tsv) or pre-generated place list (.json). Defaults to the bundled set.
    #[arg(long, global = true, env = "HOTSPOT_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// JSON file overriding any of the word tables.
    #[arg(long, global = true, env = "HOTSPOT_LEXICON_PATH")]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a query to its best-matching location
    Resolve { query: String },
    /// Bigram similarity search
    Fuzzy {
        query: String,
        #[arg(long, default_value_t = 0.6)]
        threshold: f64,
    },
    /// Classify a query's congestion intent
    Intent { query: String },
    /// Resolution, fuzzy matches, intent and recommendations in one
    Search { query: String },
    /// Candidate tokens extracted from a query
    Keywords { query: String },
    /// List locations, optionally of one category (e.g. 공원)
    Locations {
        #[arg(long)]
        category: Option<String>,
    },
    /// Catalog size per category
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("HOTSPOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let engine = LocatorEngine::from_paths(cli.catalog.as_deref(), cli.lexicon.as_deref())?;

    match cli.command {
        Command::Resolve { query } => print_json(&engine.resolve_query(&query)),
        Command::Fuzzy { query, threshold } => {
            if !(0.0..=1.0).contains(&threshold) {
                bail!("threshold must be between 0 and 1, got {threshold}");
            }
            print_json(&engine.fuzzy_search(&query, threshold))
        }
        Command::Intent { query } => print_json(&engine.classify_intent(&query)),
        Command::Search { query } => print_json(&engine.intelligent_search(&query)),
        Command::Keywords { query } => print_json(&engine.extract_keywords(&query)),
        Command::Locations { category } => cmd_locations(&engine, category.as_deref()),
        Command::Stats => print_json(&engine.catalog().stats()),
    }
}

fn cmd_locations(engine: &LocatorEngine, category: Option<&str>) -> Result<()> {
    let Some(label) = category else {
        return print_json(&engine.catalog().all());
    };
    let Some(category) = Category::parse_label(label) else {
        let known: Vec<&str> = Category::ALL.iter().map(Category::label).collect();
        bail!("unknown category: {label} (expected one of {})", known.join(", "));
    };
    print_json(&engine.catalog().by_category(category))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
