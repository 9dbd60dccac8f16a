//! fuzzmap - fuzzy label lookup from the command line
//!
//! Loads a tab-separated index file into a [`StringMap`] and answers each
//! query with one JSON line on stdout.
//!
//! ## Usage
//!
//! ```bash
//! fuzzmap --index airports.tsv "new yrok" "los angelos"
//! cat queries.txt | fuzzmap --index airports.tsv --ranking penalized_average
//! ```
//!
//! Logging goes to stderr; `RUST_LOG` takes precedence over `--log-level`.

mod index_file;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use fuzzmap_core::{Distribution, Ranking, SearchHit, SearchOptions, StringMap, StringMapConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "fuzzmap")]
#[command(about = "Fuzzy label lookup over a tab-separated index file")]
#[command(version)]
struct Args {
    /// Index file, one `value<TAB>label` record per line
    #[arg(short, long)]
    index: PathBuf,

    /// JSON configuration file (flags below take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Letter distribution (ascii, qwerty)
    #[arg(short, long)]
    distribution: Option<String>,

    /// Ranking law (vector_distance, penalized_average, edit_distance)
    #[arg(short, long)]
    ranking: Option<Ranking>,

    /// Maximum results per query
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Maximum per-term search distance
    #[arg(short = 'm', long)]
    max_distance: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Queries; read from stdin, one per line, when none are given
    queries: Vec<String>,
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    hits: Vec<HitOutput<'a>>,
}

#[derive(Serialize)]
struct HitOutput<'a> {
    value: &'a str,
    score: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = build_config(&args)?;
    let mut map = StringMap::with_config(config)?;

    let start = Instant::now();
    let file = File::open(&args.index)?;
    let records = index_file::load(BufReader::new(file), &mut map)?;
    info!(
        path = %args.index.display(),
        records,
        values = map.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "index built"
    );

    let options = SearchOptions {
        max_search_distance: args.max_distance,
        max_search_results: args.max_results,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.queries.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            write_query(&mut out, &map, &line, options)?;
        }
    } else {
        for query in &args.queries {
            write_query(&mut out, &map, query, options)?;
        }
    }

    Ok(())
}

/// Start from the optional JSON file, then apply flag overrides
fn build_config(args: &Args) -> Result<StringMapConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => StringMapConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => StringMapConfig::default(),
    };

    if let Some(name) = &args.distribution {
        config.distribution = Distribution::from_name(name);
    }
    if let Some(ranking) = args.ranking {
        config.ranking = ranking;
    }
    Ok(config)
}

fn write_query<W: Write>(
    out: &mut W,
    map: &StringMap<String>,
    query: &str,
    options: SearchOptions,
) -> io::Result<()> {
    let hits = map.search_with(query, options);
    let output = QueryOutput {
        query,
        hits: hits.iter().map(hit_output).collect(),
    };
    serde_json::to_writer(&mut *out, &output)?;
    writeln!(out)
}

fn hit_output(hit: &SearchHit<String>) -> HitOutput<'_> {
    HitOutput {
        value: &hit.value,
        score: hit.score,
    }
}
