use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use touki_types::{DateReport, FailureEntry, LatestEntry, MatchEntry};
use tracing_subscriber::EnvFilter;

use touki_date::era::{self, EraSpec, EraTable};
use touki_date::extractor::{DateExtractor, Extraction, FragmentOutcome, SAMPLE_FRAGMENTS};

#[derive(Parser)]
#[command(
    name = "touki_date",
    about = "Find the latest Japanese-era or Gregorian date in registry text"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Add or override an era, e.g. --era 慶応=1865
    #[arg(long = "era", value_name = "NAME=YEAR", global = true)]
    eras: Vec<EraSpec>,

    /// Verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Report the most recent date found across text fragments
    Extract {
        /// Fragments to scan; the built-in sample is used when none are given
        fragments: Vec<String>,
        /// JSON array of fragment strings ("-" for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the era table
    Eras,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let eras = cli
        .eras
        .iter()
        .fold(EraTable::builtin(), |table, spec| {
            table.with_era(spec.name.clone(), spec.start_year)
        });

    let result = match cli.command {
        Some(Command::Extract {
            fragments,
            input,
            format,
        }) => run_extract(eras, fragments, input.as_deref(), format),
        Some(Command::Eras) => {
            run_eras(&eras);
            Ok(ExitCode::SUCCESS)
        }
        // Default: scan the built-in sample
        None => run_extract(eras, Vec::new(), None, Format::Text),
    };

    result.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::from(2)
    })
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "touki_date=info",
        1 => "touki_date=debug",
        _ => "touki_date=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

// ═══════════════════════════════════════════════════════════════════════
//  EXTRACT MODE: latest date across fragments → stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_extract(
    eras: EraTable,
    fragments: Vec<String>,
    input: Option<&Path>,
    format: Format,
) -> Result<ExitCode> {
    let fragments = load_fragments(fragments, input)?;
    let extractor = DateExtractor::new(eras)?;
    tracing::info!(
        fragments = fragments.len(),
        eras = extractor.eras().len(),
        "scanning"
    );

    let run = extractor.report(&fragments);
    let report = build_report(&fragments, &run);

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).context("serializing report")?;
            println!("{json}");
        }
        Format::Text => match &report.latest {
            Some(latest) => println!("{}\t{}", latest.position, latest.yyyymmdd),
            None => println!("no date found"),
        },
    }

    Ok(if report.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Fragments from `--input` first, then positional ones. With neither,
/// the built-in sample.
fn load_fragments(positional: Vec<String>, input: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = input else {
        if positional.is_empty() {
            return Ok(SAMPLE_FRAGMENTS.iter().map(|s| s.to_string()).collect());
        }
        return Ok(positional);
    };

    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading fragments from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?
    };

    let mut fragments: Vec<String> = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a JSON array of strings", path.display()))?;
    fragments.extend(positional);
    Ok(fragments)
}

fn build_report(fragments: &[String], run: &Extraction) -> DateReport {
    let mut matches = Vec::new();
    let mut failures = Vec::new();

    for outcome in &run.outcomes {
        match outcome {
            FragmentOutcome::Found {
                position,
                date,
                rule,
            } => matches.push(MatchEntry {
                position: *position,
                yyyymmdd: date.yyyymmdd(),
                rule: rule.as_str().to_string(),
            }),
            FragmentOutcome::Failed {
                position, fragment, ..
            } => failures.push(FailureEntry {
                position: *position,
                fragment: fragment.clone(),
                detail: outcome.detail().unwrap_or_default(),
            }),
        }
    }

    let latest = run.latest.map(|l| LatestEntry {
        position: l.position,
        yyyymmdd: l.date.yyyymmdd(),
        fragment: fragments
            .get(l.position - 1)
            .cloned()
            .unwrap_or_default(),
    });

    DateReport {
        latest,
        matches,
        failures,
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  ERAS MODE: print the era table
// ═══════════════════════════════════════════════════════════════════════

fn run_eras(eras: &EraTable) {
    for e in eras.iter() {
        match era::romaji(&e.name) {
            Some(r) => println!("{} ({}): {}", e.name, r, e.start_year),
            None => println!("{}: {}", e.name, e.start_year),
        }
    }
}
