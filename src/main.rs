//! Command-line driver: scan a template and write its variants.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use longan::common::{Error, Result};
use longan::ooxml::docx::Document;
use longan::template::{
    GeneratorOptions, ReplacementTable, ScanReport, TabularConfig, TermSet, VariantGenerator, scan,
};

/// Generate value-substituted copies of a Word document.
#[derive(Debug, Parser)]
#[clap(name = "longan", version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the labeled values found for each term
    Scan(ScanArgs),
    /// Write one document per replacement value
    Generate(GenerateArgs),
}

/// Where the terms come from.
#[derive(Debug, Clone, Args)]
struct TermArgs {
    /// Term to look for (repeatable)
    #[clap(long = "term", value_name = "TERM")]
    terms: Vec<String>,

    /// File with one term per line
    #[clap(long, value_name = "FILE")]
    terms_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ScanArgs {
    /// Template document
    #[clap(value_name = "DOCX")]
    input: PathBuf,

    #[clap(flatten)]
    terms: TermArgs,
}

#[derive(Debug, Clone, Args)]
struct GenerateArgs {
    /// Template document
    #[clap(value_name = "DOCX")]
    input: PathBuf,

    #[clap(flatten)]
    terms: TermArgs,

    /// Comma-separated replacement values for a term (repeatable)
    #[clap(long = "values", value_name = "TERM=V1,V2,...")]
    values: Vec<String>,

    /// File with one replacement value per line for a term (repeatable)
    #[clap(long = "values-file", value_name = "TERM=PATH")]
    values_files: Vec<String>,

    /// CSV file whose column headers are term names
    #[clap(long, value_name = "PATH", conflicts_with = "tsv")]
    csv: Option<PathBuf>,

    /// TSV file whose column headers are term names
    #[clap(long, value_name = "PATH")]
    tsv: Option<PathBuf>,

    /// Directory for the generated documents
    #[clap(long, short = 'o', value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Output file name pattern; `{n}` is the 1-based variant number
    #[clap(long, value_name = "PATTERN")]
    name_pattern: Option<String>,

    /// Build variants in parallel
    #[clap(long)]
    parallel: bool,

    /// YAML file with generator options
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Scan(args) => run_scan(args),
        Command::Generate(args) => run_generate(args),
    }
}

fn collect_terms(args: &TermArgs, extra: impl IntoIterator<Item = String>) -> Result<TermSet> {
    let mut terms: TermSet = args.terms.iter().collect();
    if let Some(path) = &args.terms_file {
        terms.extend(TermSet::parse(&std::fs::read_to_string(path)?).iter());
    }
    terms.extend(extra);
    Ok(terms)
}

fn print_report(report: &ScanReport) {
    for (term, occurrences) in report.iter() {
        if occurrences.is_empty() {
            println!("{term}: not found");
            continue;
        }
        for occurrence in occurrences {
            println!("{term}: {} (paragraph {})", occurrence.value, occurrence.paragraph + 1);
        }
    }
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let terms = collect_terms(&args.terms, [])?;
    if terms.is_empty() {
        return Err(Error::Other("no terms given; use --term or --terms-file".to_string()));
    }

    let doc = Document::open(&args.input)?;
    let report = scan(&doc, &terms)?;
    print_report(&report);
    Ok(())
}

/// Split `TERM=REST` at the first `=`.
fn split_assignment(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .map(|(term, rest)| (term.trim(), rest))
        .filter(|(term, _)| !term.is_empty())
        .ok_or_else(|| Error::Other(format!("expected TERM=VALUE, got '{}'", arg)))
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => GeneratorOptions::load(path)?,
        None => GeneratorOptions::default(),
    };
    if args.parallel {
        options.parallel = true;
    }
    if let Some(pattern) = &args.name_pattern {
        options.file_name_pattern = pattern.clone();
    }

    let mut assigned = Vec::new();
    for arg in &args.values {
        let (term, values) = split_assignment(arg)?;
        assigned.push((term.to_string(), values.split(',').map(str::to_string).collect::<Vec<_>>()));
    }
    for arg in &args.values_files {
        let (term, path) = split_assignment(arg)?;
        let text = std::fs::read_to_string(path)?;
        assigned.push((term.to_string(), text.lines().map(str::to_string).collect()));
    }

    let terms = collect_terms(&args.terms, assigned.iter().map(|(t, _)| t.clone()))?;
    if terms.is_empty() {
        return Err(Error::Other(
            "no terms given; use --term, --terms-file or --values".to_string(),
        ));
    }

    let doc = Document::open(&args.input)?;
    let report = scan(&doc, &terms)?;
    for notice in report.notices() {
        warn!("{}", notice);
    }

    let mut table = ReplacementTable::new();
    for (term, values) in &assigned {
        if report.is_found(term) {
            table.insert_values(term, values);
        } else {
            warn!("Ignoring values for '{}': it does not occur in the document", term);
        }
    }

    let tabular = match (&args.csv, &args.tsv) {
        (Some(path), _) => Some((path, TabularConfig::csv())),
        (None, Some(path)) => Some((path, TabularConfig::tsv())),
        (None, None) => None,
    };
    if let Some((path, config)) = tabular {
        let data = std::fs::read(path)?;
        match ReplacementTable::from_tabular(&data, report.found(), &config) {
            Ok(import) => {
                for notice in &import.notices {
                    warn!("{}", notice);
                }
                for term in import.table.terms() {
                    table.insert_values(term, import.table.values(term));
                }
            },
            Err(e) => error!("{}: {}; no values taken from it", path.display(), e),
        }
    }

    let generator = VariantGenerator::new(options);
    let generation = generator.run(&doc, &report, &table)?;
    for notice in generation.all_notices() {
        warn!("{}", notice);
    }
    if generation.is_empty() {
        return Ok(());
    }

    std::fs::create_dir_all(&args.out_dir)?;
    for variant in &generation.variants {
        let path = args.out_dir.join(generator.options().file_name(variant.index));
        std::fs::write(&path, &variant.bytes)?;
        info!("Wrote {} ({} substitutions)", path.display(), variant.applied);
    }
    Ok(())
}
