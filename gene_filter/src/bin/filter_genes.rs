//! List the genes of a dataset that pass one of the isoform expression
//! filters, with their max fold change over the chosen label set.
//!
//! If an error occurs, the process writes the error and its causes to
//! stderr and exits with code 1.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use env_logger::Builder;
use expression::Dataset;
use gene_filter::{FilterParams, GeneFilter, GeneFilterEngine, MaxFoldChangeCache};
use itertools::Itertools;
use log::{info, LevelFilter};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Dominant isoform switching
    Dis,
    /// Differential isoform expression between categories
    De,
    /// Category-specific isoform expression
    Cse,
    /// Keep every gene
    #[value(name = "none")]
    Unfiltered,
}

#[derive(Debug, Parser)]
struct Args {
    /// Dataset description JSON
    dataset: PathBuf,

    #[clap(value_enum)]
    mode: Mode,

    /// TOML file with filter thresholds
    #[clap(long)]
    params: Option<PathBuf>,

    /// Label set whose clusters are compared. Defaults to the first one.
    #[clap(long)]
    label_set: Option<String>,

    /// Comma separated cluster names, for de and cse
    #[clap(long, value_delimiter = ',')]
    categories: Vec<String>,
}

fn run(args: Args) -> Result<()> {
    let dataset = Dataset::load(&args.dataset)
        .with_context(|| format!("loading dataset {}", args.dataset.display()))?;
    let params = match &args.params {
        Some(path) => FilterParams::from_path(path)?,
        None => FilterParams::default(),
    };

    let label_set = match &args.label_set {
        Some(name) => dataset.label_set(name).ok_or_else(|| {
            anyhow!(
                "no label set named {name:?}; available: {}",
                dataset.label_sets.iter().map(|s| s.name()).join(", ")
            )
        })?,
        None => dataset
            .label_sets
            .first()
            .ok_or_else(|| anyhow!("dataset has no label sets"))?,
    };

    let filter = match args.mode {
        Mode::Unfiltered => GeneFilter::None,
        Mode::Dis => GeneFilter::DominantIsoformSwitching(params.dis),
        Mode::De => GeneFilter::DifferentialExpression {
            categories: args.categories,
            thresholds: params.de,
        },
        Mode::Cse => GeneFilter::CategorySpecificExpression {
            categories: args.categories,
            thresholds: params.cse,
        },
    };
    filter
        .validate(label_set.clusters())
        .with_context(|| format!("label set {:?}", label_set.name()))?;

    let engine = GeneFilterEngine::new(&dataset.matrix, label_set.clusters());
    let genes = engine.filter_genes(&dataset.genes, &filter);
    info!("{} of {} genes pass", genes.len(), dataset.genes.len());

    let mut fold_changes = MaxFoldChangeCache::new();
    fold_changes.calculate(&dataset.genes, &dataset.matrix, label_set);

    let mut out = BufWriter::new(std::io::stdout().lock());
    writeln!(out, "gene_id\tgene_name\tmax_fold_change")?;
    for gene in genes {
        let fold_change = fold_changes
            .get(label_set.name(), gene.id())
            .unwrap_or_default();
        writeln!(out, "{}\t{}\t{}", gene.id(), gene.display_name(), fold_change)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(Args::parse()) {
        // write message and causes, exit code = 1;
        eprintln!("{e}");
        for c in e.chain().skip(1) {
            eprintln!("\tCaused by: {c}");
        }
        std::process::exit(1);
    }
}
