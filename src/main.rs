//! kge-dataset CLI: inspect knowledge graph embedding datasets.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use kge_dataset::config::DatasetConfig;
use kge_dataset::dataset::Dataset;
use kge_dataset::index::{Direction, IndexKey};
use kge_dataset::triples::Split;

#[derive(Parser)]
#[command(name = "kge-dataset", version, about = "Knowledge graph embedding dataset inspector")]
struct Cli {
    /// Dataset config file (TOML with a [dataset] table).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset name, used when no config file is given.
    #[arg(long, global = true)]
    name: Option<String>,

    /// Directory with the dataset files (default: data/<name>).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show entity, relation and triple counts and the relation type histogram.
    Info,

    /// Show the cardinality type of every relation.
    Types {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Build a 1-to-N index and show its groups.
    Index {
        /// Split: train, valid or test.
        #[arg(long, default_value = "train")]
        split: String,

        /// Direction: sp (subject,predicate -> objects) or po (predicate,object -> subjects).
        #[arg(long, default_value = "sp")]
        direction: String,

        /// Show only this key, given as two comma-separated ids (e.g. "12,3").
        #[arg(long)]
        key: Option<String>,

        /// Number of groups to show when no key is given.
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn dataset_config(cli: &Cli) -> Result<DatasetConfig> {
    let mut config = match (&cli.config, &cli.name) {
        (Some(path), _) => DatasetConfig::load(path)?,
        (None, Some(name)) => DatasetConfig::with_name(name),
        (None, None) => miette::bail!("either --config or --name is required"),
    };
    if let Some(ref dir) = cli.data_dir {
        config.base_dir = Some(dir.clone());
    }
    Ok(config)
}

fn parse_key(raw: &str) -> Result<IndexKey> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [a, b] = parts.as_slice() else {
        miette::bail!("key must be two comma-separated ids, got \"{raw}\"");
    };
    Ok([a.parse().into_diagnostic()?, b.parse().into_diagnostic()?])
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = dataset_config(&cli)?;

    match cli.command {
        Commands::Info => {
            let dataset = Dataset::load(&config)?;
            println!("Dataset {}", dataset.name());
            println!("  {} entities", dataset.num_entities());
            println!("  {} relations", dataset.num_relations());
            for (t, predicates) in dataset.relations_per_type() {
                println!("    {} relations of type {t}", predicates.len());
            }
            for split in Split::ALL {
                println!("  {} {split} triples", dataset.split(split).len());
            }
        }

        Commands::Types { json } => {
            let dataset = Dataset::load(&config)?;
            let table = dataset.relation_types();
            if json {
                let rows: Vec<serde_json::Value> = table
                    .iter()
                    .map(|(p, t, stats)| {
                        serde_json::json!({
                            "relation": p,
                            "meta": dataset.relations()[p as usize],
                            "type": t,
                            "stats": stats,
                            "avg_out": stats.avg_out(),
                            "avg_in": stats.avg_in(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&rows).into_diagnostic()?
                );
            } else {
                for (p, t, stats) in table.iter() {
                    let label = dataset.relations()[p as usize].join(" ");
                    let fmt_avg = |a: Option<f64>| a.map_or("-".to_string(), |v| format!("{v:.3}"));
                    println!(
                        "{p:>6}  {t}  out {:>8}  in {:>8}  {label}",
                        fmt_avg(stats.avg_out()),
                        fmt_avg(stats.avg_in()),
                    );
                }
            }
        }

        Commands::Index {
            split,
            direction,
            key,
            limit,
        } => {
            let split: Split = split.parse()?;
            let direction: Direction = direction.parse()?;
            let dataset = Dataset::load(&config)?;
            let index = dataset.index_1_to_n(split, direction);

            println!(
                "{} distinct {direction} keys, {} completions in {split}",
                index.len(),
                index.total_completions()
            );

            match key {
                Some(raw) => {
                    let key = parse_key(&raw)?;
                    match index.get(&key) {
                        Some(values) => println!("{key:?} -> {values:?}"),
                        None => println!("{key:?} not found"),
                    }
                }
                None => {
                    let compact = dataset.compact_index(split, direction);
                    for (key, values) in compact.iter().take(limit) {
                        println!("{key:?} -> {values:?}");
                    }
                    if compact.len() > limit {
                        println!("... {} more", compact.len() - limit);
                    }
                }
            }
        }
    }

    Ok(())
}
