//! `skufam run`, `validate` and `inspect`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use skufam_families::anchors::rank_by_frequency;
use skufam_families::export::{family_rows, write_delimited_rows, write_json_rows};
use skufam_families::model::Transaction;
use skufam_families::transactions::read_transactions;
use skufam_families::{build_affinity_graph, FamilyConfig};

use crate::output;
use crate::CliError;

pub struct RunArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub json_out: Option<PathBuf>,
    pub csv_out: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub json: bool,
}

/// Load the config, or the defaults when no path is given.
///
/// Returns the directory config-relative output paths resolve against.
fn load_config(path: Option<&Path>) -> Result<(FamilyConfig, PathBuf), CliError> {
    let Some(path) = path else {
        return Ok((FamilyConfig::default(), PathBuf::from(".")));
    };
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read config {}: {e}", path.display())))?;
    let config = FamilyConfig::from_toml(&config_str)?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

fn load_baskets(path: &Path) -> Result<Vec<Transaction>, CliError> {
    let file = File::open(path)
        .map_err(|e| CliError::args(format!("cannot read {}: {e}", path.display())))?;
    let baskets = read_transactions(BufReader::new(file)).map_err(|e| {
        let mut err = CliError::from(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })?;
    log::info!("loaded {} transactions from {}", baskets.len(), path.display());
    Ok(baskets)
}

fn delimiter_byte(delimiter: char) -> Result<u8, CliError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CliError::args(format!("delimiter must be ASCII, got '{delimiter}'")))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (mut config, base_dir) = load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let delimiter = delimiter_byte(args.delimiter.unwrap_or(config.output.delimiter))?;

    // Flags resolve against the working directory, config paths against the config file
    let json_path = args
        .json_out
        .unwrap_or_else(|| base_dir.join(&config.output.json));
    let csv_path = args
        .csv_out
        .unwrap_or_else(|| base_dir.join(&config.output.csv));
    if json_path == csv_path {
        return Err(CliError::args(format!(
            "JSON and CSV outputs both point at {}",
            json_path.display()
        ))
        .with_hint("pass distinct --json-out and --csv-out paths"));
    }

    let baskets = load_baskets(&args.input)?;
    let result = skufam_families::run(&config, &baskets)?;
    let rows = family_rows(&result.families);

    // Stage both artifacts before either replaces its target
    let json_staged = output::stage(&json_path, |w| {
        write_json_rows(w, &rows).map_err(|e| e.to_string())
    })?;
    let csv_staged = output::stage(&csv_path, |w| {
        write_delimited_rows(w, &rows, delimiter).map_err(|e| e.to_string())
    })?;
    log::debug!(
        "staged {} and {}",
        json_staged.target().display(),
        csv_staged.target().display()
    );
    for path in output::commit_all(vec![json_staged, csv_staged])? {
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} SKUs from {} transactions: {} families, {} direct, {} transitive, {} forced",
        s.skus, s.transactions, s.families, s.direct, s.transitive, s.forced,
    );
    if s.left_alone > 0 {
        eprintln!(
            "warning: {} SKUs had no usable affinity and were placed by fallback",
            s.left_alone
        );
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = load_config(Some(&config_path))?;

    println!("config:    {}", config.name);
    println!("universe:  {} SKUs", config.universe_size);
    for (i, tier) in config.tiers.iter().enumerate() {
        println!(
            "tier {i}:    {} anchors x capacity {}",
            tier.anchors, tier.capacity
        );
    }
    println!(
        "total:     {} anchors, capacity {}",
        config.anchor_count(),
        config.total_capacity()
    );

    if config.total_capacity() < config.universe_size {
        eprintln!(
            "warning: capacity {} is below the expected universe of {} SKUs",
            config.total_capacity(),
            config.universe_size
        );
    }

    Ok(())
}

pub fn cmd_inspect(input: PathBuf, sku: i64, top: usize) -> Result<(), CliError> {
    let baskets = load_baskets(&input)?;
    let graph = build_affinity_graph(&baskets);

    let ranked = rank_by_frequency(&graph);
    let Some(rank) = ranked.iter().position(|&(s, _)| s == sku) else {
        return Err(CliError::args(format!("SKU {sku} does not appear in {}", input.display())));
    };

    println!("sku:       {sku}");
    println!("frequency: {} of {} transactions", graph.frequency(sku), graph.transaction_count());
    println!("rank:      {} of {}", rank + 1, ranked.len());

    let partners = graph.top_partners(sku, top);
    if partners.is_empty() {
        println!("partners:  none");
    } else {
        println!("partners:");
        for (partner, count) in partners {
            println!("  {partner:>12}  {count}");
        }
    }

    Ok(())
}
