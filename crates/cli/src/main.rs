// skufam CLI - build SKU families from basket data

mod exit_codes;
mod output;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use skufam_families::FamilyError;

use exit_codes::{family_exit_code, EXIT_ERROR, EXIT_OUTPUT_WRITE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "skufam")]
#[command(about = "Group SKUs into capacity-bounded families by basket co-occurrence")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). SKUFAM_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build families from a basket file and write JSON + CSV artifacts
    #[command(after_help = "\
Examples:
  skufam run baskets.dat
  skufam run baskets.dat --config grocery.toml
  skufam run baskets.dat --seed 42 --json-out out/families.json --csv-out out/families.csv
  skufam run baskets.dat --json > summary.json")]
    Run {
        /// Basket file: one transaction per line, whitespace-separated SKUs
        input: PathBuf,

        /// TOML config (tiers, universe size, seed, output paths)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Seed for the leftover shuffle (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Families JSON path (overrides config)
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Families CSV path (overrides config)
        #[arg(long)]
        csv_out: Option<PathBuf>,

        /// CSV delimiter (overrides config)
        #[arg(long)]
        delimiter: Option<char>,

        /// Print the run summary as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  skufam validate grocery.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },

    /// Show frequency, rank and strongest partners of one SKU
    #[command(after_help = "\
Examples:
  skufam inspect baskets.dat 12011
  skufam inspect baskets.dat 12011 --top 20")]
    Inspect {
        /// Basket file
        input: PathBuf,

        /// SKU to inspect
        #[arg(allow_hyphen_values = true)]
        sku: i64,

        /// Number of partners to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")",
        "\nengine:  skufam-families ",
        env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("SKUFAM_LOG", default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            input,
            config,
            seed,
            json_out,
            csv_out,
            delimiter,
            json,
        } => run::cmd_run(run::RunArgs {
            input,
            config,
            seed,
            json_out,
            csv_out,
            delimiter,
            json,
        }),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Inspect { input, sku, top } => run::cmd_inspect(input, sku, top),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT_WRITE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<FamilyError> for CliError {
    fn from(err: FamilyError) -> Self {
        let code = family_exit_code(&err);
        let hint = match &err {
            FamilyError::CapacityExhausted { .. } => {
                Some("raise tier capacities or add anchors so the families cover every SKU".into())
            }
            FamilyError::InputFormat { .. } => {
                Some("each line must hold whitespace-separated integer SKUs".into())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
