use clap::{Parser, Subcommand, ValueEnum};
use sievekit_core::{Convention, ParamValue};

#[derive(Parser)]
#[command(name = "sievekit")]
#[command(about = "Encode and decode Sieve filter query strings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Codec config file (overrides ~/.sievekit/config.toml)
    #[arg(short, long, global = true, env = "SIEVEKIT_CONFIG")]
    pub config: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Output format (default: table for `operators`, json otherwise)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum ConventionArg {
    /// page, pageSize, Filters and Sorts parameters
    #[default]
    Sieve,
    /// One field=value parameter per field and value (encode only)
    HttpParam,
}

impl From<ConventionArg> for Convention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Sieve => Convention::Sieve,
            ConventionArg::HttpParam => Convention::HttpParam,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a filter (JSON) into a query string
    Encode(EncodeArgs),
    /// Decode a URL or query string into a filter (JSON)
    Decode(DecodeArgs),
    /// Merge partial filter items into a filter
    Merge(MergeArgs),
    /// List the effective operator table
    Operators,
}

impl Commands {
    /// Format used when `--format` is not given.
    pub fn default_format(&self) -> OutputFormat {
        match self {
            Commands::Operators => OutputFormat::Table,
            _ => OutputFormat::Json,
        }
    }
}

#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Path to filter JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
    /// Query-string convention
    #[arg(long, default_value = "sieve")]
    pub convention: ConventionArg,
    /// Extra parameters appended after the filter (e.g. tenant=acme)
    #[arg(long = "extra", value_parser = parse_extra)]
    pub extra: Vec<(String, ParamValue)>,
}

#[derive(clap::Args)]
pub struct DecodeArgs {
    /// URL or query string (e.g. "/posts?page=1&Filters=Title@=rust")
    pub input: String,
    /// Query-string convention
    #[arg(long, default_value = "sieve")]
    pub convention: ConventionArg,
}

#[derive(clap::Args)]
pub struct MergeArgs {
    /// Path to the original filter JSON file
    #[arg(long)]
    pub filter: String,
    /// Path to a JSON array of filter items replacing or extending the original ones
    #[arg(long)]
    pub partial: String,
}

/// Parse `key=value`; integers are kept as numbers.
pub fn parse_extra(raw: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid extra parameter \"{raw}\". Expected key=value"))?;
    if key.is_empty() {
        return Err(format!("Invalid extra parameter \"{raw}\". Key is empty"));
    }
    let value = match value.parse::<i64>() {
        Ok(n) => ParamValue::Integer(n),
        Err(_) => ParamValue::from(value),
    };
    Ok((key.to_string(), value))
}
