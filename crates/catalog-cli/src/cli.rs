//! CLI argument definitions for the catalog browser.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use catalog_model::SortKey;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "catalog",
    version,
    about = "Browse a product catalog from the terminal",
    long_about = "Filter, sort and page through a product catalog file.\n\n\
                  Keeps a wishlist and a compare set of up to three items,\n\
                  and exchanges compare sets as `compare=a,b,c` links."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file to use instead of the platform config file.
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter and sort a catalog and print the revealed results.
    Search(SearchArgs),

    /// List each facet with per-value counts.
    Facets(FacetsArgs),

    /// Print the quick view detail of one item.
    Show(ShowArgs),

    /// Decode a compare link and print the items side by side.
    Compare(CompareArgs),

    /// Browse a catalog interactively.
    Browse(BrowseArgs),

    /// Print the effective settings as TOML.
    Settings(SettingsArgs),
}

#[derive(Args)]
pub struct SettingsArgs {
    /// Save the effective settings to the settings file.
    #[arg(long = "write")]
    pub write: bool,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Free-text query matched against name, brand and notable attributes.
    #[arg(long = "query", value_name = "TEXT")]
    pub query: Option<String>,

    /// Facet constraint, repeatable (`gender=men`).
    #[arg(long = "facet", short = 'f', value_name = "NAME=VALUE")]
    pub facets: Vec<String>,

    /// Numeric range, repeatable (`price=0..400`, `size=50..`).
    #[arg(long = "range", short = 'r', value_name = "NAME=MIN..MAX")]
    pub ranges: Vec<String>,

    /// Result ordering.
    #[arg(long = "sort", value_name = "KEY")]
    pub sort: Option<SortKey>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Catalog JSON file.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of pages to reveal.
    #[arg(long = "pages", value_name = "N", default_value = "1")]
    pub pages: NonZeroUsize,

    /// Items per page (overrides settings).
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<NonZeroUsize>,

    /// Compare set to mark, as a link or comma-separated ids.
    #[arg(long = "compare", value_name = "IDS")]
    pub compare: Option<String>,
}

#[derive(Args)]
pub struct FacetsArgs {
    /// Catalog JSON file.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Catalog JSON file.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Item id.
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Catalog JSON file.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Compare link (`compare=a,b,c`, a query string, or `a,b,c`).
    #[arg(value_name = "LINK")]
    pub link: String,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Catalog JSON file.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Items per page (overrides settings).
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<NonZeroUsize>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
