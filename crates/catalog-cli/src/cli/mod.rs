//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use catalog_core::domain::{ProductId, SortOrder};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "catalog",
    bin_name = "catalog",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Product catalog client",
    long_about = "Catalog lists, creates, updates and deletes products through the \
                  catalog REST API. Input is validated locally before anything \
                  is sent, and backend errors are reported in one consistent form.",
    after_help = "EXAMPLES:\n\
        \x20 catalog list --sort price,desc --size 20\n\
        \x20 catalog create --name \"Desk lamp\" --price 19.99 --quantity 40\n\
        \x20 catalog validate --file product.json\n\
        \x20 catalog completions bash > /usr/share/bash-completion/completions/catalog",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List products, one page at a time.
    #[command(
        visible_alias = "ls",
        about = "List products",
        after_help = "EXAMPLES:\n\
            \x20 catalog list\n\
            \x20 catalog list --name lamp --min-price 10 --sort price,desc\n\
            \x20 catalog list --page 2 --size 50 --format csv"
    )]
    List(ListArgs),

    /// Show one product.
    #[command(about = "Show a product")]
    Get(GetArgs),

    /// Create a product.
    #[command(
        visible_alias = "new",
        about = "Create a product",
        after_help = "EXAMPLES:\n\
            \x20 catalog create --name \"Desk lamp\" --price 19.99 --quantity 40\n\
            \x20 catalog create --file lamp.json\n\
            \x20 cat lamp.json | catalog create --file -"
    )]
    Create(CreateArgs),

    /// Update a product. Omitted fields keep their current values.
    #[command(
        visible_alias = "edit",
        about = "Update a product",
        after_help = "EXAMPLES:\n\
            \x20 catalog update 3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f --price 24.90\n\
            \x20 catalog update 3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f --description \"\""
    )]
    Update(UpdateArgs),

    /// Delete a product.
    #[command(visible_alias = "rm", about = "Delete a product")]
    Delete(DeleteArgs),

    /// Check product input locally, without contacting the server.
    #[command(
        about = "Validate product input offline",
        after_help = "EXAMPLES:\n\
            \x20 catalog validate --name \"Desk lamp\" --price 5.99 --quantity 150\n\
            \x20 catalog validate --file lamp.json\n\
            \x20 catalog validate --field price --price 19.999"
    )]
    Validate(ValidateArgs),

    /// Search by name, reading one query per line from stdin.
    #[command(
        about = "Search products interactively",
        after_help = "Each line read from stdin is a new search term. Lines typed in \
            quick succession are coalesced and repeated terms are skipped.\n\n\
            EXAMPLES:\n\
            \x20 catalog search\n\
            \x20 printf 'desk\\nlamp\\n' | catalog search --size 5"
    )]
    Search(SearchArgs),

    /// Initialise a configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 catalog init            # default location\n\
            \x20 catalog init ./dev.toml # explicit path"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 catalog completions bash > ~/.local/share/bash-completion/completions/catalog\n\
            \x20 catalog completions zsh  > ~/.zfunc/_catalog\n\
            \x20 catalog completions fish > ~/.config/fish/completions/catalog.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 catalog config get api.base_url\n\
            \x20 catalog config list\n\
            \x20 catalog config path"
    )]
    Config(ConfigCommands),
}

// ── product input ─────────────────────────────────────────────────────────────

/// Product fields given as flags and/or a JSON file. Flags win over the file.
///
/// Numbers are taken as given so that local validation, not the argument
/// parser, reports values like `-3` or `2.5` for quantity.
#[derive(Debug, Default, Args)]
pub struct ProductInput {
    /// Product name.
    #[arg(long = "name", value_name = "NAME", help = "Product name")]
    pub name: Option<String>,

    /// Unit price.
    #[arg(
        long = "price",
        value_name = "PRICE",
        allow_hyphen_values = true,
        help = "Unit price (up to 2 decimal places)"
    )]
    pub price: Option<f64>,

    /// Units in stock.
    #[arg(
        long = "quantity",
        visible_alias = "qty",
        value_name = "QUANTITY",
        allow_hyphen_values = true,
        help = "Units in stock"
    )]
    pub quantity: Option<f64>,

    /// Free-text description. An empty string clears it.
    #[arg(long = "description", value_name = "TEXT", help = "Product description")]
    pub description: Option<String>,

    /// JSON object with product fields; `-` reads stdin.
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help = "Read product fields from a JSON file ('-' for stdin)"
    )]
    pub file: Option<PathBuf>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `catalog list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page to show, starting at 1.
    #[arg(
        long = "page",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Page number (starting at 1)"
    )]
    pub page: u32,

    /// Page size; defaults to `list.page_size` from config.
    #[arg(long = "size", value_name = "N", help = "Products per page (1-100)")]
    pub size: Option<u32>,

    /// Sort keys, applied in order.
    #[arg(
        long = "sort",
        value_name = "PROPERTY[,asc|desc]",
        help = "Sort key; repeat for secondary keys"
    )]
    pub sort: Vec<SortOrder>,

    /// Case-insensitive name filter.
    #[arg(long = "name", value_name = "TEXT", help = "Filter by name")]
    pub name: Option<String>,

    #[arg(long = "min-price", value_name = "PRICE", help = "Minimum price")]
    pub min_price: Option<f64>,

    #[arg(long = "max-price", value_name = "PRICE", help = "Maximum price")]
    pub max_price: Option<f64>,

    #[arg(long = "min-quantity", value_name = "N", help = "Minimum quantity")]
    pub min_quantity: Option<u32>,

    #[arg(long = "max-quantity", value_name = "N", help = "Maximum quantity")]
    pub max_quantity: Option<u32>,

    /// Hide products with zero quantity.
    #[arg(long = "in-stock", help = "Only show products in stock")]
    pub in_stock: bool,

    /// Output format; defaults to `output.format` from config.
    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<ListFormat>,
}

/// Output format for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// One name per line.
    List,
    /// JSON page object.
    Json,
    /// CSV rows.
    Csv,
}

// ── get / create / update / delete ────────────────────────────────────────────

/// Arguments for `catalog get`.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Product public id.
    #[arg(value_name = "ID")]
    pub id: ProductId,
}

/// Arguments for `catalog create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub input: ProductInput,
}

/// Arguments for `catalog update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Product public id.
    #[arg(value_name = "ID")]
    pub id: ProductId,

    #[command(flatten)]
    pub input: ProductInput,
}

/// Arguments for `catalog delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Product public id.
    #[arg(value_name = "ID")]
    pub id: ProductId,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Delete without asking for confirmation")]
    pub yes: bool,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `catalog validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: ProductInput,

    /// Check a single field instead of the whole record.
    #[arg(
        long = "field",
        value_name = "FIELD",
        help = "Validate only this field (missing values are not reported)"
    )]
    pub field: Option<String>,
}

// ── search ────────────────────────────────────────────────────────────────────

/// Arguments for `catalog search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Page size; defaults to `list.page_size` from config.
    #[arg(long = "size", value_name = "N", help = "Results per search (1-100)")]
    pub size: Option<u32>,

    #[arg(
        long = "sort",
        value_name = "PROPERTY[,asc|desc]",
        help = "Sort key; repeat for secondary keys"
    )]
    pub sort: Vec<SortOrder>,

    #[arg(long = "in-stock", help = "Only show products in stock")]
    pub in_stock: bool,

    /// Quiet period; defaults to `search.debounce_ms` from config.
    #[arg(
        long = "debounce",
        value_name = "MS",
        help = "Milliseconds of quiet input before searching"
    )]
    pub debounce_ms: Option<u64>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `catalog init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to write the file; defaults to the platform config directory.
    #[arg(value_name = "PATH", help = "Config file to create")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing config file.
    #[arg(long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `catalog completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `catalog config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `api.base_url`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
