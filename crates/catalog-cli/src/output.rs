//! Output management and formatting.
//!
//! Status lines (`success`, `info`, ...) respect `--quiet`; command results
//! written with [`OutputManager::emit`] or [`OutputManager::json`] do not,
//! so `catalog -q get ID` still prints the product.

use std::future::Future;
use std::io::{self, IsTerminal};
use std::time::Duration;

use console::{Alignment, Term, pad_str};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use catalog_core::domain::{Page, Product};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

const ID_WIDTH: usize = 36;
const NAME_WIDTH: usize = 28;
const PRICE_WIDTH: usize = 12;
const QUANTITY_WIDTH: usize = 8;
const DESCRIPTION_WIDTH: usize = 36;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Command result; never suppressed.
    pub fn emit(&self, text: &str) -> io::Result<()> {
        self.term.write_line(text.trim_end_matches('\n'))
    }

    /// Command result as pretty JSON; never suppressed.
    pub fn json<T: Serialize>(&self, value: &T) -> CliResult<()> {
        let text = serde_json::to_string_pretty(value).map_err(|e| CliError::InvalidInput {
            message: format!("Failed to serialise output: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(self.emit(&text)?)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`. *Not* suppressed in quiet mode, errors
    /// must always be visible.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Print one product as JSON or as labelled lines.
    pub fn product(&self, product: &Product) -> CliResult<()> {
        if self.is_json() {
            return self.json(product);
        }
        Ok(self.emit(&render_product(product))?)
    }

    /// Await `task` behind a spinner on stderr. No spinner is drawn when
    /// output is not an interactive, human-readable terminal.
    pub async fn with_spinner<F: Future>(&self, message: &str, task: F) -> F::Output {
        let Some(bar) = self.spinner(message) else {
            return task.await;
        };
        let result = task.await;
        bar.finish_and_clear();
        result
    }

    fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.quiet || self.resolved_format != OutputFormat::Human || !io::stderr().is_terminal()
        {
            return None;
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if results should be written as JSON.
    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

// ── Renderers ─────────────────────────────────────────────────────────────────

/// Fixed-width table of a page, with a position footer.
pub fn render_table(page: &Page<Product>) -> String {
    if page.is_empty() {
        return "No products found".into();
    }

    let mut out = String::new();
    out.push_str(&row("ID", "NAME", "PRICE", "QTY", "DESCRIPTION"));
    for product in &page.content {
        let id = product
            .public_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        out.push_str(&row(
            &id,
            &product.name,
            &format!("{:.2}", product.price),
            &product.quantity.to_string(),
            product.description.as_deref().unwrap_or(""),
        ));
    }
    out.push_str(&format!(
        "\nPage {} of {} ({} product{})",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements,
        if page.total_elements == 1 { "" } else { "s" },
    ));
    out
}

fn row(id: &str, name: &str, price: &str, quantity: &str, description: &str) -> String {
    format!(
        "{}  {}  {}  {}  {}\n",
        pad_str(id, ID_WIDTH, Alignment::Left, None),
        pad_str(name, NAME_WIDTH, Alignment::Left, Some("\u{2026}")),
        pad_str(price, PRICE_WIDTH, Alignment::Right, None),
        pad_str(quantity, QUANTITY_WIDTH, Alignment::Right, None),
        pad_str(description, DESCRIPTION_WIDTH, Alignment::Left, Some("\u{2026}")).trim_end(),
    )
}

/// RFC 4180 CSV with a header row.
pub fn render_csv(products: &[Product]) -> String {
    let mut out = String::from("public_id,name,price,quantity,description\n");
    for p in products {
        let id = p.public_id.map(|id| id.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{},{},{:.2},{},{}\n",
            id,
            csv_field(&p.name),
            p.price,
            p.quantity,
            csv_field(p.description.as_deref().unwrap_or("")),
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Product names, one per line.
pub fn render_names(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Labelled lines for a single product.
pub fn render_product(product: &Product) -> String {
    let mut lines = vec![
        format!(
            "ID:          {}",
            product.public_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
        ),
        format!("Name:        {}", product.name),
        format!("Price:       {:.2}", product.price),
        format!("Quantity:    {}", product.quantity),
    ];
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("Description: {description}"));
    }
    lines.join("\n")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use catalog_core::domain::ProductId;

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            quiet,
            no_color,
            output_format: OutputFormat::Human, // avoid TTY detection in tests
            ..GlobalArgs::default()
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn product(name: &str, description: Option<&str>) -> Product {
        Product {
            public_id: Some(
                "3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f"
                    .parse::<ProductId>()
                    .unwrap(),
            ),
            name: name.into(),
            price: 19.9,
            quantity: 40,
            description: description.map(Into::into),
        }
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true);
        assert!(out.print("hello").is_ok());
        assert!(out.quiet);
    }

    #[test]
    fn error_not_suppressed_in_quiet_mode() {
        let out = make_manager(true, true);
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn no_color_flag_reported() {
        assert!(make_manager(false, false).supports_color());
        assert!(!make_manager(false, true).supports_color());
    }

    #[test]
    fn plain_and_json_formats_never_colour() {
        let args = GlobalArgs {
            output_format: OutputFormat::Json,
            ..GlobalArgs::default()
        };
        let out = OutputManager::new(&args, &AppConfig::default());
        assert!(!out.supports_color());
        assert!(out.is_json());
    }

    #[test]
    fn table_has_header_rows_and_footer() {
        let page = Page {
            content: vec![product("Desk lamp", None), product("Armchair", Some("Green"))],
            total_elements: 12,
            total_pages: 6,
            size: 2,
            number: 0,
        };
        let table = render_table(&page);
        let lines: Vec<_> = table.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Desk lamp"));
        assert!(lines[1].contains("19.90"));
        assert!(lines[2].ends_with("Green"));
        assert!(table.ends_with("Page 1 of 6 (12 products)"));
    }

    #[test]
    fn long_names_are_truncated() {
        let page = Page {
            content: vec![product(&"x".repeat(80), None)],
            total_elements: 1,
            total_pages: 1,
            size: 10,
            number: 0,
        };
        let table = render_table(&page);
        assert!(table.contains('\u{2026}'));
        assert!(!table.contains(&"x".repeat(NAME_WIDTH + 1)));
    }

    #[test]
    fn empty_page_says_so() {
        assert_eq!(render_table(&Page::empty()), "No products found");
    }

    #[test]
    fn csv_quotes_when_needed() {
        let csv = render_csv(&[product("Lamp, brass", Some("the \"good\" one"))]);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.ends_with(",\"Lamp, brass\",19.90,40,\"the \"\"good\"\" one\""));
    }

    #[test]
    fn product_details_skip_empty_description() {
        let text = render_product(&product("Desk lamp", Some("")));
        assert!(text.contains("Price:       19.90"));
        assert!(!text.contains("Description"));
    }
}
