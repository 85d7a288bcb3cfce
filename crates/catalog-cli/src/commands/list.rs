//! Implementation of the `catalog list` command.

use tracing::instrument;

use catalog_core::application::ProductService;
use catalog_core::domain::{Page, Product, ProductQuery, SortOrder};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::{OutputManager, render_csv, render_names, render_table},
};

#[instrument(skip_all, fields(page = args.page))]
pub async fn execute(
    args: ListArgs,
    service: &ProductService,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let query = build_query(&args, config)?;
    let page = output
        .with_spinner("Loading products...", service.list(&query))
        .await?;

    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format.unwrap_or(config.output.format)
    };
    show_page(&page, format, output)?;

    if format == ListFormat::Table {
        if let Some(next) = page.next_number() {
            output.info(&format!("Next page: catalog list --page {}", next + 1))?;
        }
    }
    Ok(())
}

pub fn show_page(page: &Page<Product>, format: ListFormat, output: &OutputManager) -> CliResult<()> {
    match format {
        ListFormat::Table => output.emit(&render_table(page))?,
        ListFormat::List => output.emit(&render_names(&page.content))?,
        ListFormat::Csv => output.emit(&render_csv(&page.content))?,
        ListFormat::Json => output.json(page)?,
    }
    Ok(())
}

/// Turn flags into a query. `--page` counts from 1; the API from 0.
pub fn build_query(args: &ListArgs, config: &AppConfig) -> CliResult<ProductQuery> {
    let mut query = ProductQuery::new()
        .with_page(args.page.saturating_sub(1))
        .with_size(args.size.unwrap_or(config.list.page_size))
        .with_sort(sort_or_default(&args.sort, config)?)
        .with_price_range(args.min_price, args.max_price)
        .with_quantity_range(args.min_quantity, args.max_quantity)
        .with_include_out_of_stock(!args.in_stock);
    if let Some(name) = &args.name {
        query = query.with_name(name.as_str());
    }
    Ok(query)
}

/// The sort keys given on the command line, else `list.sort` from config.
pub fn sort_or_default(sort: &[SortOrder], config: &AppConfig) -> CliResult<Vec<SortOrder>> {
    if !sort.is_empty() {
        return Ok(sort.to_vec());
    }
    config
        .list
        .sort
        .split(';')
        .filter(|key| !key.trim().is_empty())
        .map(|key| {
            key.trim().parse::<SortOrder>().map_err(|e| CliError::ConfigError {
                message: format!("list.sort: {e}"),
                source: Some(Box::new(e)),
            })
        })
        .collect()
}
