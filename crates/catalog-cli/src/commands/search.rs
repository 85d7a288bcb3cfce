//! Implementation of the `catalog search` command.
//!
//! Each line read from stdin is a search term. Terms typed in quick
//! succession are coalesced, so only the last one of a burst reaches the
//! backend.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use catalog_adapters::SearchDebouncer;
use catalog_core::application::{ApplicationError, ProductService};
use catalog_core::domain::ProductQuery;

use crate::{
    cli::SearchArgs,
    commands::list::sort_or_default,
    config::AppConfig,
    error::{CliError, CliResult, ErrorCategory},
    output::{OutputManager, render_table},
};

const INPUT_BUFFER: usize = 16;

pub async fn execute(
    args: SearchArgs,
    service: &ProductService,
    config: &AppConfig,
    output: &OutputManager,
    cancel: CancellationToken,
) -> CliResult<()> {
    output.print("Type a product name; an empty line shows everything. Ctrl-D to finish.")?;
    let input = BufReader::new(tokio::io::stdin());
    let searches = run(input, &args, service, config, output, cancel).await?;
    debug!(searches, "Search finished");
    Ok(())
}

/// Search for every debounced term read from `input`. Returns how many
/// searches were run.
///
/// A failed search is reported and the loop keeps going; only
/// cancellation ends it early.
#[instrument(skip_all)]
pub async fn run<R>(
    input: R,
    args: &SearchArgs,
    service: &ProductService,
    config: &AppConfig,
    output: &OutputManager,
    cancel: CancellationToken,
) -> CliResult<usize>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let base = ProductQuery::new()
        .with_size(args.size.unwrap_or(config.list.page_size))
        .with_sort(sort_or_default(&args.sort, config)?)
        .with_include_out_of_stock(!args.in_stock);
    let quiet = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.debounce());

    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    tokio::spawn(forward_lines(input, tx, cancel.clone()));
    let mut terms = SearchDebouncer::new(quiet)
        .with_cancellation(cancel.clone())
        .spawn(rx);

    let mut searches = 0;
    while let Some(term) = terms.recv().await {
        debug!(%term, "Searching");
        searches += 1;
        let query = base.clone().with_name(term.as_str());

        match service.list(&query).await {
            Ok(page) => {
                if output.is_json() {
                    output.json(&page)?;
                } else {
                    output.header(&format!("Results for \"{}\"", term.trim()))?;
                    output.emit(&render_table(&page))?;
                }
            }
            Err(err) => {
                let err = CliError::from(err);
                if err.category() == ErrorCategory::Cancelled {
                    return Err(err);
                }
                err.log();
                output.error(&err.to_string())?;
                for line in err.details() {
                    output.error(&format!("  {line}"))?;
                }
            }
        }
    }

    if cancel.is_cancelled() {
        return Err(ApplicationError::Cancelled.into());
    }
    Ok(searches)
}

async fn forward_lines<R>(input: R, tx: mpsc::Sender<String>, cancel: CancellationToken)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read search input");
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use catalog_adapters::MemoryGateway;
    use catalog_core::domain::Product;

    fn args() -> SearchArgs {
        SearchArgs {
            size: None,
            sort: Vec::new(),
            in_stock: false,
            debounce_ms: Some(20),
        }
    }

    fn product(name: &str) -> Product {
        Product {
            public_id: None,
            name: name.into(),
            price: 9.5,
            quantity: 3,
            description: None,
        }
    }

    fn search(
        gateway: &MemoryGateway,
        input: impl Into<Vec<u8>>,
        cancel: CancellationToken,
    ) -> CliResult<usize> {
        let service = ProductService::new(Box::new(gateway.clone()));
        let config = AppConfig::default();
        let output = OutputManager::new(&Default::default(), &config);
        let input = Cursor::new(input.into());
        tokio_test::block_on(run(input, &args(), &service, &config, &output, cancel))
    }

    #[test]
    fn burst_of_terms_runs_one_search() {
        let gateway = MemoryGateway::with_products([product("Desk lamp"), product("Chair")]);
        let searches = search(&gateway, "l\nla\nlam\nlamp\n", CancellationToken::new()).unwrap();
        assert_eq!(searches, 1);
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn empty_input_runs_nothing() {
        let gateway = MemoryGateway::new();
        assert_eq!(search(&gateway, "", CancellationToken::new()).unwrap(), 0);
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn rejected_term_does_not_end_the_session() {
        let gateway = MemoryGateway::new();
        let too_long = format!("{}\n", "x".repeat(80));
        let searches = search(&gateway, too_long, CancellationToken::new()).unwrap();
        assert_eq!(searches, 1);
        // The overlong filter never reached the gateway.
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn cancelled_session_is_reported() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = search(&MemoryGateway::new(), "lamp\n", cancel).unwrap_err();
        assert_eq!(err.exit_code(), 130);
    }
}
