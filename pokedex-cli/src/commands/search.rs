//! Search command - read search terms from stdin, one per line, and show
//! results once typing settles.

use anyhow::Result;
use clap::Args;
use pokedex_store::{SearchDebouncer, SearchSession, SearchState, Settings};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::{build_assembler, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Only entries of this type.
    #[arg(long = "type", short = 't', default_value = "")]
    pub type_filter: String,

    /// Entries per page (defaults to the configured page size).
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Runs the search command.
///
/// Each line read is treated as the current contents of a search box. Lines
/// arriving faster than the configured debounce window replace each other,
/// and only the settled term is searched.
pub async fn run(args: &SearchArgs, settings: &Settings, cli: &Cli) -> Result<()> {
    let page_size = args.page_size.unwrap_or(settings.page_size);
    let session = SearchSession::new(build_assembler(settings)?, page_size);
    let mut updates = session.subscribe();

    info!(
        type_filter = %args.type_filter,
        debounce_ms = settings.debounce_ms,
        "Reading search terms from stdin"
    );

    // First page for the type filter alone; its completion shows up below.
    drop(session.set_filters("", &args.type_filter).await);

    let debouncer = SearchDebouncer::spawn(session.clone(), settings.debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(term) => debouncer.input(term),
                None => break,
            },
            changed = updates.changed() => {
                changed?;
                let state = updates.borrow_and_update().clone();
                shown = show_settled(&state, shown, cli)?;
            }
        }
    }

    debouncer.close().await;
    let state = updates.wait_for(|state| !state.loading()).await?.clone();
    show_settled(&state, shown, cli)?;

    Ok(())
}

/// Prints `state` if it settled a request newer than generation `shown`.
/// Returns the latest generation printed.
fn show_settled(state: &SearchState, shown: u64, cli: &Cli) -> Result<u64> {
    if state.loading() || state.generation <= shown {
        return Ok(shown);
    }

    match cli.format {
        OutputFormat::Text => println!("{}\n", text_formatter(cli).format_browse(state)),
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_browse(state, None)?);
        }
    }

    Ok(state.generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pokedex_store::{Phase, SearchEvent, reduce};

    #[test]
    fn test_parse_search_args() {
        let cli = Cli::parse_from(["pokedex", "search", "--type", "fire"]);
        let Some(crate::Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.type_filter, "fire");
        assert_eq!(args.page_size, None);
    }

    #[test]
    fn test_show_settled_skips_loading_and_repeats() {
        let cli = Cli::parse_from(["pokedex", "--no-color", "search"]);

        let loading = reduce(SearchState::new(20), SearchEvent::filter_changed("pika", ""));
        assert_eq!(show_settled(&loading, 0, &cli).unwrap(), 0);

        let mut settled = loading;
        settled.phase = Phase::Ready;
        assert_eq!(show_settled(&settled, 0, &cli).unwrap(), 1);
        assert_eq!(show_settled(&settled, 1, &cli).unwrap(), 1);
    }
}
