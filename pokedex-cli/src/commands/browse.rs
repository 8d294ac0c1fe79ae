//! Browse command - accumulate pages like an infinite-scrolling list.

use anyhow::{Result, bail};
use clap::Args;
use pokedex_store::{Phase, SearchSession, SearchState, Settings};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{build_assembler, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Case-insensitive substring to match names against.
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Only entries of this type.
    #[arg(long = "type", short = 't', default_value = "")]
    pub type_filter: String,

    /// Number of pages to load.
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    pub pages: usize,

    /// Keep loading until no pages remain.
    #[arg(long)]
    pub all: bool,

    /// Entries per page (defaults to the configured page size).
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl BrowseArgs {
    fn page_limit(&self) -> Option<usize> {
        (!self.all).then_some(self.pages.max(1))
    }
}

/// Runs the browse command.
pub async fn run(args: &BrowseArgs, settings: &Settings, cli: &Cli) -> Result<()> {
    let page_size = args.page_size.unwrap_or(settings.page_size);
    let session = SearchSession::new(build_assembler(settings)?, page_size);

    info!(search = %args.search, type_filter = %args.type_filter, "Browsing");

    let first = session.set_filters(&args.search, &args.type_filter).await;
    let state = drive(&session, first, args.page_limit()).await?;

    match cli.format {
        OutputFormat::Text => println!("{}", text_formatter(cli).format_browse(&state)),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_browse(&state, session.last_settled().await)?
            );
        }
    }

    if let (Phase::Error, Some(error)) = (state.phase, &state.error) {
        bail!("{error}");
    }
    Ok(())
}

/// Awaits each request and asks for the next page until `limit` pages are
/// loaded, the filter is exhausted, or a request fails.
async fn drive(
    session: &SearchSession,
    first: Option<JoinHandle<()>>,
    limit: Option<usize>,
) -> Result<SearchState> {
    let mut pending = first;

    while let Some(task) = pending.take() {
        task.await?;

        let state = session.snapshot().await;
        let loaded = state.current_page + 1;
        debug!(loaded, total = state.total_count, phase = ?state.phase, "Page settled");

        if limit.is_some_and(|limit| loaded >= limit) {
            break;
        }
        pending = session.load_more().await;
    }

    Ok(session.snapshot().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_pages_and_all_conflict() {
        let result = crate::Cli::try_parse_from(["pokedex", "browse", "--pages", "3", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_page_limit() {
        let cli = crate::Cli::parse_from(["pokedex", "browse", "--type", "fire", "--all"]);
        let Some(crate::Commands::Browse(args)) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.type_filter, "fire");
        assert_eq!(args.page_limit(), None);

        let cli = crate::Cli::parse_from(["pokedex", "browse", "--pages", "0"]);
        let Some(crate::Commands::Browse(args)) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.page_limit(), Some(1));
    }
}
