//! Page command - fetch one filtered page.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use pokedex_core::PageQuery;
use pokedex_store::Settings;
use tracing::info;

use super::{build_assembler, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the page command.
#[derive(Args, Default)]
pub struct PageArgs {
    /// Case-insensitive substring to match names against.
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Only entries of this type.
    #[arg(long = "type", short = 't', default_value = "")]
    pub type_filter: String,

    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Entries per page (defaults to the configured page size).
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Runs the page command.
pub async fn run(args: &PageArgs, settings: &Settings, cli: &Cli) -> Result<()> {
    let page_size = args.page_size.unwrap_or(settings.page_size);
    let query = PageQuery::new(&args.search, &args.type_filter, args.page, page_size);

    info!(search = %args.search, type_filter = %args.type_filter, page = args.page, "Fetching page");

    let assembler = build_assembler(settings)?;
    let result = assembler.get_page(&query).await?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", text_formatter(cli).format_page(&result, args.page, page_size));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_page(&result, args.page, page_size, Utc::now())?
            );
        }
    }

    Ok(())
}
