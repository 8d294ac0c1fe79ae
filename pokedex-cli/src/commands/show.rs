//! Show command - detail view for one entry.

use anyhow::{Context, Result};
use clap::Args;
use pokedex_catalog::CatalogApi;
use pokedex_store::Settings;

use super::{build_client, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Entry name or numeric id (case-insensitive).
    pub name: String,
}

/// Runs the show command.
pub async fn run(args: &ShowArgs, settings: &Settings, cli: &Cli) -> Result<()> {
    let client = build_client(settings)?;
    let entry = client
        .entry_detail(&args.name)
        .await
        .with_context(|| format!("looking up {:?}", args.name))?;

    match cli.format {
        OutputFormat::Text => println!("{}", text_formatter(cli).format_detail(&entry)),
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_detail(&entry)?);
        }
    }

    Ok(())
}
