//! Types command - list type names.

use anyhow::Result;
use pokedex_catalog::CatalogApi;
use pokedex_store::Settings;

use super::{build_client, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Runs the types command.
pub async fn run(settings: &Settings, cli: &Cli) -> Result<()> {
    let types = build_client(settings)?.type_names().await?;

    match cli.format {
        OutputFormat::Text => println!("{}", text_formatter(cli).format_types(&types)),
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_types(&types)?);
        }
    }

    Ok(())
}
