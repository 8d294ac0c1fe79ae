//! Config command - manage configuration.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use pokedex_store::{Settings, SettingsStore, default_config_dir};
use tracing::info;

use super::{settings_path, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a settings file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,

        /// Catalog service to point at instead of the public one.
        #[arg(long)]
        base_url: Option<String>,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, settings: &Settings, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(settings, cli),
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init { force, base_url } => {
            init_config(*force, base_url.as_deref(), cli).await
        }
    }
}

fn show_config(settings: &Settings, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("{}", text_formatter(cli).format_settings(settings));
            if let Err(e) = settings.validate() {
                println!();
                println!("Warning: {e}");
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_file = settings_path(cli);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_file.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_file.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool, base_url: Option<&str>, cli: &Cli) -> Result<()> {
    let path = settings_path(cli);

    if !force && tokio::fs::try_exists(&path).await? {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let store = SettingsStore::new(path.clone());
    if let Some(base_url) = base_url {
        store.update(|s| s.base_url = base_url.to_string()).await;
    }
    store.get().await.validate()?;
    store.save().await?;

    info!(path = %path.display(), "Settings initialized");
    println!("Wrote default settings to {}", path.display());

    Ok(())
}
