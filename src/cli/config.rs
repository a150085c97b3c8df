use std::path::Path;

use crate::cli::context::CliContext;
use crate::cli::runtime::read_config;
use crate::config::AppConfig;
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use tokio::fs;
use tracing::info;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Parse and check the configuration file
    Validate,

    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path().to_path_buf();
    match args.action {
        ConfigAction::Show => {
            let yaml =
                serde_yaml::to_string(ctx.config()).context("serializing configuration")?;
            ctx.output().emit(ctx.config(), || {
                format!("# effective configuration ({})\n{}", path.display(), yaml)
            })?;
        }
        ConfigAction::Validate => {
            let config = if fs::try_exists(&path).await? {
                read_config(&path).await?
            } else {
                println!(
                    "No configuration file at {}; checking defaults",
                    path.display()
                );
                AppConfig::default()
            };
            config
                .validate()
                .with_context(|| format!("validating {}", path.display()))?;
            println!("Configuration file {} is valid", path.display());
        }
        ConfigAction::Init { force } => {
            if fs::try_exists(&path).await? && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            save_config_file(&path, &AppConfig::default()).await?;
            info!("Wrote default configuration to {}", path.display());
            println!("Saved configuration to {}", path.display());
        }
    }

    Ok(())
}

async fn save_config_file(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let serialized = serde_yaml::to_string(config)?;
    fs::write(path, serialized)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
