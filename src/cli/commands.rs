use clap::Subcommand;

use super::config::ConfigArgs;
use super::run::RunArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Attach to the browser and run the buy/sell loop
    Run(RunArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Show version and build information
    Info,
}
