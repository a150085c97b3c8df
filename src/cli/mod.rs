pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod info;
pub mod output;
pub mod run;
pub mod runtime;

pub use config::{cmd_config, ConfigArgs};
pub use info::cmd_info;
pub use run::{cmd_run, RunArgs};
