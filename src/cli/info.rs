use anyhow::Result;
use serde::Serialize;

use crate::cli::context::CliContext;

#[derive(Debug, Serialize)]
struct BuildInfo {
    version: &'static str,
    build_date: &'static str,
    git_commit: &'static str,
    git_branch: &'static str,
    config_path: String,
    config_found: bool,
    debugger_url: String,
    iterations: u32,
}

pub fn cmd_info(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let info = BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        git_commit: option_env!("GIT_HASH").unwrap_or("unknown"),
        git_branch: option_env!("GIT_BRANCH").unwrap_or("unknown"),
        config_path: ctx.config_path().display().to_string(),
        config_found: ctx.config_found(),
        debugger_url: config.browser.debugger_url.clone(),
        iterations: config.flow.trade.iterations,
    };

    ctx.output().emit(&info, || {
        let config_state = if info.config_found {
            ""
        } else {
            " (not found, using defaults)"
        };
        [
            "alphaloop System Information".to_string(),
            "============================".to_string(),
            format!("Version: {}", info.version),
            format!("Build Date: {}", info.build_date),
            format!("Git Commit: {} ({})", info.git_commit, info.git_branch),
            String::new(),
            "Configuration:".to_string(),
            format!("- File: {}{}", info.config_path, config_state),
            format!("- Debugger URL: {}", info.debugger_url),
            format!("- Iterations: {}", info.iterations),
        ]
        .join("\n")
    })
}
