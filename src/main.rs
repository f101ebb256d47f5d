//! CLI entry point for the bookshelf tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;

use app_config::{VerbositySetting, load_default_file_config};
use cli::{Cli, Command};
use commands::RunContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();
    let loaded_config = load_default_file_config()?;
    let file_config = loaded_config.file_config();

    init_tracing(&cli, file_config.verbosity);
    debug!(?cli, config_loaded = loaded_config.loaded_from_file, "CLI arguments parsed");

    let ctx = RunContext::resolve(cli.db.as_deref(), &file_config)?;

    match &cli.command {
        Command::Extract(args) => commands::run_extract_command(args, &ctx).await,
        Command::Add(args) => commands::run_add_command(args, &ctx).await,
        Command::Analyze { id } => commands::run_analyze_command(*id, &ctx).await,
        Command::List(args) => commands::run_list_command(args, &ctx).await,
        Command::Show { id, json } => commands::run_show_command(*id, *json, &ctx).await,
        Command::Edit(args) => commands::run_edit_command(args, &ctx).await,
        Command::Favorite { id } => commands::run_favorite_command(*id, &ctx).await,
        Command::Remove { id } => commands::run_remove_command(*id, &ctx).await,
        Command::Config => commands::run_config_show_command(&loaded_config, &ctx),
    }
}

/// Installs the stderr log subscriber.
///
/// Priority: `RUST_LOG` env var > quiet flag > verbose flag > config
/// verbosity > default (info).
fn init_tracing(cli: &Cli, config_verbosity: Option<VerbositySetting>) {
    let default_level = default_log_level(cli.quiet, cli.verbose, config_verbosity);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_log_level(
    quiet: bool,
    verbose: u8,
    config_verbosity: Option<VerbositySetting>,
) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => config_verbosity.map_or("info", VerbositySetting::filter_level),
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_flag_wins() {
        assert_eq!(
            default_log_level(true, 2, Some(VerbositySetting::Debug)),
            "error"
        );
    }

    #[test]
    fn test_verbose_flag_beats_config() {
        assert_eq!(
            default_log_level(false, 1, Some(VerbositySetting::Quiet)),
            "debug"
        );
        assert_eq!(default_log_level(false, 3, None), "trace");
    }

    #[test]
    fn test_config_verbosity_applies_without_flags() {
        assert_eq!(
            default_log_level(false, 0, Some(VerbositySetting::Quiet)),
            "error"
        );
        assert_eq!(default_log_level(false, 0, None), "info");
    }
}
