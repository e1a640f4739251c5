// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use nbdc2rs::cli::{Cli, Commands};
use nbdc2rs::commands;
use nbdc2rs::commands::SyncOptions;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            release,
            skip_extract,
            keep_data,
            no_validate,
            config,
            yaml,
        }) => commands::cmd_convert(
            &release,
            skip_extract,
            keep_data,
            no_validate,
            config.as_deref(),
            yaml,
        ),
        Some(Commands::Sync {
            release,
            no_commit,
            create_tag,
            push,
            keep_data,
            dry_run,
            report,
            config,
        }) => commands::cmd_sync(SyncOptions {
            release,
            no_commit,
            create_tag,
            push,
            keep_data,
            dry_run,
            report,
            config,
        }),
        Some(Commands::Releases {
            pending,
            keep_data,
            config,
        }) => commands::cmd_releases(pending, keep_data, config.as_deref()),
        Some(Commands::Doctor { config }) => commands::cmd_doctor(config.as_deref()),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            println!("nbdc2rs v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'nbdc2rs --help' for usage information");
            Ok(())
        }
    }
}
