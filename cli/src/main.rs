use std::process::ExitCode;

use clap::{Parser, Subcommand};
use error_stack::{Result, ResultExt};
use stkr_cli::{
    load_environment_variables, publish, replay, stkr_cli_style, CliError, DotenvOptions,
    ReportExt,
};
use stkr_observability::init_tracing;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, styles = stkr_cli_style())]
struct Cli {
    #[command(subcommand)]
    subcommand: Command,
    #[command(flatten)]
    dotenv: DotenvOptions,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish the sticker designs listed in a file, one forge script run each.
    Publish(publish::PublishArgs),
    /// Replay an event log into the entity database.
    Replay(replay::ReplayArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    run_with_args(Cli::parse()).await.to_exit_code()
}

async fn run_with_args(args: Cli) -> Result<(), CliError> {
    init_tracing()
        .change_context(CliError::Configuration)
        .attach_printable("failed to initialize tracing")?;

    load_environment_variables(&args.dotenv)?;

    match args.subcommand {
        Command::Publish(args) => publish::run(args).await,
        Command::Replay(args) => replay::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_env_file_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stkr",
            "publish",
            "--input",
            "stickers.json",
            "--env-file",
            ".env.staging",
        ])
        .unwrap();

        assert_eq!(
            cli.dotenv.env_file.as_deref(),
            Some(std::path::Path::new(".env.staging"))
        );
        assert!(matches!(cli.subcommand, Command::Publish(_)));
    }
}
