//! Argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use extguard_api_models::history::HistoryFilter;
use extguard_api_models::paths::DEFAULT_API_BASE;
use reqwest::Url;
use std::path::PathBuf;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, parse_url};
use crate::commands::extensions::{
    handle_blocked, handle_custom_add, handle_custom_list, handle_custom_remove,
    handle_fixed_list, handle_fixed_toggle, handle_history,
};
use crate::commands::files::handle_check;
use crate::commands::session::{handle_logout, handle_whoami};
use crate::telemetry::{LoggingConfig, init_logging};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        eprintln!("warning: {err:#}");
    }
    execute(cli).await
}

pub(crate) async fn execute(cli: Cli) -> i32 {
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("command", command = command_name, trace_id = %trace_id);

    let result = async {
        let ctx = AppContext::from_cli(&cli, &trace_id)?;
        dispatch(cli, &ctx).await
    }
    .instrument(span.clone())
    .await;
    let _entered = span.enter();

    match result {
        Ok(()) => {
            tracing::debug!("command succeeded");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

async fn dispatch(cli: Cli, ctx: &AppContext) -> CliResult<()> {
    let output = cli.output;
    match cli.command {
        Command::Whoami => handle_whoami(ctx, output).await,
        Command::Logout => handle_logout(ctx).await,
        Command::Fixed(fixed) => match fixed {
            FixedCommand::Ls => handle_fixed_list(ctx, output).await,
            FixedCommand::Block(args) => handle_fixed_toggle(ctx, args, true, output).await,
            FixedCommand::Unblock(args) => handle_fixed_toggle(ctx, args, false, output).await,
        },
        Command::Custom(custom) => match custom {
            CustomCommand::Ls => handle_custom_list(ctx, output).await,
            CustomCommand::Add(args) => handle_custom_add(ctx, args, output).await,
            CustomCommand::Rm(args) => handle_custom_remove(ctx, args).await,
        },
        Command::Blocked => handle_blocked(ctx, output).await,
        Command::History(args) => handle_history(ctx, args, output).await,
        Command::Check(args) => handle_check(ctx, args, output).await,
    }
}

#[derive(Parser)]
#[command(
    name = "extguard",
    about = "Manage the file-extension block list from the command line"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "EXTGUARD_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_BASE
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "EXTGUARD_SESSION",
        help = "JSESSIONID of a signed-in browser session"
    )]
    pub(crate) session: Option<String>,
    #[arg(
        long,
        global = true,
        env = "EXTGUARD_CSRF_TOKEN",
        help = "XSRF token to echo; fetched from the backend when omitted"
    )]
    pub(crate) csrf_token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "EXTGUARD_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Show the signed-in user.
    Whoami,
    /// End the session.
    Logout,
    /// Fixed extensions.
    #[command(subcommand)]
    Fixed(FixedCommand),
    /// Custom extensions.
    #[command(subcommand)]
    Custom(CustomCommand),
    /// Every extension that currently blocks uploads.
    Blocked,
    /// Recently changed extensions, newest first.
    History(HistoryArgs),
    /// Ask the backend whether a file would be blocked.
    Check(CheckArgs),
}

#[derive(Subcommand)]
pub(crate) enum FixedCommand {
    /// List fixed extensions.
    Ls,
    /// Block a fixed extension.
    Block(FixedTarget),
    /// Unblock a fixed extension.
    Unblock(FixedTarget),
}

#[derive(Subcommand)]
pub(crate) enum CustomCommand {
    /// List custom extensions.
    Ls,
    /// Add a custom extension.
    Add(CustomAddArgs),
    /// Delete a custom extension.
    Rm(CustomRemoveArgs),
}

#[derive(Args)]
pub(crate) struct FixedTarget {
    #[arg(help = "Extension name (with or without the dot) or numeric id")]
    pub(crate) target: String,
}

#[derive(Args)]
pub(crate) struct CustomAddArgs {
    #[arg(help = "Extension to block, e.g. sh or .sh")]
    pub(crate) extension: String,
}

#[derive(Args)]
pub(crate) struct CustomRemoveArgs {
    #[arg(help = "Custom extension id")]
    pub(crate) id: i64,
    #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct HistoryArgs {
    #[arg(long, value_enum, default_value_t = FilterArg::All)]
    pub(crate) filter: FilterArg,
}

#[derive(Args)]
pub(crate) struct CheckArgs {
    #[arg(help = "File to check")]
    pub(crate) path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FilterArg {
    All,
    Fixed,
    Custom,
    Blocked,
}

impl From<FilterArg> for HistoryFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Self::All,
            FilterArg::Fixed => Self::Fixed,
            FilterArg::Custom => Self::Custom,
            FilterArg::Blocked => Self::Blocked,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Whoami => "whoami",
        Command::Logout => "logout",
        Command::Fixed(FixedCommand::Ls) => "fixed_ls",
        Command::Fixed(FixedCommand::Block(_)) => "fixed_block",
        Command::Fixed(FixedCommand::Unblock(_)) => "fixed_unblock",
        Command::Custom(CustomCommand::Ls) => "custom_ls",
        Command::Custom(CustomCommand::Add(_)) => "custom_add",
        Command::Custom(CustomCommand::Rm(_)) => "custom_rm",
        Command::Blocked => "blocked",
        Command::History(_) => "history",
        Command::Check(_) => "check",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn globals_parse_after_subcommands() {
        let cli = Cli::try_parse_from([
            "extguard",
            "history",
            "--filter",
            "blocked",
            "--output",
            "json",
            "--api-url",
            "http://example.test/api",
        ])
        .expect("parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.api_url.as_str(), "http://example.test/api");
        match cli.command {
            Command::History(args) => assert_eq!(args.filter, FilterArg::Blocked),
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn custom_rm_requires_numeric_id() {
        assert!(Cli::try_parse_from(["extguard", "custom", "rm", "zip"]).is_err());
        let cli = Cli::try_parse_from(["extguard", "custom", "rm", "7", "--yes"]).expect("parse");
        assert_eq!(command_label(&cli.command), "custom_rm");
    }

    #[tokio::test]
    async fn unauthorized_responses_exit_with_four() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/extensions/fixed");
            then.status(401).body("");
        });
        let base = server.url("/api");
        let cli = Cli::try_parse_from(["extguard", "--api-url", base.as_str(), "fixed", "ls"])
            .expect("parse");

        assert_eq!(execute(cli).await, 4);
        list.assert();
    }

    #[tokio::test]
    async fn server_errors_exit_with_three() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let blocked = server.mock(|when, then| {
            when.method(GET).path("/api/extensions/blocked");
            then.status(502).body("bad gateway");
        });
        let base = server.url("/api");
        let cli = Cli::try_parse_from(["extguard", "--api-url", base.as_str(), "blocked"])
            .expect("parse");

        assert_eq!(execute(cli).await, 3);
        blocked.assert();
    }

    #[tokio::test]
    async fn local_validation_exits_with_two() {
        let cli = Cli::try_parse_from([
            "extguard",
            "--api-url",
            "http://127.0.0.1:9/api",
            "custom",
            "add",
            "not valid!",
        ])
        .expect("parse");
        assert_eq!(execute(cli).await, 2);
    }

    #[test]
    fn filter_args_map_to_history_filters() {
        assert_eq!(HistoryFilter::from(FilterArg::Custom), HistoryFilter::Custom);
        assert_eq!(HistoryFilter::from(FilterArg::All), HistoryFilter::All);
    }
}
