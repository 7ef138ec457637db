//! Fixed and custom extension commands.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::anyhow;
use chrono::Local;
use extguard_api_models::history::{build_history, filter_history};
use extguard_api_models::validation::validate_extension_input;
use extguard_api_models::{Extension, ExtensionId, paths};
use futures_util::try_join;
use reqwest::Method;
use tracing::info;

use crate::cli::{CustomAddArgs, CustomRemoveArgs, FixedTarget, HistoryArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_extension, render_extensions, render_history};

pub(crate) async fn handle_fixed_list(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let entries = fixed_list(ctx).await?;
    render_extensions(&entries, output)
}

pub(crate) async fn handle_fixed_toggle(
    ctx: &AppContext,
    args: FixedTarget,
    blocked: bool,
    output: OutputFormat,
) -> CliResult<()> {
    let id = resolve_fixed(ctx, &args.target).await?;
    let confirmed = toggle_fixed(ctx, id, blocked).await?;
    info!(id, blocked = confirmed.blocked, "fixed extension updated");
    render_extension(&confirmed, output)
}

pub(crate) async fn handle_custom_list(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let entries = custom_list(ctx).await?;
    render_extensions(&entries, output)
}

pub(crate) async fn handle_custom_add(
    ctx: &AppContext,
    args: CustomAddArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let extension = validate_extension_input(&args.extension)
        .map_err(|err| CliError::validation(err.to_string()))?;
    let created: Extension = ctx
        .fetch(Method::POST, &paths::custom_add(&extension), None)
        .await?;
    info!(id = created.id, extension = %created.extension, "custom extension added");
    render_extension(&created, output)
}

pub(crate) async fn handle_custom_remove(
    ctx: &AppContext,
    args: CustomRemoveArgs,
) -> CliResult<()> {
    if !args.yes {
        confirm_removal(args.id)?;
    }
    ctx.execute(Method::DELETE, &paths::custom_delete(args.id))
        .await?;
    info!(id = args.id, "custom extension deleted");
    println!("deleted custom extension {}", args.id);
    Ok(())
}

pub(crate) async fn handle_blocked(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let entries: Vec<Extension> = ctx.fetch(Method::GET, paths::BLOCKED, None).await?;
    render_extensions(&entries, output)
}

pub(crate) async fn handle_history(
    ctx: &AppContext,
    args: HistoryArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let history = load_history(ctx).await?;
    let visible = filter_history(&history, args.filter.into());
    render_history(&visible, Local::now().naive_local(), output)
}

async fn fixed_list(ctx: &AppContext) -> CliResult<Vec<Extension>> {
    ctx.fetch(Method::GET, paths::FIXED, None).await
}

async fn custom_list(ctx: &AppContext) -> CliResult<Vec<Extension>> {
    ctx.fetch(Method::GET, paths::CUSTOM, None).await
}

/// Both lists fetched concurrently and merged newest first.
pub(crate) async fn load_history(ctx: &AppContext) -> CliResult<Vec<Extension>> {
    let (fixed, custom) = try_join!(fixed_list(ctx), custom_list(ctx))?;
    Ok(build_history(fixed, custom))
}

async fn toggle_fixed(ctx: &AppContext, id: ExtensionId, blocked: bool) -> CliResult<Extension> {
    ctx.fetch(Method::PATCH, &paths::fixed_block(id, blocked), None)
        .await
}

/// Numeric targets are ids; anything else is looked up by name in the fixed list.
async fn resolve_fixed(ctx: &AppContext, target: &str) -> CliResult<ExtensionId> {
    if let Ok(id) = target.trim().parse::<ExtensionId>() {
        return Ok(id);
    }
    let name =
        validate_extension_input(target).map_err(|err| CliError::validation(err.to_string()))?;
    let entries = fixed_list(ctx).await?;
    find_by_name(&entries, &name)
        .ok_or_else(|| CliError::validation(format!("no fixed extension named .{name}")))
}

fn find_by_name(entries: &[Extension], name: &str) -> Option<ExtensionId> {
    entries
        .iter()
        .find(|entry| entry.extension.eq_ignore_ascii_case(name))
        .map(|entry| entry.id)
}

fn confirm_removal(id: ExtensionId) -> CliResult<()> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::validation(
            "refusing to delete without confirmation; pass --yes",
        ));
    }
    eprint!("delete custom extension {id}? [y/N] ");
    io::stderr()
        .flush()
        .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))?;
    let mut answer = String::new();
    stdin
        .lock()
        .read_line(&mut answer)
        .map_err(|err| CliError::failure(anyhow!("failed to read confirmation: {err}")))?;
    if is_affirmative(&answer) {
        Ok(())
    } else {
        Err(CliError::validation("deletion cancelled"))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
