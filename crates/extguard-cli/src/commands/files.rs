//! File check command.

use std::path::Path;

use anyhow::anyhow;
use extguard_api_models::paths;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::cli::{CheckArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_verdict;

pub(crate) async fn handle_check(
    ctx: &AppContext,
    args: CheckArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let name = file_name(&args.path)?;
    let blocked = check_file(ctx, &args.path, &name).await?;
    info!(file = %name, blocked, "file checked");
    render_verdict(&name, blocked, output)
}

async fn check_file(ctx: &AppContext, path: &Path, name: &str) -> CliResult<bool> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read {}: {err}", path.display())))?;
    debug!(file = %name, size = bytes.len(), "uploading file for check");
    let part = Part::bytes(bytes).file_name(name.to_string());
    let form = Form::new().part(paths::FILE_FIELD, part);
    ctx.fetch(Method::POST, paths::FILE_CHECK, Some(form)).await
}

fn file_name(path: &Path) -> CliResult<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::validation(format!("{} is not a file", path.display())))
}
