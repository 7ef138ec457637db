//! Session commands.

use extguard_api_models::{UserProfile, paths};
use reqwest::Method;
use tracing::info;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult, decode};
use crate::output::render_profile;

pub(crate) async fn handle_whoami(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let profile = current_user(ctx)
        .await?
        .ok_or_else(|| CliError::unauthorized("not signed in"))?;
    render_profile(&profile, output)
}

pub(crate) async fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.execute(Method::POST, paths::LOGOUT).await?;
    info!("session ended");
    println!("signed out");
    Ok(())
}

/// `None` when the backend answers without a user.
async fn current_user(ctx: &AppContext) -> CliResult<Option<UserProfile>> {
    let (status, body) = ctx.send(Method::GET, paths::CURRENT_USER, None).await?;
    decode(status, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn current_user_decodes_the_profile() {
        let server = MockServer::start_async().await;
        let me = server.mock(|when, then| {
            when.method(GET)
                .path("/api/user/me")
                .header("x-request-id", "test-trace");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"name": "Kim", "email": "kim@example.com"}
            }));
        });

        let ctx = context_for(&server, None);
        let profile = current_user(&ctx).await.expect("request").expect("profile");
        me.assert();
        assert_eq!(profile.name, "Kim");
        assert_eq!(profile.email.as_deref(), Some("kim@example.com"));
    }

    #[tokio::test]
    async fn empty_session_reads_as_signed_out() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/user/me");
            then.status(200).body("");
        });

        let ctx = context_for(&server, None);
        let err = handle_whoami(&ctx, OutputFormat::Table).await.err();
        assert!(matches!(err, Some(CliError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn logout_posts_with_the_token() {
        let server = MockServer::start_async().await;
        let logout = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/logout")
                .header("x-xsrf-token", "tok");
            then.status(200).body("");
        });

        let ctx = context_for(&server, Some("tok"));
        handle_logout(&ctx).await.expect("logout");
        logout.assert();
    }
}
