use crate::context::CliContext;
use crate::output;

pub async fn login(ctx: &CliContext, username: &str, password: &str) -> anyhow::Result<()> {
    let store = ctx.session_store()?;
    let session = ctx.anonymous_api()?.login(username, password).await?;
    store.save(&session).await?;
    output::output_success(
        serde_json::json!({
            "username": username,
            "session_file": store.path(),
            "image": session.image,
        }),
        &ctx.take_notices(),
    )
}

pub async fn logout(ctx: &CliContext) -> anyhow::Result<()> {
    let store = ctx.session_store()?;
    store.clear().await?;
    output::output_success(serde_json::json!({"logged_out": true}), &[])
}
