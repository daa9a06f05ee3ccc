mod common;

use std::sync::Arc;

use dailyreel::{api, config::Settings};

// Building the router instantiates every middleware layer, so the auth
// middleware futures must satisfy axum's Send bounds for this to compile.
#[tokio::test]
async fn router_wires_all_routes() -> anyhow::Result<()> {
    let (_pool, ctx) = common::test_context().await?;
    let _app = api::create_app(ctx, Arc::new(Settings::default()));
    Ok(())
}
