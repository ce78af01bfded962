mod cli;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use cli::Cli;
use course_discovery::discovery::{DiscoveryController, HttpCourseApi, LoadOutcome};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("course_discovery=info")),
        )
        .init();

    let args = Cli::parse();
    let config = args.load_config().context("reading configuration")?;
    info!("Using course API at {}", config.base_url);

    let api = HttpCourseApi::new(&config).context("building HTTP client")?;
    let controller =
        DiscoveryController::with_query(Arc::new(api), config.page_size, args.query_params());

    match controller.mount().await {
        LoadOutcome::Applied { count } => info!("Loaded {count} courses"),
        LoadOutcome::Failed(e) => bail!("{} ({})", e.user_message(), e),
        other => bail!("load did not complete: {other:?}"),
    }

    let state = controller.lock().await;
    let output = json!({
        "query": state.query().to_query_string(),
        "page": state.current_page(),
        "page_size": state.page_size(),
        "sort": state.sort().to_string(),
        "total_pages": state.total_pages(),
        "range": state.page_range().map(|r| r.to_string()),
        "window": state.page_window(),
        "courses": state.current_page_items(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if state.filtered().is_empty() {
        info!("No courses found that match your criteria");
    }

    Ok(())
}
