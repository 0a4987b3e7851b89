//! Link and lite-stream command handlers

use crate::config::Config;
use crate::db::Store;
use crate::error::EngineError;
use crate::services::ingest::IngestService;

pub async fn cmd_link(
    config: &Config,
    show_id: i32,
    site: &str,
    key: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let ingest = IngestService::new(store);

    match ingest.link_show(show_id, site, key).await {
        Ok(()) => {
            println!("✓ Show {} linked to {} as \"{}\"", show_id, site, key);
        }
        Err(EngineError::ConflictSuppressed { .. }) => {
            println!(
                "Show {} is already linked to {}; the existing link was kept.",
                show_id, site
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

pub async fn cmd_lite(
    config: &Config,
    show_id: i32,
    name: &str,
    url: &str,
    service: Option<&str>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_show(show_id).await?.is_none() {
        println!("Show with ID {} not found.", show_id);
        return Ok(());
    }

    store.set_lite_stream(show_id, service, name, url).await?;

    let label = service.unwrap_or(name);
    println!("✓ Lite stream {} set for show {}: {}", label, show_id, url);
    Ok(())
}
