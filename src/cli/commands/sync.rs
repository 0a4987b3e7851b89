//! Registry sync command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::registry::HandlerDef;

pub async fn cmd_sync(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let services: Vec<HandlerDef> = config
        .services
        .iter()
        .map(|e| HandlerDef::new(&e.key, &e.name))
        .collect();
    let link_sites: Vec<HandlerDef> = config
        .link_sites
        .iter()
        .map(|e| HandlerDef::new(&e.key, &e.name))
        .collect();
    let poll_sites: Vec<&str> = config.poll_sites.iter().map(String::as_str).collect();

    store.sync_services(&services).await?;
    store.sync_link_sites(&link_sites).await?;
    store.sync_poll_sites(&poll_sites).await?;

    println!(
        "✓ Registry synced: {} services, {} link sites, {} poll sites",
        services.len(),
        link_sites.len(),
        poll_sites.len()
    );
    println!("  Anything not listed in config.toml is now disabled.");

    Ok(())
}
