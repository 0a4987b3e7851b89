//! Identity resolution command handler

use crate::config::Config;
use crate::db::Store;
use crate::error::EngineError;
use crate::services::resolver::{IdentityResolver, Resolution};

pub async fn cmd_resolve(
    config: &Config,
    service: &str,
    remote_key: &str,
    title: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let resolver = IdentityResolver::new(store.clone());

    match resolver.resolve(service, remote_key, title).await {
        Ok(Resolution::Bound { show_id, stream_id }) => {
            let name = store
                .get_show(show_id)
                .await?
                .map_or_else(|| format!("show {}", show_id), |s| s.name);
            println!("✓ Bound: {} (show {}, stream #{})", name, show_id, stream_id);
        }
        Ok(Resolution::Matched { show_id }) => {
            let name = store
                .get_show(show_id)
                .await?
                .map_or_else(|| format!("show {}", show_id), |s| s.name);
            println!("✓ Alias match: {} (show {})", name, show_id);
            println!("  No stream binding yet; ingesting an episode will create one.");
        }
        Err(EngineError::UnknownService { .. }) => {
            println!("Service \"{}\" is not registered or is disabled.", service);
            println!("List it in config.toml and run: kanon sync");
        }
        Err(EngineError::NotFound { .. }) => {
            println!("No show matched \"{}\" from {}.", title, service);
            println!("Register an alias with: kanon show alias <show_id> \"{}\"", title);
        }
        Err(EngineError::Ambiguous { matches, .. }) => {
            println!(
                "\"{}\" from {} matched {} shows: {:?}",
                title,
                service,
                matches.len(),
                matches
            );
            println!("Bind the right one with: kanon stream bind <show_id> {} {}", service, remote_key);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
