//! Episode ingestion command handler

use crate::config::Config;
use crate::db::Store;
use crate::error::EngineError;
use crate::models::event::EpisodeEvent;
use crate::services::ingest::IngestService;

pub async fn cmd_ingest(
    config: &Config,
    service: &str,
    remote_key: &str,
    title: &str,
    episode: i32,
    url: Option<&str>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let ingest = IngestService::new(store);

    let event = EpisodeEvent {
        service_key: service.to_string(),
        remote_key: remote_key.to_string(),
        remote_title: title.to_string(),
        remote_episode: episode,
        post_url: url.map(str::to_string),
    };

    match ingest.ingest_episode(&event).await {
        Ok(outcome) => {
            let verb = if outcome.replaced { "Replaced" } else { "Recorded" };
            println!(
                "✓ {} episode {} of show {} (remote episode {} via {})",
                verb, outcome.canonical_episode, outcome.show_id, episode, service
            );
        }
        Err(EngineError::UnknownService { .. }) => {
            println!(
                "Service \"{}\" is not registered or is disabled. Nothing recorded.",
                service
            );
            println!("List it in config.toml and run: kanon sync");
        }
        Err(EngineError::NotFound { .. }) => {
            println!("No show matched \"{}\" from {}. Nothing recorded.", title, service);
            println!("Register an alias with: kanon show alias <show_id> \"{}\"", title);
        }
        Err(EngineError::Ambiguous { matches, .. }) => {
            println!(
                "\"{}\" from {} is ambiguous ({:?}). Nothing recorded.",
                title, service, matches
            );
            println!("Bind the right show with: kanon stream bind <show_id> {} {}", service, remote_key);
        }
        Err(EngineError::InvalidOffset {
            stream_id,
            canonical,
            ..
        }) => {
            println!(
                "Remote episode {} translated to canonical {} on stream #{}. Nothing recorded.",
                episode, canonical, stream_id
            );
            println!("Fix the offsets with: kanon stream bind ... --remote-offset N");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
