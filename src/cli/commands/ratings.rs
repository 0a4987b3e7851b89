//! Score and poll command handlers

use crate::config::Config;
use crate::db::Store;
use crate::models::event::{PollEvent, ScoreEvent};
use crate::services::ingest::IngestService;

pub async fn cmd_score(
    config: &Config,
    show_id: i32,
    episode: i32,
    site: &str,
    score: f64,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let ingest = IngestService::new(store);

    let event = ScoreEvent {
        show_id,
        episode,
        site_key: site.to_string(),
        score,
    };
    ingest.ingest_score(&event).await?;

    println!(
        "✓ Score {} recorded for show {} episode {} from {}",
        score, show_id, episode, site
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_poll(
    config: &Config,
    show_id: i32,
    episode: i32,
    site: &str,
    poll_id: &str,
    timestamp: Option<i64>,
    score: Option<f64>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let ingest = IngestService::new(store);

    let event = PollEvent {
        show_id,
        episode,
        poll_site_key: site.to_string(),
        poll_id: poll_id.to_string(),
        timestamp,
        score,
    };
    ingest.ingest_poll(&event).await?;

    println!(
        "✓ Poll {} recorded for show {} episode {} from {}",
        poll_id, show_id, episode, site
    );
    if score.is_none() {
        println!(
            "  No tally yet; land it later with: kanon tally {} {} {} <score>",
            show_id, episode, site
        );
    }
    Ok(())
}

pub async fn cmd_tally(
    config: &Config,
    show_id: i32,
    episode: i32,
    site: &str,
    score: f64,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let ingest = IngestService::new(store);

    ingest.tally_poll(show_id, episode, site, score).await?;

    println!(
        "✓ Tally {} recorded for the {} poll on show {} episode {}",
        score, site, show_id, episode
    );
    Ok(())
}

pub async fn cmd_ratings(config: &Config, show_id: i32, episode: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let ratings = store.ratings_for_episode(show_id, episode).await?;

    if ratings.scores.is_empty() && ratings.polls.is_empty() {
        println!("No ratings recorded for show {} episode {}.", show_id, episode);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&ratings)?);
    Ok(())
}
