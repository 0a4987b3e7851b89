//! Episode listing command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_episodes(config: &Config, show_id: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(show) = store.get_show(show_id).await? else {
        println!("Show with ID {} not found.", show_id);
        return Ok(());
    };

    let episodes = store.episodes_for_show(show_id).await?;

    if episodes.is_empty() {
        println!("No episodes recorded for {}.", show.name);
        return Ok(());
    }

    println!("Episodes for: {}", show.name);
    println!("{:-<70}", "");

    for episode in &episodes {
        let url = episode.post_url.as_deref().unwrap_or("-");
        println!("Episode {:>4} | {}", episode.number, url);
    }

    println!();
    if show.length > 0 {
        println!("Recorded {}/{} episodes", episodes.len(), show.length);
    } else {
        println!("Recorded {} episodes (total unknown)", episodes.len());
    }

    Ok(())
}
