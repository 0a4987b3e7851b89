//! Show catalog command handlers

use crate::config::Config;
use crate::db::Store;
use crate::models::show::{NewShow, ShowType};

#[allow(clippy::too_many_arguments)]
pub async fn cmd_show_add(
    config: &Config,
    name: &str,
    name_en: Option<&str>,
    length: i32,
    show_type: Option<&str>,
    more_names: &[String],
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let new = NewShow {
        name: name.to_string(),
        name_en: name_en.map(str::to_string),
        more_names: more_names.to_vec(),
        show_type: show_type.map(|s| s.parse().unwrap_or(ShowType::Unknown)),
        length,
        has_source: false,
        is_nsfw: false,
    };

    let show_id = store.add_show(&new).await?;

    println!("✓ Added: {} (ID: {})", name, show_id);
    if !more_names.is_empty() {
        println!("  Also known as: {}", more_names.join(", "));
    }
    println!();
    println!("Bind a stream with: kanon stream bind {show_id} <service> <remote_key>");

    Ok(())
}

pub async fn cmd_show_list(config: &Config, disabled: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let shows = store.list_shows(!disabled).await?;

    if shows.is_empty() {
        if disabled {
            println!("No disabled shows.");
        } else {
            println!("No shows in the catalog.");
            println!();
            println!("Add one with: kanon show add \"show name\"");
        }
        return Ok(());
    }

    let heading = if disabled { "Disabled" } else { "Tracked" };
    println!("{} Shows ({} total)", heading, shows.len());
    println!("{:-<70}", "");

    for show in shows {
        let len = if show.length == 0 {
            "? eps".to_string()
        } else {
            format!("{} eps", show.length)
        };
        let delayed = if show.delayed { " [DELAYED]" } else { "" };

        println!("• {} ({}){}", show.name, len, delayed);
        println!(
            "  ID: {} | Type: {} | Aliases: {}",
            show.id,
            show.show_type,
            show.aliases.len()
        );
    }

    Ok(())
}

pub async fn cmd_show_info(config: &Config, show_id: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(show) = store.get_show(show_id).await? else {
        println!("Show with ID {} not found.", show_id);
        return Ok(());
    };

    println!("Show Info");
    println!("{:-<60}", "");
    println!("Title:    {}", show.name);
    if let Some(en) = &show.name_en {
        println!("English:  {}", en);
    }
    println!("ID:       {}", show.id);
    println!("Type:     {}", show.show_type);
    println!(
        "Episodes: {}",
        if show.length == 0 {
            "?".to_string()
        } else {
            show.length.to_string()
        }
    );
    println!(
        "Status:   {}{}",
        if show.enabled { "enabled" } else { "disabled" },
        if show.delayed { " (delayed)" } else { "" }
    );

    if !show.aliases.is_empty() {
        println!();
        println!("Aliases:");
        for alias in &show.aliases {
            println!("  • {}", alias);
        }
    }

    let streams = store.streams_for_show(show_id, true).await?;
    if !streams.is_empty() {
        println!();
        println!("Active Streams:");
        for stream in streams {
            let name = stream.name.as_deref().unwrap_or("(no name)");
            println!(
                "  #{} service {} as \"{}\" ({}) offsets {}/{}",
                stream.id,
                stream.service_id,
                stream.remote_key,
                name,
                stream.remote_offset,
                stream.display_offset
            );
        }
    }

    let lites = store.lite_streams_for_show(show_id).await?;
    if !lites.is_empty() {
        println!();
        println!("Lite Streams:");
        for lite in lites {
            let url = lite.url.as_deref().unwrap_or("-");
            println!("  {} ({}): {}", lite.service, lite.service_name, url);
        }
    }

    let links = store.links_for_show(show_id).await?;
    if !links.is_empty() {
        println!();
        println!("Links:");
        for link in links {
            println!("  site {} -> {}", link.site_id, link.site_key);
        }
    }

    if let Some(latest) = store.latest_episode(show_id).await? {
        println!();
        println!("Latest episode: {}", latest.number);
    }

    Ok(())
}

pub async fn cmd_show_alias(config: &Config, show_id: i32, alias: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_show(show_id).await?.is_none() {
        println!("Show with ID {} not found.", show_id);
        return Ok(());
    }

    if store.add_alias(show_id, alias).await? {
        println!("✓ Alias \"{}\" added to show {}", alias, show_id);
    } else {
        println!("Alias \"{}\" already registered for show {}", alias, show_id);
    }

    Ok(())
}

pub async fn cmd_show_set_length(config: &Config, show_id: i32, length: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    store.set_show_length(show_id, length).await?;
    println!("✓ Show {} length set to {}", show_id, length);
    Ok(())
}

pub async fn cmd_show_enable(config: &Config, show_id: i32, enabled: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    store.set_show_enabled(show_id, enabled).await?;
    println!(
        "✓ Show {} {}",
        show_id,
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub async fn cmd_show_delay(config: &Config, show_id: i32, delayed: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    store.set_show_delayed(show_id, delayed).await?;
    println!(
        "✓ Show {} {}",
        show_id,
        if delayed {
            "marked delayed"
        } else {
            "no longer delayed"
        }
    );
    Ok(())
}

pub async fn cmd_show_remove(config: &Config, show_id: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(show) = store.get_show(show_id).await? else {
        println!("Show with ID {} not found.", show_id);
        return Ok(());
    };

    println!("Remove '{}' (ID: {}) and all its records?", show.name, show.id);
    println!("Enter 'y' to confirm, anything else to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim().eq_ignore_ascii_case("y") {
        if store.remove_show(show_id).await? {
            println!("✓ Removed: {}", show.name);
        } else {
            println!("Failed to remove show.");
        }
    } else {
        println!("Cancelled.");
    }

    Ok(())
}

pub async fn cmd_show_report(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    println!("Curation Report");
    println!("{:-<70}", "");

    let missing_length = store.list_shows_missing_length().await?;
    println!("Shows without an episode count ({}):", missing_length.len());
    for show in missing_length {
        println!("  • {} (ID: {})", show.name, show.id);
    }

    let missing_stream = store.list_shows_missing_stream().await?;
    println!();
    println!(
        "Shows without an active stream on an enabled service ({}):",
        missing_stream.len()
    );
    for show in missing_stream {
        println!("  • {} (ID: {})", show.name, show.id);
    }

    let delayed = store.list_delayed_shows().await?;
    println!();
    println!("Delayed shows ({}):", delayed.len());
    for show in delayed {
        println!("  • {} (ID: {})", show.name, show.id);
    }

    let nameless = store.streams_missing_name(true).await?;
    println!();
    println!("Active streams without a service-native name ({}):", nameless.len());
    for stream in nameless {
        println!(
            "  • stream #{} ({}@service {})",
            stream.id, stream.remote_key, stream.service_id
        );
    }

    let open_polls = store.polls_missing_score().await?;
    println!();
    println!("Polls without a recorded tally ({}):", open_polls.len());
    for poll in open_polls {
        println!(
            "  • show {} episode {} on site {}",
            poll.show_id, poll.episode, poll.poll_site_id
        );
    }

    Ok(())
}
