//! Stream binding command handlers

use crate::config::Config;
use crate::db::Store;
use crate::models::stream::StreamBinding;

#[allow(clippy::too_many_arguments)]
pub async fn cmd_stream_bind(
    config: &Config,
    show_id: i32,
    service: &str,
    remote_key: &str,
    name: Option<&str>,
    remote_id: Option<&str>,
    remote_offset: i32,
    display_offset: i32,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_show(show_id).await?.is_none() {
        println!("Show with ID {} not found.", show_id);
        return Ok(());
    }

    let binding = StreamBinding {
        show_id,
        remote_key: remote_key.to_string(),
        remote_id: remote_id.map(str::to_string),
        name: name.map(str::to_string),
        remote_offset,
        display_offset,
    };

    let stream_id = store.bind_stream(service, &binding).await?;

    println!(
        "✓ Stream #{}: show {} bound to {}@{}",
        stream_id, show_id, remote_key, service
    );
    if remote_offset != 0 || display_offset != 0 {
        println!("  Offsets: remote {} / display {}", remote_offset, display_offset);
    }

    Ok(())
}

pub async fn cmd_stream_list(config: &Config, show_id: i32, inactive: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let streams = store.streams_for_show(show_id, !inactive).await?;

    if streams.is_empty() {
        println!(
            "No {} streams for show {}.",
            if inactive { "inactive" } else { "active" },
            show_id
        );
        return Ok(());
    }

    println!("Streams for show {} ({} total)", show_id, streams.len());
    println!("{:-<70}", "");

    for stream in streams {
        let name = stream.name.as_deref().unwrap_or("(no name)");
        println!(
            "#{} service {} as \"{}\" ({})",
            stream.id, stream.service_id, stream.remote_key, name
        );
        println!(
            "  Offsets: remote {} / display {}",
            stream.remote_offset, stream.display_offset
        );
    }

    Ok(())
}

pub async fn cmd_stream_active(
    config: &Config,
    stream_id: i32,
    active: bool,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_stream(stream_id).await?.is_none() {
        println!("Stream #{} not found.", stream_id);
        return Ok(());
    }

    store.set_stream_active(stream_id, active).await?;
    println!(
        "✓ Stream #{} {}",
        stream_id,
        if active { "activated" } else { "deactivated" }
    );

    Ok(())
}
