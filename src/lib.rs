pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod services;

use clap::Parser;
use cli::{Cli, Commands, ShowCommands, StreamCommands};
pub use config::Config;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("No command given. Try: kanon --help");
        return Ok(());
    };

    match command {
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run 'kanon sync'.");
            } else {
                println!("Config file already exists.");
            }
            Ok(())
        }

        Commands::Sync => cli::cmd_sync(&config).await,

        Commands::Show { command } => match command {
            ShowCommands::Add {
                name,
                name_en,
                length,
                show_type,
                more_names,
            } => {
                cli::cmd_show_add(
                    &config,
                    &name,
                    name_en.as_deref(),
                    length,
                    show_type.as_deref(),
                    &more_names,
                )
                .await
            }
            ShowCommands::List { disabled } => cli::cmd_show_list(&config, disabled).await,
            ShowCommands::Info { show_id } => cli::cmd_show_info(&config, show_id).await,
            ShowCommands::Alias { show_id, alias } => {
                cli::cmd_show_alias(&config, show_id, &alias).await
            }
            ShowCommands::SetLength { show_id, length } => {
                cli::cmd_show_set_length(&config, show_id, length).await
            }
            ShowCommands::Enable { show_id, off } => {
                cli::cmd_show_enable(&config, show_id, !off).await
            }
            ShowCommands::Delay { show_id, off } => {
                cli::cmd_show_delay(&config, show_id, !off).await
            }
            ShowCommands::Remove { show_id } => cli::cmd_show_remove(&config, show_id).await,
            ShowCommands::Report => cli::cmd_show_report(&config).await,
        },

        Commands::Stream { command } => match command {
            StreamCommands::Bind {
                show_id,
                service,
                remote_key,
                name,
                remote_id,
                remote_offset,
                display_offset,
            } => {
                cli::cmd_stream_bind(
                    &config,
                    show_id,
                    &service,
                    &remote_key,
                    name.as_deref(),
                    remote_id.as_deref(),
                    remote_offset,
                    display_offset,
                )
                .await
            }
            StreamCommands::List { show_id, inactive } => {
                cli::cmd_stream_list(&config, show_id, inactive).await
            }
            StreamCommands::Active { stream_id, off } => {
                cli::cmd_stream_active(&config, stream_id, !off).await
            }
        },

        Commands::Resolve {
            service,
            remote_key,
            title,
        } => cli::cmd_resolve(&config, &service, &remote_key, &title).await,

        Commands::Ingest {
            service,
            remote_key,
            title,
            episode,
            url,
        } => {
            cli::cmd_ingest(
                &config,
                &service,
                &remote_key,
                &title,
                episode,
                url.as_deref(),
            )
            .await
        }

        Commands::Episodes { show_id } => cli::cmd_episodes(&config, show_id).await,

        Commands::Score {
            show_id,
            episode,
            site,
            score,
        } => cli::cmd_score(&config, show_id, episode, &site, score).await,

        Commands::Poll {
            show_id,
            episode,
            site,
            poll_id,
            timestamp,
            score,
        } => cli::cmd_poll(&config, show_id, episode, &site, &poll_id, timestamp, score).await,

        Commands::Tally {
            show_id,
            episode,
            site,
            score,
        } => cli::cmd_tally(&config, show_id, episode, &site, score).await,

        Commands::Ratings { show_id, episode } => {
            cli::cmd_ratings(&config, show_id, episode).await
        }

        Commands::Link { show_id, site, key } => {
            cli::cmd_link(&config, show_id, &site, &key).await
        }

        Commands::Lite {
            show_id,
            name,
            url,
            service,
        } => cli::cmd_lite(&config, show_id, &name, &url, service.as_deref()).await,
    }
}
