//! CLI module - Command-line interface for Kanon
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Kanon - cross-service show catalog and episode reconciliation
#[derive(Parser)]
#[command(name = "kanon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Sync the service/site registry from the config file
    Sync,

    /// Manage the show catalog
    Show {
        #[command(subcommand)]
        command: ShowCommands,
    },

    /// Manage stream bindings
    Stream {
        #[command(subcommand)]
        command: StreamCommands,
    },

    /// Resolve a service-native (key, title) pair to a show
    Resolve {
        /// Service key
        service: String,
        /// Service-native show key
        remote_key: String,
        /// Service-native title
        title: String,
    },

    /// Reconcile an episode announcement into the ledger
    Ingest {
        /// Service key
        service: String,
        /// Service-native show key
        remote_key: String,
        /// Service-native title
        title: String,
        /// Episode number in the service's own numbering
        episode: i32,
        /// Announcement URL
        #[arg(long)]
        url: Option<String>,
    },

    /// List recorded episodes for a show
    Episodes {
        /// Show ID
        show_id: i32,
    },

    /// Record a site score for an episode
    Score {
        show_id: i32,
        episode: i32,
        /// Link site key
        site: String,
        score: f64,
    },

    /// Record a poll result for an episode
    Poll {
        show_id: i32,
        episode: i32,
        /// Poll provider key
        site: String,
        poll_id: String,
        /// Unix timestamp; defaults to now
        #[arg(long)]
        timestamp: Option<i64>,
        /// Closed tally, if known
        #[arg(long)]
        score: Option<f64>,
    },

    /// Record the closed tally for an already-recorded poll
    Tally {
        show_id: i32,
        episode: i32,
        /// Poll provider key
        site: String,
        score: f64,
    },

    /// Show all recorded ratings for an episode, as JSON
    Ratings {
        show_id: i32,
        episode: i32,
    },

    /// Link a show to its page on an external site
    Link {
        show_id: i32,
        /// Link site key
        site: String,
        /// Site-native show key
        key: String,
    },

    /// Set a URL-only stream listing for a show
    Lite {
        show_id: i32,
        /// Display name of the service
        name: String,
        url: String,
        /// Registered service key, when one exists
        #[arg(long)]
        service: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ShowCommands {
    /// Add a show to the catalog
    Add {
        name: String,
        /// English display name
        #[arg(long)]
        name_en: Option<String>,
        /// Episode count, 0 when unknown
        #[arg(long, default_value = "0")]
        length: i32,
        /// tv, movie or ova
        #[arg(long)]
        show_type: Option<String>,
        /// Extra names, each seeded as an alias too
        #[arg(long = "also")]
        more_names: Vec<String>,
    },

    /// List shows
    #[command(alias = "ls")]
    List {
        /// List disabled shows instead
        #[arg(long)]
        disabled: bool,
    },

    /// Show details for one show
    Info {
        show_id: i32,
    },

    /// Register an extra alias for a show
    Alias {
        show_id: i32,
        alias: String,
    },

    /// Set the episode count
    SetLength {
        show_id: i32,
        length: i32,
    },

    /// Enable or disable a show
    Enable {
        show_id: i32,
        #[arg(long)]
        off: bool,
    },

    /// Mark or unmark a show as delayed
    Delay {
        show_id: i32,
        #[arg(long)]
        off: bool,
    },

    /// Remove a show and everything recorded for it
    #[command(alias = "rm")]
    Remove {
        show_id: i32,
    },

    /// Curation report: shows missing a length or a stream, streams
    /// missing a name, polls missing a score
    Report,
}

#[derive(Subcommand)]
pub enum StreamCommands {
    /// Create or replace a binding for (service, show)
    Bind {
        show_id: i32,
        /// Service key
        service: String,
        /// Service-native show key
        remote_key: String,
        /// Service-native title
        #[arg(long)]
        name: Option<String>,
        /// Service-internal id
        #[arg(long)]
        remote_id: Option<String>,
        #[arg(long, default_value = "0")]
        remote_offset: i32,
        #[arg(long, default_value = "0")]
        display_offset: i32,
    },

    /// List bindings for a show
    #[command(alias = "ls")]
    List {
        show_id: i32,
        /// List inactive bindings instead
        #[arg(long)]
        inactive: bool,
    },

    /// Activate or deactivate a binding
    Active {
        stream_id: i32,
        #[arg(long)]
        off: bool,
    },
}

pub use commands::*;
