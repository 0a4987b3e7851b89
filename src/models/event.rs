use serde::{Deserialize, Serialize};

/// A per-service ingestion event: "service X just published episode N of the
/// show it knows as `remote_key`". Produced by external pollers/webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub service_key: String,
    pub remote_key: String,
    /// Service-native title, used for alias resolution when no stream binding
    /// exists yet.
    pub remote_title: String,
    pub remote_episode: i32,
    pub post_url: Option<String>,
}

/// A numeric rating reported by an external scoring site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub show_id: i32,
    pub episode: i32,
    pub site_key: String,
    pub score: f64,
}

/// A poll result reported by an external poll provider. A missing timestamp
/// means "now"; a missing score means the tally is not closed yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollEvent {
    pub show_id: i32,
    pub episode: i32,
    pub poll_site_key: String,
    pub poll_id: String,
    pub timestamp: Option<i64>,
    pub score: Option<f64>,
}
