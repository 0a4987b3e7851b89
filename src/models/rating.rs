use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single external numeric rating for one episode on one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeScore {
    pub show_id: i32,
    pub episode: i32,
    pub site_id: i32,
    pub score: f64,
}

/// A timestamped episode-level poll result from one poll provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub show_id: i32,
    pub episode: i32,
    pub poll_site_id: i32,
    pub poll_id: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub score: Option<f64>,
}

impl Poll {
    #[must_use]
    pub const fn has_score(&self) -> bool {
        self.score.is_some()
    }

    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Raw per-source rating collections for one (show, episode). No blended
/// scalar is computed here; weighting is a presentation concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeRatings {
    pub scores: Vec<EpisodeScore>,
    pub polls: Vec<Poll>,
}
