use serde::{Deserialize, Serialize};

/// External provider of streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i32,
    pub key: String,
    pub name: String,
    pub enabled: bool,
    pub use_in_post: bool,
}

/// External information/rating site (AniList, MAL and the like).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSite {
    pub id: i32,
    pub key: String,
    pub name: String,
    pub enabled: bool,
}

/// External poll provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSite {
    pub id: i32,
    pub key: String,
}

/// Per-show key into an external link site. First write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub show_id: i32,
    pub site_id: i32,
    pub site_key: String,
}

/// A handler definition used when syncing the registry at startup: keys not
/// in the synced set are disabled, listed ones are created or re-enabled.
#[derive(Debug, Clone)]
pub struct HandlerDef {
    pub key: String,
    pub name: String,
}

impl HandlerDef {
    #[must_use]
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
        }
    }
}
