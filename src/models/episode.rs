use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical record of a published episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub show_id: i32,
    pub number: i32,
    pub post_url: Option<String>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {} of show {} ({})",
            self.number,
            self.show_id,
            self.post_url.as_deref().unwrap_or("no url")
        )
    }
}
