use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowType {
    Unknown,
    Tv,
    Movie,
    Ova,
}

impl ShowType {
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Tv => 1,
            Self::Movie => 2,
            Self::Ova => 3,
        }
    }

    /// Unknown database values fold to `Unknown` rather than failing.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Tv,
            2 => Self::Movie,
            3 => Self::Ova,
            _ => Self::Unknown,
        }
    }
}

impl std::str::FromStr for ShowType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "tv" => Self::Tv,
            "movie" => Self::Movie,
            "ova" => Self::Ova,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for ShowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Tv => "tv",
            Self::Movie => "movie",
            Self::Ova => "ova",
        };
        write!(f, "{s}")
    }
}

/// Canonical catalog entry. All other records reference shows by `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: i32,
    pub name: String,
    pub name_en: Option<String>,
    /// Expected episode count; 0 means unknown.
    pub length: i32,
    pub show_type: ShowType,
    pub has_source: bool,
    pub is_nsfw: bool,
    pub enabled: bool,
    pub delayed: bool,
    pub aliases: Vec<String>,
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Show: {} (id={}, type={}, len={})",
            self.name, self.id, self.show_type, self.length
        )
    }
}

/// Curation input for creating or updating a show.
#[derive(Debug, Clone, Default)]
pub struct NewShow {
    pub name: String,
    pub name_en: Option<String>,
    pub more_names: Vec<String>,
    pub show_type: Option<ShowType>,
    pub length: i32,
    pub has_source: bool,
    pub is_nsfw: bool,
}
