use serde::{Deserialize, Serialize};
use std::fmt;

/// Translate a service-local episode number into the catalog's canonical one.
///
/// `remote_offset` is relative to a start episode of 1: positive when the
/// service keeps counting across what the catalog treats as a fresh run,
/// negative when the service starts below 1. `display_offset` shifts the
/// canonical number the same way, e.g. for a split cour continuing earlier
/// numbering. Exact integer arithmetic; results may be non-positive and it is
/// the caller's job to reject those as configuration errors.
#[must_use]
pub const fn to_canonical(remote_episode: i32, remote_offset: i32, display_offset: i32) -> i32 {
    remote_episode - remote_offset + display_offset
}

/// Binding of a show to a service's local representation of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stream {
    pub id: i32,
    pub service_id: i32,
    pub show_id: i32,
    pub remote_id: Option<String>,
    pub remote_key: String,
    pub name: Option<String>,
    pub remote_offset: i32,
    pub display_offset: i32,
    pub active: bool,
}

impl Stream {
    #[must_use]
    pub const fn to_canonical(&self, remote_episode: i32) -> i32 {
        to_canonical(remote_episode, self.remote_offset, self.display_offset)
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stream: show={} ({}@service {}), offsets {}/{}",
            self.show_id, self.remote_key, self.service_id, self.remote_offset, self.display_offset
        )
    }
}

/// Input for creating or re-binding a stream. The target service is named
/// separately by key when the binding is written.
#[derive(Debug, Clone)]
pub struct StreamBinding {
    pub show_id: i32,
    pub remote_key: String,
    pub remote_id: Option<String>,
    pub name: Option<String>,
    pub remote_offset: i32,
    pub display_offset: i32,
}

impl StreamBinding {
    /// Identity binding: no offsets, no service-native name yet. Used when a
    /// resolver alias match is upgraded to a stream binding.
    #[must_use]
    pub fn identity(show_id: i32, remote_key: &str, name: Option<&str>) -> Self {
        Self {
            show_id,
            remote_key: remote_key.to_string(),
            remote_id: None,
            name: name.map(str::to_string),
            remote_offset: 0,
            display_offset: 0,
        }
    }
}

/// URL-only show/service association without offset semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteStream {
    pub show_id: i32,
    pub service: String,
    pub service_name: String,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::to_canonical;

    #[test]
    fn identity_mapping_with_zero_offsets() {
        for episode in [-3, 0, 1, 13, 500] {
            assert_eq!(to_canonical(episode, 0, 0), episode);
        }
    }

    #[test]
    fn subtracts_remote_and_adds_display_offset() {
        assert_eq!(to_canonical(13, 12, 1), 2);
        assert_eq!(to_canonical(25, 12, 0), 13);
        assert_eq!(to_canonical(1, 0, 12), 13);
    }

    #[test]
    fn never_clamps_negative_results() {
        assert_eq!(to_canonical(1, 12, 0), -11);
        assert_eq!(to_canonical(0, 0, -1), -1);
    }
}
