use crate::db::Store;
use crate::error::EngineError;
use regex::Regex;
use std::sync::OnceLock;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Weak-collation form used for alias comparison. Punctuation is deliberately
/// not significant here; shows distinguished only by punctuation surface as an
/// ambiguous match and get curated by hand.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    static ALPHANUM: OnceLock<Regex> = OnceLock::new();
    static ROMAN_WO: OnceLock<Regex> = OnceLock::new();

    let s = name.replace('&', "and");
    // Japanese romanization differences
    let s = get_regex(&ROMAN_WO, r"\bwo\b").replace_all(&s, "o");
    let s = s.replace("uu", "u").replace("wo", "o");

    let s = get_regex(&ALPHANUM, "[^a-zA-Z0-9]+").replace_all(&s, "");
    s.to_lowercase()
}

/// Outcome of identity resolution for one ingestion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A stream binding for (service, remote key) already exists.
    Bound { show_id: i32, stream_id: i32 },
    /// No binding, but exactly one show's alias set contains the candidate
    /// title. The caller is expected to upgrade this to a binding.
    Matched { show_id: i32 },
}

impl Resolution {
    #[must_use]
    pub const fn show_id(&self) -> i32 {
        match self {
            Self::Bound { show_id, .. } | Self::Matched { show_id } => *show_id,
        }
    }
}

/// Maps a service-native (remote key, title) pair onto a catalog show. The
/// binding table is consulted first, then the alias table; resolution is
/// deterministic for a fixed store state and never guesses on ambiguity.
pub struct IdentityResolver {
    store: Store,
}

impl IdentityResolver {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn resolve(
        &self,
        service_key: &str,
        remote_key: &str,
        candidate_title: &str,
    ) -> Result<Resolution, EngineError> {
        let service = self
            .store
            .get_service(service_key)
            .await?
            .filter(|s| s.enabled)
            .ok_or_else(|| EngineError::UnknownService {
                service: service_key.to_string(),
            })?;

        let bound = self
            .store
            .find_streams_by_remote(service.id, remote_key)
            .await?;
        match bound.as_slice() {
            [] => {}
            [stream] => {
                return Ok(Resolution::Bound {
                    show_id: stream.show_id,
                    stream_id: stream.id,
                });
            }
            // A remote key bound to several shows is a curation error; never
            // pick one.
            _ => {
                return Err(EngineError::Ambiguous {
                    service: service_key.to_string(),
                    candidate: candidate_title.to_string(),
                    matches: bound.iter().map(|s| s.show_id).collect(),
                });
            }
        }

        let normalized = normalize_name(candidate_title);
        let mut matches = self.store.find_show_ids_by_normalized(&normalized).await?;
        matches.sort_unstable();

        match matches.as_slice() {
            [] => Err(EngineError::NotFound {
                service: service_key.to_string(),
                candidate: candidate_title.to_string(),
            }),
            [show_id] => Ok(Resolution::Matched { show_id: *show_id }),
            _ => Err(EngineError::Ambiguous {
                service: service_key.to_string(),
                candidate: candidate_title.to_string(),
                matches,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_name;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(normalize_name("K-On!"), "kon");
        assert_eq!(normalize_name("Re:Zero (2nd Season)"), "rezero2ndseason");
    }

    #[test]
    fn folds_ampersand_to_word() {
        assert_eq!(normalize_name("Fate & Stay"), "fateandstay");
    }

    #[test]
    fn folds_romanization_variants() {
        assert_eq!(normalize_name("Boku wo Suki"), normalize_name("Boku o Suki"));
        assert_eq!(normalize_name("Yuuki"), normalize_name("Yuki"));
    }

    #[test]
    fn distinct_titles_stay_distinct() {
        assert_ne!(normalize_name("Shirobako"), normalize_name("Barakamon"));
    }
}
