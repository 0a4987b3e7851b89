use thiserror::Error;

/// Failure modes surfaced to ingestion callers. Nothing here is fatal to the
/// process; callers decide between alerting (resolution failures), curation
/// (ambiguity), and retry (store failures).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The event named a service key that is not registered, or one whose
    /// handler is currently disabled. Distinct from a show lookup miss so
    /// callers do not send operators chasing the alias table.
    #[error("service {service} is not registered or is disabled")]
    UnknownService { service: String },

    #[error("no show matched \"{candidate}\" from service {service}")]
    NotFound { service: String, candidate: String },

    /// Resolution is never guessed; the candidate ids are surfaced so an
    /// operator can curate the alias table.
    #[error("\"{candidate}\" from service {service} matched {} shows: {matches:?}", matches.len())]
    Ambiguous {
        service: String,
        candidate: String,
        matches: Vec<i32>,
    },

    #[error(
        "remote episode {remote_episode} on stream {stream_id} translated to \
         non-positive canonical episode {canonical}"
    )]
    InvalidOffset {
        stream_id: i32,
        remote_episode: i32,
        canonical: i32,
    },

    /// An ignore-on-conflict write was dropped because the row already
    /// existed. Informational.
    #[error("{entity} already recorded, new write ignored")]
    ConflictSuppressed { entity: &'static str },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
