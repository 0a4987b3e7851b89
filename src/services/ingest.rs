use crate::db::Store;
use crate::error::EngineError;
use crate::models::event::{EpisodeEvent, PollEvent, ScoreEvent};
use crate::models::stream::StreamBinding;
use crate::services::resolver::{IdentityResolver, Resolution};
use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

/// Result of reconciling one episode event into the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub show_id: i32,
    pub stream_id: i32,
    pub canonical_episode: i32,
    /// True when a row for (show, canonical episode) already existed and was
    /// replaced rather than freshly recorded.
    pub replaced: bool,
}

/// Reconciliation pipeline: resolve identity, translate the episode number,
/// write through the ledgers. Clones share the underlying connection pool.
#[derive(Clone)]
pub struct IngestService {
    store: Store,
}

impl IngestService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.store.clone())
    }

    /// Reconcile one per-service episode announcement. An alias-only match is
    /// upgraded to a stream binding on the spot so later events for the same
    /// remote key take the fast path.
    pub async fn ingest_episode(&self, event: &EpisodeEvent) -> Result<IngestOutcome, EngineError> {
        let resolution = self
            .resolver()
            .resolve(&event.service_key, &event.remote_key, &event.remote_title)
            .await?;

        let stream_id = match resolution {
            Resolution::Bound { stream_id, .. } => stream_id,
            Resolution::Matched { show_id } => {
                info!(
                    "Upgrading alias match to stream binding: show {} as {}@{}",
                    show_id, event.remote_key, event.service_key
                );
                let binding =
                    StreamBinding::identity(show_id, &event.remote_key, Some(&event.remote_title));
                self.store.bind_stream(&event.service_key, &binding).await?
            }
        };

        let stream = self
            .store
            .get_stream(stream_id)
            .await?
            .context("stream vanished during ingestion")?;

        let canonical = stream.to_canonical(event.remote_episode);
        if canonical < 1 {
            return Err(EngineError::InvalidOffset {
                stream_id,
                remote_episode: event.remote_episode,
                canonical,
            });
        }

        let replaced = self.store.has_episode(stream.show_id, canonical).await?;
        if replaced {
            warn!(
                "Episode {} of show {} re-announced, replacing ledger row",
                canonical, stream.show_id
            );
        }
        self.store
            .record_episode(stream.show_id, canonical, event.post_url.as_deref())
            .await?;

        info!(
            "Recorded episode {} of show {} (remote {} via {})",
            canonical, stream.show_id, event.remote_episode, event.service_key
        );

        Ok(IngestOutcome {
            show_id: stream.show_id,
            stream_id,
            canonical_episode: canonical,
            replaced,
        })
    }

    /// Record a site score for an already-canonical (show, episode). The site
    /// key must name a registered link site.
    pub async fn ingest_score(&self, event: &ScoreEvent) -> Result<(), EngineError> {
        let site = self
            .store
            .get_link_site(&event.site_key)
            .await?
            .with_context(|| format!("unknown link site key: {}", event.site_key))?;

        self.store
            .record_score(event.show_id, event.episode, site.id, event.score)
            .await?;
        Ok(())
    }

    /// Record a poll result. Poll sites carry no configuration beyond their
    /// key, so an unseen provider is registered on first sight.
    pub async fn ingest_poll(&self, event: &PollEvent) -> Result<(), EngineError> {
        let site = match self.store.get_poll_site(&event.poll_site_key).await? {
            Some(site) => site,
            None => {
                self.store.upsert_poll_site(&event.poll_site_key).await?;
                self.store
                    .get_poll_site(&event.poll_site_key)
                    .await?
                    .context("poll site missing right after registration")?
            }
        };

        let timestamp = event
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp());

        self.store
            .record_poll(
                event.show_id,
                event.episode,
                site.id,
                &event.poll_id,
                timestamp,
                event.score,
            )
            .await?;
        Ok(())
    }

    /// Land a late tally on an already-recorded poll without replacing the
    /// row; poll id and timestamp stay untouched.
    pub async fn tally_poll(
        &self,
        show_id: i32,
        episode: i32,
        poll_site_key: &str,
        score: f64,
    ) -> Result<(), EngineError> {
        let site = self
            .store
            .get_poll_site(poll_site_key)
            .await?
            .with_context(|| format!("unknown poll site key: {poll_site_key}"))?;

        self.store
            .get_poll(show_id, episode, site.id)
            .await?
            .with_context(|| {
                format!("no poll recorded for show {show_id} episode {episode} on {poll_site_key}")
            })?;

        self.store
            .set_poll_score(show_id, episode, site.id, score)
            .await?;
        Ok(())
    }

    /// Associate a show with its page on a link site. First write wins; a
    /// repeat is reported as a suppressed conflict, not an error to retry.
    pub async fn link_show(
        &self,
        show_id: i32,
        site_key: &str,
        site_show_key: &str,
    ) -> Result<(), EngineError> {
        let site = self
            .store
            .get_link_site(site_key)
            .await?
            .with_context(|| format!("unknown link site key: {site_key}"))?;

        if self.store.add_link(show_id, site.id, site_show_key).await? {
            Ok(())
        } else {
            Err(EngineError::ConflictSuppressed { entity: "link" })
        }
    }
}
