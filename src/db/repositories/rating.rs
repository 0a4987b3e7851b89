use crate::entities::{polls, prelude::*, scores, shows};
use crate::models::rating::{EpisodeRatings, EpisodeScore, Poll};
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use tracing::debug;

/// Repository for externally-sourced ratings: per-site scores and per-provider
/// polls. Both sub-ledgers share the same replace-on-conflict discipline.
pub struct RatingRepository {
    conn: DatabaseConnection,
}

impl RatingRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_score(m: scores::Model) -> EpisodeScore {
        EpisodeScore {
            show_id: m.show_id,
            episode: m.episode,
            site_id: m.site_id,
            score: m.score,
        }
    }

    fn map_poll(m: polls::Model) -> Poll {
        Poll {
            show_id: m.show_id,
            episode: m.episode,
            poll_site_id: m.poll_site_id,
            poll_id: m.poll_id,
            timestamp: m.timestamp,
            score: m.score,
        }
    }

    // ========================================================================
    // Scores
    // ========================================================================

    /// Replace keyed by (show, episode, site): the newest score wins.
    pub async fn record_score(
        &self,
        show_id: i32,
        episode: i32,
        site_id: i32,
        score: f64,
    ) -> Result<()> {
        debug!(
            "Recording score {} for show {} episode {} from site {}",
            score, show_id, episode, site_id
        );

        Scores::insert(scores::ActiveModel {
            show_id: Set(show_id),
            episode: Set(episode),
            site_id: Set(site_id),
            score: Set(score),
        })
        .on_conflict(
            OnConflict::columns([
                scores::Column::ShowId,
                scores::Column::Episode,
                scores::Column::SiteId,
            ])
            .update_columns([scores::Column::Score])
            .to_owned(),
        )
        .exec(&self.conn)
        .await?;
        Ok(())
    }

    pub async fn scores_for_episode(&self, show_id: i32, episode: i32) -> Result<Vec<EpisodeScore>> {
        let rows = Scores::find()
            .filter(scores::Column::ShowId.eq(show_id))
            .filter(scores::Column::Episode.eq(episode))
            .order_by_asc(scores::Column::SiteId)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_score).collect())
    }

    pub async fn scores_for_show(&self, show_id: i32) -> Result<Vec<EpisodeScore>> {
        let rows = Scores::find()
            .filter(scores::Column::ShowId.eq(show_id))
            .order_by_asc(scores::Column::Episode)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_score).collect())
    }

    // ========================================================================
    // Polls
    // ========================================================================

    /// Replace keyed by (show, episode, poll site). The poll id is stable per
    /// episode but the tally may refresh, so the whole row is replaced.
    pub async fn record_poll(
        &self,
        show_id: i32,
        episode: i32,
        poll_site_id: i32,
        poll_id: &str,
        timestamp: i64,
        score: Option<f64>,
    ) -> Result<()> {
        debug!(
            "Recording poll {} for show {} episode {} from site {}",
            poll_id, show_id, episode, poll_site_id
        );

        Polls::insert(polls::ActiveModel {
            show_id: Set(show_id),
            episode: Set(episode),
            poll_site_id: Set(poll_site_id),
            poll_id: Set(poll_id.to_string()),
            timestamp: Set(timestamp),
            score: Set(score),
        })
        .on_conflict(
            OnConflict::columns([
                polls::Column::ShowId,
                polls::Column::Episode,
                polls::Column::PollSiteId,
            ])
            .update_columns([
                polls::Column::PollId,
                polls::Column::Timestamp,
                polls::Column::Score,
            ])
            .to_owned(),
        )
        .exec(&self.conn)
        .await?;
        Ok(())
    }

    /// Late tally refresh for an existing poll row.
    pub async fn set_poll_score(
        &self,
        show_id: i32,
        episode: i32,
        poll_site_id: i32,
        score: f64,
    ) -> Result<()> {
        Polls::update_many()
            .col_expr(polls::Column::Score, Expr::value(score))
            .filter(polls::Column::ShowId.eq(show_id))
            .filter(polls::Column::Episode.eq(episode))
            .filter(polls::Column::PollSiteId.eq(poll_site_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn poll(
        &self,
        show_id: i32,
        episode: i32,
        poll_site_id: i32,
    ) -> Result<Option<Poll>> {
        let row = Polls::find()
            .filter(polls::Column::ShowId.eq(show_id))
            .filter(polls::Column::Episode.eq(episode))
            .filter(polls::Column::PollSiteId.eq(poll_site_id))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_poll))
    }

    pub async fn polls_for_episode(&self, show_id: i32, episode: i32) -> Result<Vec<Poll>> {
        let rows = Polls::find()
            .filter(polls::Column::ShowId.eq(show_id))
            .filter(polls::Column::Episode.eq(episode))
            .order_by_asc(polls::Column::PollSiteId)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_poll).collect())
    }

    pub async fn polls_for_show(&self, show_id: i32) -> Result<Vec<Poll>> {
        let rows = Polls::find()
            .filter(polls::Column::ShowId.eq(show_id))
            .order_by_asc(polls::Column::Episode)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_poll).collect())
    }

    /// Polls on enabled shows whose tally never arrived, for re-polling.
    pub async fn polls_missing_score(&self) -> Result<Vec<Poll>> {
        let rows = Polls::find()
            .filter(polls::Column::Score.is_null())
            .join(JoinType::InnerJoin, polls::Relation::Shows.def())
            .filter(shows::Column::Enabled.eq(true))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_poll).collect())
    }

    // ========================================================================
    // Aggregate reads
    // ========================================================================

    /// Raw per-source collections for one (show, episode). No blending.
    pub async fn aggregate(&self, show_id: i32, episode: i32) -> Result<EpisodeRatings> {
        Ok(EpisodeRatings {
            scores: self.scores_for_episode(show_id, episode).await?,
            polls: self.polls_for_episode(show_id, episode).await?,
        })
    }
}
