use crate::entities::{episodes, prelude::*};
use crate::models::episode::Episode;
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

/// Repository for the canonical episode ledger.
pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: episodes::Model) -> Episode {
        Episode {
            show_id: m.show_id,
            number: m.episode,
            post_url: m.post_url,
        }
    }

    /// Whole-row replace keyed by (show, episode). Idempotent; the newest
    /// announcement URL wins.
    pub async fn record(&self, show_id: i32, episode: i32, post_url: Option<&str>) -> Result<()> {
        debug!(
            "Recording episode {} for show {} ({:?})",
            episode, show_id, post_url
        );

        Episodes::insert(episodes::ActiveModel {
            show_id: Set(show_id),
            episode: Set(episode),
            post_url: Set(post_url.map(str::to_string)),
        })
        .on_conflict(
            OnConflict::columns([episodes::Column::ShowId, episodes::Column::Episode])
                .update_columns([episodes::Column::PostUrl])
                .to_owned(),
        )
        .exec(&self.conn)
        .await?;
        Ok(())
    }

    pub async fn get(&self, show_id: i32, episode: i32) -> Result<Option<Episode>> {
        let row = Episodes::find()
            .filter(episodes::Column::ShowId.eq(show_id))
            .filter(episodes::Column::Episode.eq(episode))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn has(&self, show_id: i32, episode: i32) -> Result<bool> {
        let count = Episodes::find()
            .filter(episodes::Column::ShowId.eq(show_id))
            .filter(episodes::Column::Episode.eq(episode))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn all_for_show(&self, show_id: i32) -> Result<Vec<Episode>> {
        let rows = Episodes::find()
            .filter(episodes::Column::ShowId.eq(show_id))
            .order_by_asc(episodes::Column::Episode)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn latest_for_show(&self, show_id: i32) -> Result<Option<Episode>> {
        let row = Episodes::find()
            .filter(episodes::Column::ShowId.eq(show_id))
            .order_by_desc(episodes::Column::Episode)
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }
}
