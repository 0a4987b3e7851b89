use crate::entities::{aliases, prelude::*, show_names, shows, streams};
use crate::models::show::{NewShow, Show, ShowType};
use crate::services::resolver::normalize_name;
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use tracing::debug;

/// Repository for the canonical show catalog: shows, display names, aliases.
pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: shows::Model, aliases: Vec<String>) -> Show {
        Show {
            id: m.id,
            name: m.name,
            name_en: m.name_en,
            length: m.length,
            show_type: ShowType::from_i32(m.show_type),
            has_source: m.has_source,
            is_nsfw: m.is_nsfw,
            enabled: m.enabled,
            delayed: m.delayed,
            aliases,
        }
    }

    async fn with_aliases(&self, m: shows::Model) -> Result<Show> {
        let aliases = self.aliases(m.id).await?;
        Ok(Self::map_model(m, aliases))
    }

    /// Create a show. The primary name (and any extra names) are seeded into
    /// both the display-name set and the alias table so resolution works
    /// without further curation.
    pub async fn add(&self, new: &NewShow) -> Result<i32> {
        debug!("Inserting show: {}", new.name);

        let active = shows::ActiveModel {
            name: Set(new.name.clone()),
            name_en: Set(new.name_en.clone()),
            length: Set(new.length),
            show_type: Set(new.show_type.unwrap_or(ShowType::Unknown).as_i32()),
            has_source: Set(new.has_source),
            is_nsfw: Set(new.is_nsfw),
            enabled: Set(true),
            delayed: Set(false),
            ..Default::default()
        };

        let show_id = Shows::insert(active).exec(&self.conn).await?.last_insert_id;

        let mut names: Vec<&str> = vec![new.name.as_str()];
        names.extend(new.more_names.iter().map(String::as_str));
        self.add_names(show_id, &names).await?;
        for name in names {
            self.add_alias(show_id, name).await?;
        }

        Ok(show_id)
    }

    /// Partial update in the curation sense: empty-ish fields in the input do
    /// not clobber existing values.
    pub async fn update(&self, show_id: i32, new: &NewShow) -> Result<()> {
        debug!("Updating show {}: {}", show_id, new.name);

        if let Some(name_en) = &new.name_en {
            Shows::update_many()
                .col_expr(shows::Column::NameEn, Expr::value(name_en.clone()))
                .filter(shows::Column::Id.eq(show_id))
                .exec(&self.conn)
                .await?;
        }
        if new.length != 0 {
            Shows::update_many()
                .col_expr(shows::Column::Length, Expr::value(new.length))
                .filter(shows::Column::Id.eq(show_id))
                .exec(&self.conn)
                .await?;
        }
        if let Some(show_type) = new.show_type {
            Shows::update_many()
                .col_expr(shows::Column::ShowType, Expr::value(show_type.as_i32()))
                .filter(shows::Column::Id.eq(show_id))
                .exec(&self.conn)
                .await?;
        }
        Shows::update_many()
            .col_expr(shows::Column::HasSource, Expr::value(new.has_source))
            .col_expr(shows::Column::IsNsfw, Expr::value(new.is_nsfw))
            .filter(shows::Column::Id.eq(show_id))
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn get(&self, show_id: i32) -> Result<Option<Show>> {
        let Some(model) = Shows::find_by_id(show_id).one(&self.conn).await? else {
            return Ok(None);
        };
        Ok(Some(self.with_aliases(model).await?))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Show>> {
        let Some(model) = Shows::find()
            .filter(shows::Column::Name.eq(name))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(self.with_aliases(model).await?))
    }

    pub async fn list(&self, enabled: bool) -> Result<Vec<Show>> {
        let rows = Shows::find()
            .filter(shows::Column::Enabled.eq(enabled))
            .order_by_asc(shows::Column::Id)
            .all(&self.conn)
            .await?;

        let mut shows = Vec::with_capacity(rows.len());
        for row in rows {
            shows.push(self.with_aliases(row).await?);
        }
        Ok(shows)
    }

    /// Enabled shows with no configured episode count.
    pub async fn list_missing_length(&self) -> Result<Vec<Show>> {
        let rows = Shows::find()
            .filter(shows::Column::Enabled.eq(true))
            .filter(shows::Column::Length.eq(0))
            .all(&self.conn)
            .await?;

        let mut shows = Vec::with_capacity(rows.len());
        for row in rows {
            shows.push(self.with_aliases(row).await?);
        }
        Ok(shows)
    }

    /// Enabled shows without any active stream on an enabled service.
    pub async fn list_missing_stream(&self) -> Result<Vec<Show>> {
        let covered: Vec<i32> = Streams::find()
            .select_only()
            .column(streams::Column::ShowId)
            .join(JoinType::InnerJoin, streams::Relation::Services.def())
            .filter(streams::Column::Active.eq(true))
            .filter(crate::entities::services::Column::Enabled.eq(true))
            .into_tuple()
            .all(&self.conn)
            .await?;

        let rows = Shows::find()
            .filter(shows::Column::Enabled.eq(true))
            .filter(shows::Column::Id.is_not_in(covered))
            .all(&self.conn)
            .await?;

        let mut shows = Vec::with_capacity(rows.len());
        for row in rows {
            shows.push(self.with_aliases(row).await?);
        }
        Ok(shows)
    }

    pub async fn list_delayed(&self) -> Result<Vec<Show>> {
        let rows = Shows::find()
            .filter(shows::Column::Enabled.eq(true))
            .filter(shows::Column::Delayed.eq(true))
            .all(&self.conn)
            .await?;

        let mut shows = Vec::with_capacity(rows.len());
        for row in rows {
            shows.push(self.with_aliases(row).await?);
        }
        Ok(shows)
    }

    pub async fn set_enabled(&self, show_id: i32, enabled: bool) -> Result<()> {
        Shows::update_many()
            .col_expr(shows::Column::Enabled, Expr::value(enabled))
            .filter(shows::Column::Id.eq(show_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn set_delayed(&self, show_id: i32, delayed: bool) -> Result<()> {
        Shows::update_many()
            .col_expr(shows::Column::Delayed, Expr::value(delayed))
            .filter(shows::Column::Id.eq(show_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn set_length(&self, show_id: i32, length: i32) -> Result<()> {
        Shows::update_many()
            .col_expr(shows::Column::Length, Expr::value(length))
            .filter(shows::Column::Id.eq(show_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Delete a show. Child rows (names, aliases, streams, episodes, links,
    /// scores, polls, lite streams) go with it via the store's cascades.
    pub async fn remove(&self, show_id: i32) -> Result<bool> {
        let res = Shows::delete_by_id(show_id).exec(&self.conn).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn add_names(&self, show_id: i32, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        let rows: Vec<show_names::ActiveModel> = names
            .iter()
            .map(|name| show_names::ActiveModel {
                show_id: Set(show_id),
                name: Set((*name).to_string()),
                ..Default::default()
            })
            .collect();
        ShowNames::insert_many(rows).exec(&self.conn).await?;
        Ok(())
    }

    /// Ignore-on-conflict: returns false when the (show, alias) pair already
    /// existed and the write was dropped.
    pub async fn add_alias(&self, show_id: i32, alias: &str) -> Result<bool> {
        let active = aliases::ActiveModel {
            show_id: Set(show_id),
            alias: Set(alias.to_string()),
            normalized: Set(normalize_name(alias)),
            ..Default::default()
        };

        let outcome = Aliases::insert(active)
            .on_conflict(
                OnConflict::columns([aliases::Column::ShowId, aliases::Column::Alias])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match outcome {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn aliases(&self, show_id: i32) -> Result<Vec<String>> {
        let rows: Vec<String> = Aliases::find()
            .select_only()
            .column(aliases::Column::Alias)
            .filter(aliases::Column::ShowId.eq(show_id))
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Distinct show ids whose alias set contains the given normalized name.
    pub async fn find_ids_by_normalized(&self, normalized: &str) -> Result<Vec<i32>> {
        let ids: Vec<i32> = Aliases::find()
            .select_only()
            .column(aliases::Column::ShowId)
            .distinct()
            .filter(aliases::Column::Normalized.eq(normalized))
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(ids)
    }
}
