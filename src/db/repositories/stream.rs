use crate::entities::{lite_streams, prelude::*, shows, streams};
use crate::models::stream::{LiteStream, Stream, StreamBinding};
use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait, Set,
};
use sea_orm::{Condition, QueryOrder};
use tracing::debug;

/// Repository for stream bindings and the lite-stream index.
pub struct StreamRepository {
    conn: DatabaseConnection,
}

impl StreamRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: streams::Model) -> Stream {
        Stream {
            id: m.id,
            service_id: m.service_id,
            show_id: m.show_id,
            remote_id: m.remote_id,
            remote_key: m.remote_key,
            name: m.name,
            remote_offset: m.remote_offset,
            display_offset: m.display_offset,
            active: m.active,
        }
    }

    fn map_lite(m: lite_streams::Model) -> LiteStream {
        LiteStream {
            show_id: m.show_id,
            service: m.service,
            service_name: m.service_name,
            url: m.url,
        }
    }

    /// Create or replace the binding for (service, show). A single upsert
    /// statement keeps the at-most-one-binding invariant under concurrent
    /// writers; a re-bind overwrites the mutable fields and keeps the row id.
    pub async fn bind(&self, service_id: i32, binding: &StreamBinding) -> Result<i32> {
        debug!(
            "Binding stream {}@service {} to show {}",
            binding.remote_key, service_id, binding.show_id
        );

        let active = streams::ActiveModel {
            service_id: Set(service_id),
            show_id: Set(binding.show_id),
            remote_id: Set(binding.remote_id.clone()),
            remote_key: Set(binding.remote_key.clone()),
            name: Set(binding.name.clone()),
            remote_offset: Set(binding.remote_offset),
            display_offset: Set(binding.display_offset),
            active: Set(true),
            ..Default::default()
        };

        Streams::insert(active)
            .on_conflict(
                OnConflict::columns([streams::Column::ServiceId, streams::Column::ShowId])
                    .update_columns([
                        streams::Column::RemoteId,
                        streams::Column::RemoteKey,
                        streams::Column::Name,
                        streams::Column::RemoteOffset,
                        streams::Column::DisplayOffset,
                        streams::Column::Active,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        // last_insert_id is not meaningful on the update path, so read the
        // surviving row back by its natural key.
        let row = Streams::find()
            .filter(streams::Column::ServiceId.eq(service_id))
            .filter(streams::Column::ShowId.eq(binding.show_id))
            .one(&self.conn)
            .await?
            .context("stream row missing right after upsert")?;

        Ok(row.id)
    }

    pub async fn get(&self, stream_id: i32) -> Result<Option<Stream>> {
        let row = Streams::find_by_id(stream_id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    /// Resolver fast path: active bindings for a service-native show key.
    /// (service, remote key) is not unique, so every match is returned and
    /// the caller decides what more than one means.
    pub async fn find_by_remote(&self, service_id: i32, remote_key: &str) -> Result<Vec<Stream>> {
        let rows = Streams::find()
            .filter(streams::Column::ServiceId.eq(service_id))
            .filter(streams::Column::RemoteKey.eq(remote_key))
            .filter(streams::Column::Active.eq(true))
            .order_by_asc(streams::Column::ShowId)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn for_show(&self, show_id: i32, active: bool) -> Result<Vec<Stream>> {
        let rows = Streams::find()
            .filter(streams::Column::ShowId.eq(show_id))
            .filter(streams::Column::Active.eq(active))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Active listings are restricted to enabled shows, matching what the
    /// ingestion loop should be polling for.
    pub async fn for_service(&self, service_id: i32, active: bool) -> Result<Vec<Stream>> {
        let mut query = Streams::find()
            .filter(streams::Column::ServiceId.eq(service_id))
            .filter(streams::Column::Active.eq(active));

        if active {
            query = query
                .join(JoinType::InnerJoin, streams::Relation::Shows.def())
                .filter(shows::Column::Enabled.eq(true));
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Curation helper: bindings that never learned a service-native title.
    pub async fn missing_names(&self, active: bool) -> Result<Vec<Stream>> {
        let rows = Streams::find()
            .filter(
                Condition::any()
                    .add(streams::Column::Name.is_null())
                    .add(streams::Column::Name.eq("")),
            )
            .filter(streams::Column::Active.eq(active))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn set_active(&self, stream_id: i32, active: bool) -> Result<()> {
        Streams::update_many()
            .col_expr(streams::Column::Active, Expr::value(active))
            .filter(streams::Column::Id.eq(stream_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Lite streams
    // ========================================================================

    /// Replace-on-conflict keyed by (show, label). A missing service key falls
    /// back to the display name so the key is always total.
    pub async fn set_lite(
        &self,
        show_id: i32,
        service_key: Option<&str>,
        service_name: &str,
        url: &str,
    ) -> Result<()> {
        let label = service_key.unwrap_or(service_name);
        debug!("Setting lite stream {} ({}) for show {}", label, url, show_id);

        LiteStreams::insert(lite_streams::ActiveModel {
            show_id: Set(show_id),
            service: Set(label.to_string()),
            service_name: Set(service_name.to_string()),
            url: Set(Some(url.to_string())),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                lite_streams::Column::ShowId,
                lite_streams::Column::Service,
            ])
            .update_columns([lite_streams::Column::ServiceName, lite_streams::Column::Url])
            .to_owned(),
        )
        .exec(&self.conn)
        .await?;
        Ok(())
    }

    pub async fn lites_for_show(&self, show_id: i32) -> Result<Vec<LiteStream>> {
        let rows = LiteStreams::find()
            .filter(lite_streams::Column::ShowId.eq(show_id))
            .order_by_asc(lite_streams::Column::Service)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_lite).collect())
    }
}
