use crate::entities::{link_sites, links, poll_sites, prelude::*, services};
use crate::models::registry::{HandlerDef, Link, LinkSite, PollSite, Service};
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use tracing::debug;

/// Repository for the static service/site registry: stream services, link
/// sites and poll sites, plus per-show links into link sites.
pub struct RegistryRepository {
    conn: DatabaseConnection,
}

impl RegistryRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_service(m: services::Model) -> Service {
        Service {
            id: m.id,
            key: m.key,
            name: m.name,
            enabled: m.enabled,
            use_in_post: m.use_in_post,
        }
    }

    fn map_link_site(m: link_sites::Model) -> LinkSite {
        LinkSite {
            id: m.id,
            key: m.key,
            name: m.name,
            enabled: m.enabled,
        }
    }

    fn map_link(m: links::Model) -> Link {
        Link {
            show_id: m.show_id,
            site_id: m.site_id,
            site_key: m.site_key,
        }
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Sync the service registry against the set of live handlers: everything
    /// is disabled first, then each listed handler is created or re-enabled.
    pub async fn sync_services(&self, handlers: &[HandlerDef]) -> Result<()> {
        Services::update_many()
            .col_expr(services::Column::Enabled, Expr::value(false))
            .exec(&self.conn)
            .await?;

        for handler in handlers {
            self.upsert_service(&handler.key, &handler.name).await?;
        }
        Ok(())
    }

    /// Create or re-enable a single service.
    pub async fn upsert_service(&self, key: &str, name: &str) -> Result<()> {
        debug!("Registering service {}", key);

        let outcome = Services::insert(services::ActiveModel {
            key: Set(key.to_string()),
            name: Set(String::new()),
            enabled: Set(false),
            use_in_post: Set(true),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(services::Column::Key)
                .do_nothing()
                .to_owned(),
        )
        .exec(&self.conn)
        .await;
        match outcome {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        Services::update_many()
            .col_expr(services::Column::Name, Expr::value(name))
            .col_expr(services::Column::Enabled, Expr::value(true))
            .filter(services::Column::Key.eq(key))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get_service(&self, key: &str) -> Result<Option<Service>> {
        let row = Services::find()
            .filter(services::Column::Key.eq(key))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_service))
    }

    pub async fn services(&self, enabled: bool) -> Result<Vec<Service>> {
        let rows = Services::find()
            .filter(services::Column::Enabled.eq(enabled))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_service).collect())
    }

    // ========================================================================
    // Link sites
    // ========================================================================

    pub async fn sync_link_sites(&self, handlers: &[HandlerDef]) -> Result<()> {
        LinkSites::update_many()
            .col_expr(link_sites::Column::Enabled, Expr::value(false))
            .exec(&self.conn)
            .await?;

        for handler in handlers {
            self.upsert_link_site(&handler.key, &handler.name).await?;
        }
        Ok(())
    }

    pub async fn upsert_link_site(&self, key: &str, name: &str) -> Result<()> {
        debug!("Registering link site {}", key);

        let outcome = LinkSites::insert(link_sites::ActiveModel {
            key: Set(key.to_string()),
            name: Set(String::new()),
            enabled: Set(false),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(link_sites::Column::Key)
                .do_nothing()
                .to_owned(),
        )
        .exec(&self.conn)
        .await;
        match outcome {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        LinkSites::update_many()
            .col_expr(link_sites::Column::Name, Expr::value(name))
            .col_expr(link_sites::Column::Enabled, Expr::value(true))
            .filter(link_sites::Column::Key.eq(key))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get_link_site(&self, key: &str) -> Result<Option<LinkSite>> {
        let row = LinkSites::find()
            .filter(link_sites::Column::Key.eq(key))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_link_site))
    }

    pub async fn link_sites(&self, enabled: bool) -> Result<Vec<LinkSite>> {
        let rows = LinkSites::find()
            .filter(link_sites::Column::Enabled.eq(enabled))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_link_site).collect())
    }

    // ========================================================================
    // Poll sites
    // ========================================================================

    pub async fn upsert_poll_site(&self, key: &str) -> Result<()> {
        debug!("Registering poll site {}", key);

        let outcome = PollSites::insert(poll_sites::ActiveModel {
            key: Set(key.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(poll_sites::Column::Key)
                .do_nothing()
                .to_owned(),
        )
        .exec(&self.conn)
        .await;
        match outcome {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn sync_poll_sites(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.upsert_poll_site(key).await?;
        }
        Ok(())
    }

    pub async fn get_poll_site(&self, key: &str) -> Result<Option<PollSite>> {
        let row = PollSites::find()
            .filter(poll_sites::Column::Key.eq(key))
            .one(&self.conn)
            .await?;
        Ok(row.map(|m| PollSite {
            id: m.id,
            key: m.key,
        }))
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Ignore-on-conflict: returns false when a link for (show, site) already
    /// existed, leaving the prior row in place.
    pub async fn add_link(&self, show_id: i32, site_id: i32, site_key: &str) -> Result<bool> {
        let outcome = Links::insert(links::ActiveModel {
            show_id: Set(show_id),
            site_id: Set(site_id),
            site_key: Set(site_key.to_string()),
        })
        .on_conflict(
            OnConflict::columns([links::Column::ShowId, links::Column::SiteId])
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

    pub async fn links_for_show(&self, show_id: i32) -> Result<Vec<Link>> {
        let rows = Links::find()
            .filter(links::Column::ShowId.eq(show_id))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_link).collect())
    }

    pub async fn has_link(&self, site_id: i32, site_key: &str) -> Result<bool> {
        let count = Links::find()
            .filter(links::Column::SiteId.eq(site_id))
            .filter(links::Column::SiteKey.eq(site_key))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }
}
