use crate::models::episode::Episode;
use crate::models::rating::{EpisodeRatings, EpisodeScore, Poll};
use crate::models::registry::{HandlerDef, Link, LinkSite, PollSite, Service};
use crate::models::show::{NewShow, Show};
use crate::models::stream::{LiteStream, Stream, StreamBinding};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.starts_with("sqlite::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn stream_repo(&self) -> repositories::stream::StreamRepository {
        repositories::stream::StreamRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn rating_repo(&self) -> repositories::rating::RatingRepository {
        repositories::rating::RatingRepository::new(self.conn.clone())
    }

    fn registry_repo(&self) -> repositories::registry::RegistryRepository {
        repositories::registry::RegistryRepository::new(self.conn.clone())
    }

    // ========== Shows ==========

    pub async fn add_show(&self, new: &NewShow) -> Result<i32> {
        self.show_repo().add(new).await
    }

    pub async fn update_show(&self, show_id: i32, new: &NewShow) -> Result<()> {
        self.show_repo().update(show_id, new).await
    }

    pub async fn get_show(&self, show_id: i32) -> Result<Option<Show>> {
        self.show_repo().get(show_id).await
    }

    pub async fn get_show_by_name(&self, name: &str) -> Result<Option<Show>> {
        self.show_repo().get_by_name(name).await
    }

    pub async fn list_shows(&self, enabled: bool) -> Result<Vec<Show>> {
        self.show_repo().list(enabled).await
    }

    pub async fn list_shows_missing_length(&self) -> Result<Vec<Show>> {
        self.show_repo().list_missing_length().await
    }

    pub async fn list_shows_missing_stream(&self) -> Result<Vec<Show>> {
        self.show_repo().list_missing_stream().await
    }

    pub async fn list_delayed_shows(&self) -> Result<Vec<Show>> {
        self.show_repo().list_delayed().await
    }

    pub async fn set_show_enabled(&self, show_id: i32, enabled: bool) -> Result<()> {
        self.show_repo().set_enabled(show_id, enabled).await
    }

    pub async fn set_show_delayed(&self, show_id: i32, delayed: bool) -> Result<()> {
        self.show_repo().set_delayed(show_id, delayed).await
    }

    pub async fn set_show_length(&self, show_id: i32, length: i32) -> Result<()> {
        self.show_repo().set_length(show_id, length).await
    }

    pub async fn remove_show(&self, show_id: i32) -> Result<bool> {
        self.show_repo().remove(show_id).await
    }

    pub async fn add_alias(&self, show_id: i32, alias: &str) -> Result<bool> {
        self.show_repo().add_alias(show_id, alias).await
    }

    pub async fn aliases_for_show(&self, show_id: i32) -> Result<Vec<String>> {
        self.show_repo().aliases(show_id).await
    }

    pub async fn find_show_ids_by_normalized(&self, normalized: &str) -> Result<Vec<i32>> {
        self.show_repo().find_ids_by_normalized(normalized).await
    }

    // ========== Streams ==========

    /// Bind by service key. The key must name a registered service.
    pub async fn bind_stream(&self, service_key: &str, binding: &StreamBinding) -> Result<i32> {
        let service = self
            .registry_repo()
            .get_service(service_key)
            .await?
            .with_context(|| format!("unknown service key: {service_key}"))?;
        self.stream_repo().bind(service.id, binding).await
    }

    pub async fn get_stream(&self, stream_id: i32) -> Result<Option<Stream>> {
        self.stream_repo().get(stream_id).await
    }

    pub async fn find_streams_by_remote(
        &self,
        service_id: i32,
        remote_key: &str,
    ) -> Result<Vec<Stream>> {
        self.stream_repo().find_by_remote(service_id, remote_key).await
    }

    pub async fn streams_for_show(&self, show_id: i32, active: bool) -> Result<Vec<Stream>> {
        self.stream_repo().for_show(show_id, active).await
    }

    pub async fn streams_for_service(&self, service_id: i32, active: bool) -> Result<Vec<Stream>> {
        self.stream_repo().for_service(service_id, active).await
    }

    pub async fn streams_missing_name(&self, active: bool) -> Result<Vec<Stream>> {
        self.stream_repo().missing_names(active).await
    }

    pub async fn set_stream_active(&self, stream_id: i32, active: bool) -> Result<()> {
        self.stream_repo().set_active(stream_id, active).await
    }

    pub async fn set_lite_stream(
        &self,
        show_id: i32,
        service_key: Option<&str>,
        service_name: &str,
        url: &str,
    ) -> Result<()> {
        self.stream_repo()
            .set_lite(show_id, service_key, service_name, url)
            .await
    }

    pub async fn lite_streams_for_show(&self, show_id: i32) -> Result<Vec<LiteStream>> {
        self.stream_repo().lites_for_show(show_id).await
    }

    // ========== Episodes ==========

    pub async fn record_episode(
        &self,
        show_id: i32,
        episode: i32,
        post_url: Option<&str>,
    ) -> Result<()> {
        self.episode_repo().record(show_id, episode, post_url).await
    }

    pub async fn get_episode(&self, show_id: i32, episode: i32) -> Result<Option<Episode>> {
        self.episode_repo().get(show_id, episode).await
    }

    pub async fn has_episode(&self, show_id: i32, episode: i32) -> Result<bool> {
        self.episode_repo().has(show_id, episode).await
    }

    pub async fn episodes_for_show(&self, show_id: i32) -> Result<Vec<Episode>> {
        self.episode_repo().all_for_show(show_id).await
    }

    pub async fn latest_episode(&self, show_id: i32) -> Result<Option<Episode>> {
        self.episode_repo().latest_for_show(show_id).await
    }

    // ========== Ratings ==========

    pub async fn record_score(
        &self,
        show_id: i32,
        episode: i32,
        site_id: i32,
        score: f64,
    ) -> Result<()> {
        self.rating_repo()
            .record_score(show_id, episode, site_id, score)
            .await
    }

    pub async fn scores_for_episode(
        &self,
        show_id: i32,
        episode: i32,
    ) -> Result<Vec<EpisodeScore>> {
        self.rating_repo().scores_for_episode(show_id, episode).await
    }

    pub async fn scores_for_show(&self, show_id: i32) -> Result<Vec<EpisodeScore>> {
        self.rating_repo().scores_for_show(show_id).await
    }

    pub async fn record_poll(
        &self,
        show_id: i32,
        episode: i32,
        poll_site_id: i32,
        poll_id: &str,
        timestamp: i64,
        score: Option<f64>,
    ) -> Result<()> {
        self.rating_repo()
            .record_poll(show_id, episode, poll_site_id, poll_id, timestamp, score)
            .await
    }

    pub async fn set_poll_score(
        &self,
        show_id: i32,
        episode: i32,
        poll_site_id: i32,
        score: f64,
    ) -> Result<()> {
        self.rating_repo()
            .set_poll_score(show_id, episode, poll_site_id, score)
            .await
    }

    pub async fn get_poll(
        &self,
        show_id: i32,
        episode: i32,
        poll_site_id: i32,
    ) -> Result<Option<Poll>> {
        self.rating_repo().poll(show_id, episode, poll_site_id).await
    }

    pub async fn polls_for_episode(&self, show_id: i32, episode: i32) -> Result<Vec<Poll>> {
        self.rating_repo().polls_for_episode(show_id, episode).await
    }

    pub async fn polls_for_show(&self, show_id: i32) -> Result<Vec<Poll>> {
        self.rating_repo().polls_for_show(show_id).await
    }

    pub async fn polls_missing_score(&self) -> Result<Vec<Poll>> {
        self.rating_repo().polls_missing_score().await
    }

    pub async fn ratings_for_episode(&self, show_id: i32, episode: i32) -> Result<EpisodeRatings> {
        self.rating_repo().aggregate(show_id, episode).await
    }

    // ========== Registry ==========

    pub async fn sync_services(&self, handlers: &[HandlerDef]) -> Result<()> {
        self.registry_repo().sync_services(handlers).await
    }

    pub async fn upsert_service(&self, key: &str, name: &str) -> Result<()> {
        self.registry_repo().upsert_service(key, name).await
    }

    pub async fn get_service(&self, key: &str) -> Result<Option<Service>> {
        self.registry_repo().get_service(key).await
    }

    pub async fn services(&self, enabled: bool) -> Result<Vec<Service>> {
        self.registry_repo().services(enabled).await
    }

    pub async fn sync_link_sites(&self, handlers: &[HandlerDef]) -> Result<()> {
        self.registry_repo().sync_link_sites(handlers).await
    }

    pub async fn upsert_link_site(&self, key: &str, name: &str) -> Result<()> {
        self.registry_repo().upsert_link_site(key, name).await
    }

    pub async fn get_link_site(&self, key: &str) -> Result<Option<LinkSite>> {
        self.registry_repo().get_link_site(key).await
    }

    pub async fn link_sites(&self, enabled: bool) -> Result<Vec<LinkSite>> {
        self.registry_repo().link_sites(enabled).await
    }

    pub async fn upsert_poll_site(&self, key: &str) -> Result<()> {
        self.registry_repo().upsert_poll_site(key).await
    }

    pub async fn sync_poll_sites(&self, keys: &[&str]) -> Result<()> {
        self.registry_repo().sync_poll_sites(keys).await
    }

    pub async fn get_poll_site(&self, key: &str) -> Result<Option<PollSite>> {
        self.registry_repo().get_poll_site(key).await
    }

    pub async fn add_link(&self, show_id: i32, site_id: i32, site_key: &str) -> Result<bool> {
        self.registry_repo().add_link(show_id, site_id, site_key).await
    }

    pub async fn links_for_show(&self, show_id: i32) -> Result<Vec<Link>> {
        self.registry_repo().links_for_show(show_id).await
    }

    pub async fn has_link(&self, site_id: i32, site_key: &str) -> Result<bool> {
        self.registry_repo().has_link(site_id, site_key).await
    }
}
