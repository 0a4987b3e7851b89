//! End-to-end tests for the catalog, resolver and reconciliation pipeline,
//! run against an in-memory store.

use kanon::db::Store;
use kanon::error::EngineError;
use kanon::models::event::{EpisodeEvent, PollEvent, ScoreEvent};
use kanon::models::registry::HandlerDef;
use kanon::models::show::{NewShow, ShowType};
use kanon::models::stream::StreamBinding;
use kanon::services::ingest::IngestService;
use kanon::services::resolver::{IdentityResolver, Resolution};

async fn mem_store() -> Store {
    // A single connection keeps every query on the same in-memory database.
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("failed to create in-memory store")
}

async fn seed_registry(store: &Store) {
    store
        .sync_services(&[
            HandlerDef::new("crunchyroll", "Crunchyroll"),
            HandlerDef::new("funimation", "Funimation"),
        ])
        .await
        .expect("failed to sync services");
    store
        .sync_link_sites(&[HandlerDef::new("mal", "MyAnimeList")])
        .await
        .expect("failed to sync link sites");
    store
        .sync_poll_sites(&["youtube"])
        .await
        .expect("failed to sync poll sites");
}

async fn add_show(store: &Store, name: &str) -> i32 {
    store
        .add_show(&NewShow {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .expect("failed to add show")
}

fn episode_event(service: &str, remote_key: &str, title: &str, episode: i32) -> EpisodeEvent {
    EpisodeEvent {
        service_key: service.to_string(),
        remote_key: remote_key.to_string(),
        remote_title: title.to_string(),
        remote_episode: episode,
        post_url: Some(format!("https://example.com/{remote_key}/{episode}")),
    }
}

#[tokio::test]
async fn episode_record_is_idempotent_and_replaces_url() {
    let store = mem_store().await;
    let show_id = add_show(&store, "Shirobako").await;

    store
        .record_episode(show_id, 1, Some("https://a.example/1"))
        .await
        .expect("first record failed");
    store
        .record_episode(show_id, 1, Some("https://b.example/1"))
        .await
        .expect("re-record failed");

    let episodes = store.episodes_for_show(show_id).await.expect("list failed");
    assert_eq!(episodes.len(), 1);

    let episode = store
        .get_episode(show_id, 1)
        .await
        .expect("get failed")
        .expect("episode missing");
    assert_eq!(episode.post_url.as_deref(), Some("https://b.example/1"));
}

#[tokio::test]
async fn duplicate_alias_is_ignored_not_duplicated() {
    let store = mem_store().await;
    let show_id = add_show(&store, "Barakamon").await;

    assert!(store.add_alias(show_id, "Calligraphy Boy").await.expect("add failed"));
    assert!(!store.add_alias(show_id, "Calligraphy Boy").await.expect("re-add failed"));

    let aliases = store.aliases_for_show(show_id).await.expect("aliases failed");
    // Primary name is auto-seeded as an alias on show creation.
    assert_eq!(aliases.len(), 2);
}

#[tokio::test]
async fn resolver_matches_alias_ignoring_punctuation_and_case() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "K-On!").await;

    let resolver = IdentityResolver::new(store.clone());
    let resolution = resolver
        .resolve("crunchyroll", "kon", "k on")
        .await
        .expect("resolve failed");

    assert_eq!(resolution, Resolution::Matched { show_id });
}

#[tokio::test]
async fn resolver_reports_not_found_and_ambiguity() {
    let store = mem_store().await;
    seed_registry(&store).await;

    let a = add_show(&store, "Fate Stay Night").await;
    let b = add_show(&store, "Some Other Show").await;
    // Same normalized alias registered for two shows.
    store.add_alias(b, "fate stay night").await.expect("alias failed");

    let resolver = IdentityResolver::new(store.clone());

    match resolver.resolve("crunchyroll", "x", "Nonexistent Title").await {
        Err(EngineError::NotFound { .. }) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }

    match resolver.resolve("crunchyroll", "x", "FATE stay night!").await {
        Err(EngineError::Ambiguous { matches, .. }) => {
            assert_eq!(matches, vec![a, b]);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[tokio::test]
async fn resolver_rejects_unknown_and_disabled_services() {
    let store = mem_store().await;
    seed_registry(&store).await;
    add_show(&store, "Shirobako").await;

    let resolver = IdentityResolver::new(store.clone());

    match resolver.resolve("netflix", "sb", "Shirobako").await {
        Err(EngineError::UnknownService { service }) => assert_eq!(service, "netflix"),
        other => panic!("expected UnknownService for unknown service, got {other:?}"),
    }

    // A later sync without funimation disables it.
    store
        .sync_services(&[HandlerDef::new("crunchyroll", "Crunchyroll")])
        .await
        .expect("re-sync failed");

    match resolver.resolve("funimation", "sb", "Shirobako").await {
        Err(EngineError::UnknownService { service }) => assert_eq!(service, "funimation"),
        other => panic!("expected UnknownService for disabled service, got {other:?}"),
    }
}

#[tokio::test]
async fn show_update_leaves_unset_fields_alone() {
    let store = mem_store().await;
    let show_id = add_show(&store, "Shirobako").await;

    store
        .update_show(
            show_id,
            &NewShow {
                name: "Shirobako".to_string(),
                name_en: Some("White Box".to_string()),
                length: 24,
                show_type: Some(ShowType::Tv),
                ..Default::default()
            },
        )
        .await
        .expect("update failed");

    // A second update with nothing set does not clobber the curated values.
    store
        .update_show(
            show_id,
            &NewShow {
                name: "Shirobako".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("empty update failed");

    let show = store
        .get_show(show_id)
        .await
        .expect("get failed")
        .expect("show missing");
    assert_eq!(show.name_en.as_deref(), Some("White Box"));
    assert_eq!(show.length, 24);
    assert_eq!(show.show_type, ShowType::Tv);
}

#[tokio::test]
async fn rebinding_replaces_in_place_and_keeps_id() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Shirobako").await;

    let first = StreamBinding {
        show_id,
        remote_key: "shirobako".to_string(),
        remote_id: None,
        name: Some("SHIROBAKO".to_string()),
        remote_offset: 0,
        display_offset: 0,
    };
    let id1 = store.bind_stream("crunchyroll", &first).await.expect("bind failed");

    let second = StreamBinding {
        remote_key: "shirobako-v2".to_string(),
        remote_offset: 12,
        display_offset: 1,
        ..first
    };
    let id2 = store.bind_stream("crunchyroll", &second).await.expect("rebind failed");

    assert_eq!(id1, id2);

    let streams = store.streams_for_show(show_id, true).await.expect("list failed");
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].remote_key, "shirobako-v2");
    assert_eq!(streams[0].remote_offset, 12);
    assert_eq!(streams[0].display_offset, 1);
}

#[tokio::test]
async fn duplicate_remote_key_bindings_resolve_as_ambiguous() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let a = add_show(&store, "Season One").await;
    let b = add_show(&store, "Season Two").await;

    // Nothing stops two shows sharing a remote key; resolution must not
    // pick one of them.
    for show_id in [a, b] {
        store
            .bind_stream(
                "crunchyroll",
                &StreamBinding::identity(show_id, "shared-key", None),
            )
            .await
            .expect("bind failed");
    }

    let resolver = IdentityResolver::new(store.clone());
    match resolver.resolve("crunchyroll", "shared-key", "Season One").await {
        Err(EngineError::Ambiguous { matches, .. }) => assert_eq!(matches, vec![a, b]),
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[tokio::test]
async fn service_listings_skip_streams_of_disabled_shows() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let kept = add_show(&store, "Kept Show").await;
    let dropped = add_show(&store, "Dropped Show").await;

    store
        .bind_stream("crunchyroll", &StreamBinding::identity(kept, "kept", None))
        .await
        .expect("bind failed");
    store
        .bind_stream("crunchyroll", &StreamBinding::identity(dropped, "dropped", None))
        .await
        .expect("bind failed");
    store.set_show_enabled(dropped, false).await.expect("disable failed");

    let service = store
        .get_service("crunchyroll")
        .await
        .expect("get service failed")
        .expect("service missing");

    let active = store
        .streams_for_service(service.id, true)
        .await
        .expect("list failed");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].show_id, kept);
}

#[tokio::test]
async fn ingest_translates_remote_numbering_through_offsets() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Split Cour Show").await;

    // Service counts continuously; the catalog restarts at 1 with a one
    // episode display shift.
    let binding = StreamBinding {
        show_id,
        remote_key: "scs".to_string(),
        remote_id: None,
        name: None,
        remote_offset: 12,
        display_offset: 1,
    };
    store.bind_stream("crunchyroll", &binding).await.expect("bind failed");

    let ingest = IngestService::new(store.clone());
    let outcome = ingest
        .ingest_episode(&episode_event("crunchyroll", "scs", "Split Cour Show", 13))
        .await
        .expect("ingest failed");

    assert_eq!(outcome.show_id, show_id);
    assert_eq!(outcome.canonical_episode, 2);
    assert!(!outcome.replaced);
    assert!(store.has_episode(show_id, 2).await.expect("has failed"));
    assert!(!store.has_episode(show_id, 13).await.expect("has failed"));
}

#[tokio::test]
async fn ingest_rejects_non_positive_canonical_episodes() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Offset Victim").await;

    let binding = StreamBinding {
        show_id,
        remote_key: "ov".to_string(),
        remote_id: None,
        name: None,
        remote_offset: 12,
        display_offset: 0,
    };
    store.bind_stream("crunchyroll", &binding).await.expect("bind failed");

    let ingest = IngestService::new(store.clone());
    match ingest
        .ingest_episode(&episode_event("crunchyroll", "ov", "Offset Victim", 5))
        .await
    {
        Err(EngineError::InvalidOffset { canonical, .. }) => assert_eq!(canonical, -7),
        other => panic!("expected InvalidOffset, got {other:?}"),
    }

    let episodes = store.episodes_for_show(show_id).await.expect("list failed");
    assert!(episodes.is_empty());
}

#[tokio::test]
async fn ingest_upgrades_alias_match_to_binding() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Shirobako").await;

    let ingest = IngestService::new(store.clone());
    let outcome = ingest
        .ingest_episode(&episode_event("crunchyroll", "shirobako", "SHIROBAKO!", 1))
        .await
        .expect("first ingest failed");
    assert_eq!(outcome.show_id, show_id);
    assert_eq!(outcome.canonical_episode, 1);

    // The binding created by the first ingest now short-circuits resolution,
    // even with a title that no longer matches any alias.
    let resolver = IdentityResolver::new(store.clone());
    let resolution = resolver
        .resolve("crunchyroll", "shirobako", "Completely Different Title")
        .await
        .expect("resolve failed");
    assert!(matches!(resolution, Resolution::Bound { show_id: s, .. } if s == show_id));

    let second = ingest
        .ingest_episode(&episode_event("crunchyroll", "shirobako", "SHIROBAKO!", 1))
        .await
        .expect("second ingest failed");
    assert!(second.replaced);
}

#[tokio::test]
async fn newest_score_wins_per_site() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Scored Show").await;
    store.record_episode(show_id, 1, None).await.expect("record failed");

    let ingest = IngestService::new(store.clone());
    let mut event = ScoreEvent {
        show_id,
        episode: 1,
        site_key: "mal".to_string(),
        score: 7.1,
    };
    ingest.ingest_score(&event).await.expect("first score failed");
    event.score = 8.4;
    ingest.ingest_score(&event).await.expect("second score failed");

    let scores = store
        .scores_for_episode(show_id, 1)
        .await
        .expect("scores failed");
    assert_eq!(scores.len(), 1);
    assert!((scores[0].score - 8.4).abs() < f64::EPSILON);
}

#[tokio::test]
async fn poll_re_record_replaces_and_late_tally_lands() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Polled Show").await;

    let ingest = IngestService::new(store.clone());
    let event = PollEvent {
        show_id,
        episode: 1,
        poll_site_key: "youtube".to_string(),
        poll_id: "poll-1".to_string(),
        timestamp: Some(1_700_000_000),
        score: None,
    };
    ingest.ingest_poll(&event).await.expect("first poll failed");

    let open = store.polls_missing_score().await.expect("missing failed");
    assert_eq!(open.len(), 1);

    let replacement = PollEvent {
        poll_id: "poll-1b".to_string(),
        score: Some(4.6),
        ..event
    };
    ingest.ingest_poll(&replacement).await.expect("re-poll failed");

    let polls = store.polls_for_episode(show_id, 1).await.expect("polls failed");
    assert_eq!(polls.len(), 1);
    assert_eq!(polls[0].poll_id, "poll-1b");
    assert!(polls[0].has_score());

    assert!(store.polls_missing_score().await.expect("missing failed").is_empty());
}

#[tokio::test]
async fn late_tally_lands_without_replacing_the_poll() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Polled Show").await;

    let ingest = IngestService::new(store.clone());
    for episode in [1, 2] {
        ingest
            .ingest_poll(&PollEvent {
                show_id,
                episode,
                poll_site_key: "youtube".to_string(),
                poll_id: format!("poll-{episode}"),
                timestamp: Some(1_700_000_000),
                score: None,
            })
            .await
            .expect("poll failed");
    }

    ingest
        .tally_poll(show_id, 1, "youtube", 4.2)
        .await
        .expect("tally failed");

    let site = store
        .get_poll_site("youtube")
        .await
        .expect("get site failed")
        .expect("site missing");
    let poll = store
        .get_poll(show_id, 1, site.id)
        .await
        .expect("get poll failed")
        .expect("poll missing");
    // Only the tally changed; the poll row itself survived.
    assert_eq!(poll.poll_id, "poll-1");
    assert_eq!(poll.timestamp, 1_700_000_000);
    assert!((poll.score.expect("tally missing") - 4.2).abs() < f64::EPSILON);

    let polls = store.polls_for_show(show_id).await.expect("polls failed");
    assert_eq!(polls.len(), 2);

    let open = store.polls_missing_score().await.expect("missing failed");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].episode, 2);

    // A tally for a poll that was never recorded is refused.
    assert!(ingest.tally_poll(show_id, 3, "youtube", 1.0).await.is_err());
}

#[tokio::test]
async fn unseen_poll_provider_is_registered_on_first_sight() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Polled Show").await;

    let ingest = IngestService::new(store.clone());
    let event = PollEvent {
        show_id,
        episode: 1,
        poll_site_key: "reddit".to_string(),
        poll_id: "abc".to_string(),
        timestamp: None,
        score: Some(3.2),
    };
    ingest.ingest_poll(&event).await.expect("poll failed");

    assert!(store.get_poll_site("reddit").await.expect("get failed").is_some());
    let polls = store.polls_for_episode(show_id, 1).await.expect("polls failed");
    assert_eq!(polls.len(), 1);
    assert!(polls[0].timestamp > 0);
}

#[tokio::test]
async fn ratings_aggregate_is_scoped_to_one_episode() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Scored Show").await;
    let other = add_show(&store, "Other Show").await;

    let ingest = IngestService::new(store.clone());
    for (show, episode, score) in [(show_id, 1, 7.0), (show_id, 2, 8.0), (other, 1, 3.0)] {
        ingest
            .ingest_score(&ScoreEvent {
                show_id: show,
                episode,
                site_key: "mal".to_string(),
                score,
            })
            .await
            .expect("score failed");
    }

    let ratings = store
        .ratings_for_episode(show_id, 1)
        .await
        .expect("aggregate failed");
    assert_eq!(ratings.scores.len(), 1);
    assert!((ratings.scores[0].score - 7.0).abs() < f64::EPSILON);
    assert!(ratings.polls.is_empty());
}

#[tokio::test]
async fn registry_sync_disables_everything_not_listed() {
    let store = mem_store().await;
    seed_registry(&store).await;

    assert_eq!(store.services(true).await.expect("list failed").len(), 2);

    store
        .sync_services(&[HandlerDef::new("crunchyroll", "Crunchyroll (new name)")])
        .await
        .expect("re-sync failed");

    let enabled = store.services(true).await.expect("list failed");
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].name, "Crunchyroll (new name)");

    let disabled = store.services(false).await.expect("list failed");
    assert_eq!(disabled.len(), 1);
    assert_eq!(disabled[0].key, "funimation");
}

#[tokio::test]
async fn lite_stream_replaces_by_label_with_name_fallback() {
    let store = mem_store().await;
    let show_id = add_show(&store, "Lite Show").await;

    store
        .set_lite_stream(show_id, Some("crunchyroll"), "Crunchyroll", "https://a.example")
        .await
        .expect("first set failed");
    store
        .set_lite_stream(show_id, Some("crunchyroll"), "Crunchyroll", "https://b.example")
        .await
        .expect("replace failed");
    // No registered key; the display name is the replace key.
    store
        .set_lite_stream(show_id, None, "Niconico", "https://n.example")
        .await
        .expect("fallback set failed");
    store
        .set_lite_stream(show_id, None, "Niconico", "https://n2.example")
        .await
        .expect("fallback replace failed");

    let lites = store.lite_streams_for_show(show_id).await.expect("list failed");
    assert_eq!(lites.len(), 2);

    let cr = lites.iter().find(|l| l.service == "crunchyroll").expect("missing cr");
    assert_eq!(cr.url.as_deref(), Some("https://b.example"));
    let nico = lites.iter().find(|l| l.service == "Niconico").expect("missing nico");
    assert_eq!(nico.url.as_deref(), Some("https://n2.example"));
}

#[tokio::test]
async fn repeated_link_is_suppressed_with_original_kept() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Linked Show").await;

    let ingest = IngestService::new(store.clone());
    ingest.link_show(show_id, "mal", "12345").await.expect("link failed");

    match ingest.link_show(show_id, "mal", "99999").await {
        Err(EngineError::ConflictSuppressed { .. }) => {}
        other => panic!("expected ConflictSuppressed, got {other:?}"),
    }

    let links = store.links_for_show(show_id).await.expect("links failed");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].site_key, "12345");

    let site = store
        .get_link_site("mal")
        .await
        .expect("get site failed")
        .expect("site missing");
    assert!(store.has_link(site.id, "12345").await.expect("has failed"));
    assert!(!store.has_link(site.id, "99999").await.expect("has failed"));
}

#[tokio::test]
async fn curation_listings_report_gaps() {
    let store = mem_store().await;
    seed_registry(&store).await;

    let with_stream = add_show(&store, "Covered Show").await;
    let without_stream = add_show(&store, "Uncovered Show").await;
    store.set_show_length(with_stream, 12).await.expect("length failed");

    let binding = StreamBinding {
        show_id: with_stream,
        remote_key: "cs".to_string(),
        remote_id: None,
        name: None,
        remote_offset: 0,
        display_offset: 0,
    };
    store.bind_stream("crunchyroll", &binding).await.expect("bind failed");

    let missing_length = store.list_shows_missing_length().await.expect("list failed");
    assert_eq!(missing_length.len(), 1);
    assert_eq!(missing_length[0].id, without_stream);

    let missing_stream = store.list_shows_missing_stream().await.expect("list failed");
    assert_eq!(missing_stream.len(), 1);
    assert_eq!(missing_stream[0].id, without_stream);

    let nameless = store.streams_missing_name(true).await.expect("list failed");
    assert_eq!(nameless.len(), 1);
    assert_eq!(nameless[0].remote_key, "cs");
}

#[tokio::test]
async fn removing_a_show_cascades_to_all_records() {
    let store = mem_store().await;
    seed_registry(&store).await;
    let show_id = add_show(&store, "Doomed Show").await;

    let ingest = IngestService::new(store.clone());
    ingest
        .ingest_episode(&episode_event("crunchyroll", "doomed", "Doomed Show", 1))
        .await
        .expect("ingest failed");
    ingest
        .ingest_score(&ScoreEvent {
            show_id,
            episode: 1,
            site_key: "mal".to_string(),
            score: 5.0,
        })
        .await
        .expect("score failed");
    store
        .set_lite_stream(show_id, None, "Niconico", "https://n.example")
        .await
        .expect("lite failed");

    assert!(store.remove_show(show_id).await.expect("remove failed"));

    assert!(store.get_show(show_id).await.expect("get failed").is_none());
    assert!(store.episodes_for_show(show_id).await.expect("eps failed").is_empty());
    assert!(store.streams_for_show(show_id, true).await.expect("streams failed").is_empty());
    assert!(store.scores_for_show(show_id).await.expect("scores failed").is_empty());
    assert!(store.lite_streams_for_show(show_id).await.expect("lites failed").is_empty());
    assert!(store.aliases_for_show(show_id).await.expect("aliases failed").is_empty());
}
