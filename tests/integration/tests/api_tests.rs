//! API Integration Tests
//!
//! Each test spawns the full HTTP stack over the in-memory store with a
//! manual clock starting at 2024-03-15T12:00:00Z; no external services are
//! needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, CommandUsageBody, EventAck, GuildSettingsBody,
    RankingBody, SummaryBody, TestServer, UserRankBody, VoiceEventBody, CHANNEL_A, CHANNEL_B,
    GUILD, TEST_EPOCH,
};
use reqwest::StatusCode;
use vc_core::{
    IdentityRepository, OpenSession, Period, SessionRepository, Snowflake, SummaryKey,
    SummaryTotals, VoiceStore, VoiceUnitOfWork,
};
use vc_db::MemoryVoiceStore;

fn summary_path(user: i64, channel: i64) -> String {
    format!("/api/v1/guilds/{GUILD}/users/{user}/voice/{channel}")
}

async fn send(server: &TestServer, event: &VoiceEventBody) -> EventAck {
    let response = server.voice_event(event).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Voice Accounting Tests
// ============================================================================

#[tokio::test]
async fn test_join_mute_leave_scenario() {
    let server = TestServer::start().await.unwrap();

    server.at(1_000);
    let ack = send(&server, &VoiceEventBody::join(7, CHANNEL_A, false)).await;
    assert_eq!(ack.transition.as_deref(), Some("JOIN"));
    assert_eq!(ack.guild_id, GUILD.to_string());

    server.at(1_500);
    let ack = send(&server, &VoiceEventBody::mute(7, CHANNEL_A, false, true)).await;
    assert_eq!(ack.transition.as_deref(), Some("MUTE_TOGGLE"));

    server.at(1_800);
    let ack = send(&server, &VoiceEventBody::leave(7, CHANNEL_A, true)).await;
    assert_eq!(ack.transition.as_deref(), Some("LEAVE"));
    assert_eq!(ack.user_id, "7");

    let response = server.get(&summary_path(7, CHANNEL_A)).await.unwrap();
    let summary: SummaryBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary.channel_id, CHANNEL_A.to_string());
    assert_eq!((summary.year, summary.month), (2024, Some(3)));
    assert_eq!(summary.totals.connection.total_seconds, 800);
    assert_eq!(summary.totals.mic_on.total_seconds, 500);
    assert_eq!(summary.totals.quiet.total_seconds, 300);
    assert_eq!(summary.totals.connection.display, "000h 13m 20s");
}

#[tokio::test]
async fn test_move_splits_channels() {
    let server = TestServer::start().await.unwrap();

    server.at(0);
    send(&server, &VoiceEventBody::join(7, CHANNEL_A, true)).await;
    server.at(120);
    let ack = send(&server, &VoiceEventBody::moved(7, CHANNEL_A, CHANNEL_B, true)).await;
    assert_eq!(ack.transition.as_deref(), Some("MOVE"));
    server.at(180);
    send(&server, &VoiceEventBody::leave(7, CHANNEL_B, true)).await;

    let a: SummaryBody = assert_json(
        server.get(&summary_path(7, CHANNEL_A)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let b: SummaryBody = assert_json(
        server.get(&summary_path(7, CHANNEL_B)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(a.totals.connection.total_seconds, 120);
    assert_eq!(b.totals.connection.total_seconds, 60);
    assert_eq!(b.totals.mic_on.total_seconds, 0);
}

#[tokio::test]
async fn test_event_without_transition_is_acknowledged() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .voice_event(&VoiceEventBody::mute(7, CHANNEL_A, true, true))
        .await
        .unwrap();
    let ack: EventAck = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ack.transition, None);
    assert!(server.store.list_open_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_event_is_rejected() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            "/api/v1/voice/events",
            &serde_json::json!({"guild_id": "abc", "user_id": "1"}),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_REQUEST_BODY");
}

#[tokio::test]
async fn test_waiting_event_reports_storage_failure() {
    let server = TestServer::start().await.unwrap();
    server.store.fail_next_commit();

    let join = VoiceEventBody::join(7, CHANNEL_A, false);
    let response = server.voice_event(&join).await.unwrap();
    let code = assert_error(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    assert_eq!(code, "DATABASE_ERROR");
    assert!(server.store.list_open_sessions().await.unwrap().is_empty());

    let ack = send(&server, &join).await;
    assert_eq!(ack.transition.as_deref(), Some("JOIN"));
    assert_eq!(server.store.list_open_sessions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_shutdown_drains_queue_and_closes_sessions() {
    let server = TestServer::start().await.unwrap();

    server.at(100);
    send(&server, &VoiceEventBody::join(7, CHANNEL_A, false)).await;

    // Queued only; the clock stays put until shutdown completes
    server.at(700);
    let response = server
        .post("/api/v1/voice/events", &VoiceEventBody::join(8, CHANNEL_B, true))
        .await
        .unwrap();
    let ack: EventAck = assert_json(response, StatusCode::ACCEPTED).await.unwrap();
    assert_eq!(ack.transition.as_deref(), Some("JOIN"));

    let store = server.shutdown().await.unwrap();
    assert!(store.list_open_sessions().await.unwrap().is_empty());

    let totals = |user: i64, channel: i64| {
        let store = store.clone();
        async move {
            let member = store
                .find_membership(Snowflake::new(GUILD), Snowflake::new(user))
                .await
                .unwrap()
                .unwrap();
            store
                .read_summary(&SummaryKey::new(
                    member.id,
                    Snowflake::new(channel),
                    Period { year: 2024, month: 3 },
                ))
                .await
                .unwrap()
        }
    };

    assert_eq!(totals(7, CHANNEL_A).await, SummaryTotals::new(600, 600));
    // Accounted by the drain, then closed at the same instant
    assert_eq!(totals(8, CHANNEL_B).await, SummaryTotals::new(0, 0));
}

#[tokio::test]
async fn test_startup_discards_stale_sessions() {
    let store = MemoryVoiceStore::new();
    {
        let mut uow = store.begin().await.unwrap();
        let member = uow
            .ensure_membership(Snowflake::new(GUILD), Snowflake::new(7), 0)
            .await
            .unwrap();
        uow.open_session(&OpenSession::new(
            member.id,
            Snowflake::new(CHANNEL_A),
            TEST_EPOCH - 10_000,
            false,
        ))
        .await
        .unwrap();
        uow.commit().await.unwrap();
    }

    let server = TestServer::start_with_store(store).await.unwrap();
    assert!(server.store.list_open_sessions().await.unwrap().is_empty());

    // The leave is counted from process start, not from the stale session
    server.at(300);
    send(&server, &VoiceEventBody::leave(7, CHANNEL_A, false)).await;

    let summary: SummaryBody = assert_json(
        server.get(&summary_path(7, CHANNEL_A)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(summary.totals.connection.total_seconds, 300);
    assert_eq!(summary.totals.mic_on.total_seconds, 300);
}

// ============================================================================
// Query Tests
// ============================================================================

#[tokio::test]
async fn test_summary_query_errors() {
    let server = TestServer::start().await.unwrap();

    let response = server.get(&summary_path(7, CHANNEL_A)).await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::NOT_FOUND).await.unwrap(),
        "NO_DATA"
    );

    let response = server
        .get(&format!("{}?year=2025", summary_path(7, CHANNEL_A)))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "FUTURE_DATE"
    );

    let response = server
        .get(&format!("{}?year=2024&month=4", summary_path(7, CHANNEL_A)))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "FUTURE_DATE"
    );

    let response = server
        .get(&format!("{}?month=13", summary_path(7, CHANNEL_A)))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "VALIDATION_ERROR"
    );

    let response = server
        .get("/api/v1/guilds/general/users/7/voice/100")
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "INVALID_PATH_PARAMETER"
    );
}

#[tokio::test]
async fn test_yearly_summary_without_rows_is_zero() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get(&format!("{}?year=2023", summary_path(7, CHANNEL_A)))
        .await
        .unwrap();
    let summary: SummaryBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary.month, None);
    assert_eq!(summary.totals.connection.total_seconds, 0);
    assert_eq!(summary.totals.quiet.display, "000h 00m 00s");
}

#[tokio::test]
async fn test_ranking_and_user_rank_agree() {
    let server = TestServer::start().await.unwrap();

    // (user, connected, unmuted)
    let sessions = [(1, 200, 100), (2, 400, 100), (3, 500, 200)];
    let mut offset = 0;
    for (user, connected, unmuted) in sessions {
        server.at(offset);
        send(&server, &VoiceEventBody::join(user, CHANNEL_A, false)).await;
        server.at(offset + unmuted);
        send(&server, &VoiceEventBody::mute(user, CHANNEL_A, false, true)).await;
        server.at(offset + connected);
        send(&server, &VoiceEventBody::leave(user, CHANNEL_A, true)).await;
        offset += connected;
    }

    // Default limit is 2
    let response = server
        .get(&format!("/api/v1/guilds/{GUILD}/voice/ranking"))
        .await
        .unwrap();
    let ranking: RankingBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ranking.guild_id, GUILD.to_string());
    assert_eq!(ranking.month, Some(3));
    let users: Vec<_> = ranking.entries.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(users, vec!["3", "2"]);

    let response = server
        .get(&format!(
            "/api/v1/guilds/{GUILD}/voice/ranking?channel_id={CHANNEL_A}&year=2024&limit=5"
        ))
        .await
        .unwrap();
    let ranking: RankingBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ranking.month, None);
    assert_eq!(ranking.entries.len(), 3);

    for entry in &ranking.entries {
        let response = server
            .get(&format!(
                "/api/v1/guilds/{GUILD}/users/{}/voice/rank?year=2024",
                entry.user_id
            ))
            .await
            .unwrap();
        let rank: UserRankBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(rank.rank, entry.rank);
        assert_eq!(rank.totals, entry.totals);
    }

    let response = server
        .get(&format!("/api/v1/guilds/{GUILD}/users/99/voice/rank"))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::NOT_FOUND).await.unwrap(),
        "NO_DATA"
    );
}

#[tokio::test]
async fn test_ranking_rejects_bad_limit() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get(&format!("/api/v1/guilds/{GUILD}/voice/ranking?limit=0"))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "VALIDATION_ERROR"
    );
}

// ============================================================================
// Guild and User Tests
// ============================================================================

#[tokio::test]
async fn test_guild_settings() {
    let server = TestServer::start().await.unwrap();
    let path = format!("/api/v1/guilds/{GUILD}/settings");

    let settings: GuildSettingsBody =
        assert_json(server.get(&path).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(settings.notification_channel, None);

    let response = server
        .put(&path, &GuildSettingsBody::update(Some(555)))
        .await
        .unwrap();
    let settings: GuildSettingsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(settings.notification_channel.as_deref(), Some("555"));
    assert_eq!(settings.guild_id.as_deref(), Some("1"));

    let settings: GuildSettingsBody =
        assert_json(server.get(&path).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(settings.notification_channel.as_deref(), Some("555"));

    let response = server
        .put(&path, &serde_json::json!({"notification_channel": "x"}))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "VALIDATION_ERROR"
    );
}

#[tokio::test]
async fn test_command_usage_counter() {
    let server = TestServer::start().await.unwrap();

    for expected in 1..=3 {
        let response = server.post_empty("/api/v1/users/42/commands").await.unwrap();
        let usage: CommandUsageBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(usage.user_id, "42");
        assert_eq!(usage.command_count, expected);
    }
}
