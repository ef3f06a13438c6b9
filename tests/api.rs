//! HTTP integration tests against an in-process server.

mod common;

use common::TestServer;
use hoops::store::Store;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("json body");
    assert!(body["data"].is_null());
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let response = server.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_mutations_require_admin_token() {
    let server = TestServer::start().await;

    let response = server
        .post_with_token("/api/games", Some(json!({})), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()["www-authenticate"],
        "Bearer realm=\"hoops\""
    );

    let response = server
        .post_with_token(
            "/api/games",
            Some(json!({})),
            Some("hoops_12345678_123456789012345678901234"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, "Invalid token");

    let games = server.get_json("/api/games").await;
    assert!(games["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_game_defaults() {
    let server = TestServer::start().await;
    let id = server.create_game(json!({ "home": "  ", "quarterMs": 12345 })).await;

    let detail = server.game(id).await;
    assert_eq!(detail["game"]["homeTeam"], "Home");
    assert_eq!(detail["game"]["awayTeam"], "Away");
    assert_eq!(detail["game"]["status"], "SCHEDULED");
    assert_eq!(detail["game"]["quarter"], 1);
    assert_eq!(detail["game"]["homeScore"], 0);
    assert!(detail["events"].as_array().unwrap().is_empty());

    // Unsupported lengths fall back to the default.
    let clock = server.clock(id).await;
    assert_eq!(clock["quarterMs"], 720_000);
    assert_eq!(clock["remainingMs"], 720_000);
    assert_eq!(clock["running"], false);
}

#[tokio::test]
async fn test_create_game_with_labels_and_length() {
    let server = TestServer::start().await;
    let id = server
        .create_game(json!({ "home": "Bulls", "away": "Knicks", "quarterMs": 600000 }))
        .await;

    let detail = server.game(id).await;
    assert_eq!(detail["game"]["homeTeam"], "Bulls");
    assert_eq!(detail["game"]["awayTeam"], "Knicks");
    assert_eq!(server.clock(id).await["quarterMs"], 600_000);

    let long = "x".repeat(65);
    let response = server.post("/api/games", Some(json!({ "home": long }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_is_single_use_and_starts_clock() {
    let server = TestServer::start().await;
    let id = server.started_game().await;

    let clock = server.clock(id).await;
    assert_eq!(clock["running"], true);

    let response = server.post(&format!("/api/games/{id}/start"), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Game is not scheduled");

    let timer = server.store.get_timer(id).unwrap().unwrap();
    assert!(timer.running);
    assert!(timer.started_at.is_some());
    assert_eq!(server.game(id).await["game"]["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn test_unknown_game_is_404() {
    let server = TestServer::start().await;

    assert_eq!(server.get("/api/games/42").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        server.get("/api/games/42/clock").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server.get("/api/games/42/fouls/summary").await.status(),
        StatusCode::NOT_FOUND
    );

    for action in ["start", "finish", "advance-quarter", "undo", "clock/start", "clock/pause"] {
        let response = server.post(&format!("/api/games/42/{action}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{action}");
    }

    let response = server
        .post("/api/games/42/score", Some(json!({ "team": "HOME", "points": 2 })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scoring_before_start_is_rejected() {
    let server = TestServer::start().await;
    let id = server.create_game(json!({})).await;

    let response = server
        .post(
            &format!("/api/games/{id}/score"),
            Some(json!({ "team": "HOME", "points": 2 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Game is not in progress");
}

#[tokio::test]
async fn test_score_validation() {
    let server = TestServer::start().await;
    let id = server.started_game().await;
    let path = format!("/api/games/{id}/score");

    for body in [
        json!({ "team": "HOME", "points": 4 }),
        json!({ "team": "VISITORS", "points": 2 }),
        json!({ "points": 2 }),
        json!({ "team": "AWAY" }),
        json!({ "team": "AWAY", "points": 2, "playerId": 0 }),
    ] {
        let response = server.post(&path, Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }

    let game = server.game(id).await;
    assert_eq!(game["game"]["homeScore"], 0);
    assert_eq!(game["game"]["awayScore"], 0);
}

#[tokio::test]
async fn test_score_remove_and_undo() {
    let server = TestServer::start().await;
    let id = server.started_game().await;

    let response = server
        .post(
            &format!("/api/games/{id}/score"),
            Some(json!({ "team": "home", "points": 3, "playerId": 11, "playerNumber": 23 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    server
        .post(
            &format!("/api/games/{id}/score"),
            Some(json!({ "team": "AWAY", "points": 2 })),
        )
        .await;

    let detail = server.game(id).await;
    assert_eq!(detail["game"]["homeScore"], 3);
    assert_eq!(detail["game"]["awayScore"], 2);
    assert_eq!(detail["events"][1]["eventType"], "POINT_3");
    assert_eq!(detail["events"][1]["playerId"], 11);
    assert_eq!(detail["events"][1]["playerNumber"], 23);

    let response = server
        .post(
            &format!("/api/games/{id}/remove-score"),
            Some(json!({ "team": "HOME" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server.post(&format!("/api/games/{id}/undo"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let detail = server.game(id).await;
    assert_eq!(detail["game"]["homeScore"], 0);
    assert_eq!(detail["game"]["awayScore"], 0);
    let kinds: Vec<&str> = detail["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["eventType"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["UNDO", "REMOVE_SCORE"]);

    let response = server
        .post(
            &format!("/api/games/{id}/remove-score"),
            Some(json!({ "team": "HOME" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No score to remove");
}

#[tokio::test]
async fn test_undo_on_empty_log() {
    let server = TestServer::start().await;
    let id = server.started_game().await;

    let response = server.post(&format!("/api/games/{id}/undo"), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No event to undo");

    let detail = server.game(id).await;
    assert_eq!(detail["game"]["quarter"], 1);
    assert_eq!(detail["game"]["homeScore"], 0);
    assert!(detail["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_winner_blocks_advance_after_regulation() {
    let server = TestServer::start().await;
    let id = server.started_game().await;

    server
        .post(
            &format!("/api/games/{id}/score"),
            Some(json!({ "team": "HOME", "points": 2 })),
        )
        .await;
    for _ in 0..3 {
        let response = server
            .post(&format!("/api/games/{id}/advance-quarter"), None)
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert_eq!(server.game(id).await["game"]["quarter"], 4);

    let response = server
        .post(&format!("/api/games/{id}/advance-quarter"), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Game must be finished: there is a winner"
    );

    let response = server.post(&format!("/api/games/{id}/finish"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let detail = server.game(id).await;
    assert_eq!(detail["game"]["status"], "FINISHED");
    assert_eq!(detail["game"]["quarter"], 4);
    assert_eq!(server.clock(id).await["running"], false);

    let response = server
        .post(
            &format!("/api/games/{id}/foul"),
            Some(json!({ "team": "AWAY" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tie_goes_to_overtime() {
    let server = TestServer::start().await;
    let id = server.started_game().await;

    for _ in 0..4 {
        let response = server
            .post(&format!("/api/games/{id}/advance-quarter"), None)
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    assert_eq!(server.game(id).await["game"]["quarter"], 5);
    let clock = server.clock(id).await;
    assert_eq!(clock["quarter"], 5);
    assert_eq!(clock["quarterMs"], 300_000);
    assert_eq!(clock["remainingMs"], 300_000);
    assert_eq!(clock["running"], false);
}

#[tokio::test]
async fn test_foul_summary_reports_bonus_and_foul_out() {
    let server = TestServer::start().await;
    let id = server.started_game().await;

    for _ in 0..5 {
        let response = server
            .post(
                &format!("/api/games/{id}/foul"),
                Some(json!({ "team": "HOME", "playerId": 7 })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let summary = server
        .get_json(&format!("/api/games/{id}/fouls/summary"))
        .await;
    let data = &summary["data"];
    assert_eq!(data["team"][0]["quarter"], 1);
    assert_eq!(data["team"][0]["team"], "HOME");
    assert_eq!(data["team"][0]["fouls"], 5);
    assert_eq!(data["team"][0]["bonus"], true);
    assert_eq!(data["team"][0]["freeThrows"], 1);
    assert_eq!(data["players"][0]["playerId"], 7);
    assert_eq!(data["players"][0]["fouls"], 5);
    assert_eq!(data["players"][0]["fouledOut"], true);

    let response = server
        .post(
            &format!("/api/games/{id}/remove-foul"),
            Some(json!({ "team": "HOME", "playerId": 7 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let summary = server
        .get_json(&format!("/api/games/{id}/fouls/summary"))
        .await;
    assert_eq!(summary["data"]["players"][0]["fouls"], 4);
    assert_eq!(summary["data"]["players"][0]["fouledOut"], false);
}

#[tokio::test]
async fn test_clock_controls() {
    let server = TestServer::start().await;
    let id = server.create_game(json!({})).await;
    let base = format!("/api/games/{id}/clock");

    let response = server.post(&format!("{base}/start"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = server.post(&format!("{base}/pause"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let paused = server.clock(id).await;
    assert_eq!(paused["running"], false);
    let remaining = paused["remainingMs"].as_i64().unwrap();
    assert!(remaining <= 720_000 && remaining > 700_000);

    // A paused clock does not move between reads.
    assert_eq!(server.clock(id).await["remainingMs"], remaining);

    let response = server
        .post(&format!("{base}/reset"), Some(json!({ "quarterMs": 30000 })))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let clock = server.clock(id).await;
    assert_eq!(clock["quarterMs"], 30_000);
    assert_eq!(clock["remainingMs"], 30_000);

    let response = server.post(&format!("{base}/reset"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(server.clock(id).await["quarterMs"], 30_000);

    let response = server
        .post(&format!("{base}/reset"), Some(json!({ "quarterMs": 1234 })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_games_newest_first() {
    let server = TestServer::start().await;
    let first = server.create_game(json!({ "home": "A" })).await;
    let second = server.create_game(json!({ "home": "B" })).await;

    let games = server.get_json("/api/games").await;
    let data = games["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["gameId"], second);
    assert_eq!(data[1]["gameId"], first);
    assert_eq!(games["hasMore"], false);

    let older = server
        .get_json(&format!("/api/games?cursor={second}"))
        .await;
    assert_eq!(older["data"].as_array().unwrap().len(), 1);

    let response = server.get("/api/games?cursor=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
