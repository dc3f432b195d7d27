//! HTTP-level integration tests for the `/parking` endpoints.
//!
//! Cover claim/unclaim status codes and bodies, the per-user composed view,
//! snapshot failure reporting, and racing claims through the full router.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with, get, post_json, post_raw};
use serde_json::json;

fn claim_body(spot: &str, user: &str) -> serde_json::Value {
    json!({ "spot_id": spot, "user_id": user })
}

/// Flatten a `GET /parking` body into `(spot_id, status)` pairs.
fn statuses(json: &serde_json::Value) -> Vec<(String, String)> {
    json.as_array()
        .unwrap()
        .iter()
        .flat_map(|lot| lot["parking_status"].as_array().unwrap().iter())
        .map(|spot| {
            (
                spot["spot_id"].as_str().unwrap().to_string(),
                spot["status"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn status_of(json: &serde_json::Value, spot: &str) -> String {
    statuses(json)
        .into_iter()
        .find(|(id, _)| id == spot)
        .map(|(_, status)| status)
        .unwrap_or_else(|| panic!("spot {spot} missing from view"))
}

// ---------------------------------------------------------------------------
// Claim / unclaim
// ---------------------------------------------------------------------------

/// The documented claim -> foreign unclaim -> owner unclaim sequence.
#[tokio::test]
async fn claim_then_unclaim_end_to_end() {
    let t = build_test_app();

    let response = post_json(t.app(), "/parking/claim", claim_body("spot_1", "user_1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "spot_id": "spot_1" })
    );

    let response = post_json(t.app(), "/parking/unclaim", claim_body("spot_1", "user_2")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Cannot unclaim this spot");

    let response = post_json(t.app(), "/parking/unclaim", claim_body("spot_1", "user_1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "spot_id": "spot_1" })
    );

    assert_eq!(t.state.claims.lookup("spot_1").await.unwrap(), None);
}

#[tokio::test]
async fn claim_of_taken_spot_returns_409() {
    let t = build_test_app();
    post_json(t.app(), "/parking/claim", claim_body("spot_2", "user_1")).await;

    let response = post_json(t.app(), "/parking/claim", claim_body("spot_2", "user_2")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Spot already taken");
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(
        t.state.claims.lookup("spot_2").await.unwrap().as_deref(),
        Some("user_1")
    );
}

#[tokio::test]
async fn reclaim_by_owner_returns_200() {
    let t = build_test_app();
    post_json(t.app(), "/parking/claim", claim_body("spot_2", "user_1")).await;

    let response = post_json(t.app(), "/parking/claim", claim_body("spot_2", "user_1")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn numeric_user_id_from_login_can_claim_and_unclaim() {
    let t = build_test_app();

    let response = post_json(
        t.app(),
        "/parking/claim",
        json!({ "spot_id": "spot_1", "user_id": 1 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "spot_id": "spot_1" })
    );
    let mine = body_json(get(t.app(), "/parking?user_id=1").await).await;
    assert_eq!(status_of(&mine, "spot_1"), "claimed");

    // The string form of the same id owns the claim.
    let response = post_json(t.app(), "/parking/unclaim", claim_body("spot_1", "1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.state.claims.count().await.unwrap(), 0);
}

#[tokio::test]
async fn unclaim_of_unclaimed_spot_returns_403() {
    let t = build_test_app();

    let response = post_json(t.app(), "/parking/unclaim", claim_body("spot_3", "user_1")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_or_empty_ids_return_400() {
    let t = build_test_app();

    for (uri, body) in [
        ("/parking/claim", json!({ "spot_id": "spot_1" })),
        ("/parking/claim", json!({ "user_id": "user_1" })),
        ("/parking/claim", json!({ "spot_id": "", "user_id": "user_1" })),
        ("/parking/unclaim", json!({ "spot_id": null, "user_id": "user_1" })),
        ("/parking/unclaim", json!({})),
    ] {
        let response = post_json(t.app(), uri, body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{uri} with {body} should be rejected"
        );
        assert_eq!(
            body_json(response).await["error"],
            "spot_id and user_id are required"
        );
    }

    assert_eq!(t.state.claims.count().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_json_body_returns_400() {
    let t = build_test_app();

    let response = post_raw(t.app(), "/parking/claim", "{\"spot_id\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Composed view
// ---------------------------------------------------------------------------

#[tokio::test]
async fn view_without_user_is_raw_snapshot() {
    let t = build_test_app();
    post_json(t.app(), "/parking/claim", claim_body("spot_1", "user_1")).await;

    let response = get(t.app(), "/parking").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let expected: serde_json::Value = serde_json::from_str(common::LOTS_DOC).unwrap();
    assert_eq!(json, expected);
}

#[tokio::test]
async fn view_reflects_claims_per_requester() {
    let t = build_test_app();
    post_json(t.app(), "/parking/claim", claim_body("spot_1", "user_1")).await;

    let mine = body_json(get(t.app(), "/parking?user_id=user_1").await).await;
    let theirs = body_json(get(t.app(), "/parking?user_id=user_2").await).await;
    let anon = body_json(get(t.app(), "/parking").await).await;

    assert_eq!(status_of(&mine, "spot_1"), "claimed");
    assert_eq!(status_of(&theirs, "spot_1"), "taken");
    assert_eq!(status_of(&anon, "spot_1"), "available");

    // Unclaimed spots keep their sensor status.
    assert_eq!(status_of(&mine, "spot_3"), "occupied");
    assert_eq!(status_of(&theirs, "spot_2"), "available");
}

#[tokio::test]
async fn view_preserves_lot_and_spot_order() {
    let t = build_test_app();
    post_json(t.app(), "/parking/claim", claim_body("spot_4", "user_9")).await;

    let json = body_json(get(t.app(), "/parking?user_id=user_1").await).await;

    let lot_ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|lot| lot["lot_id"].as_str().unwrap())
        .collect();
    assert_eq!(lot_ids, ["Lot_A", "Lot_B"]);
    assert_eq!(
        statuses(&json),
        [
            ("spot_1".to_string(), "available".to_string()),
            ("spot_2".to_string(), "available".to_string()),
            ("spot_3".to_string(), "occupied".to_string()),
            ("spot_4".to_string(), "taken".to_string()),
        ]
    );
    assert_eq!(json[1]["zone_type"], "zone_2");
}

#[tokio::test]
async fn empty_user_id_is_treated_as_absent() {
    let t = build_test_app();
    post_json(t.app(), "/parking/claim", claim_body("spot_1", "user_1")).await;

    let json = body_json(get(t.app(), "/parking?user_id=").await).await;

    assert_eq!(status_of(&json, "spot_1"), "available");
}

#[tokio::test]
async fn view_follows_snapshot_replacement() {
    let t = build_test_app();
    post_json(t.app(), "/parking/claim", claim_body("spot_1", "user_1")).await;

    t.write_snapshot(
        r#"[{"lot_id": "Lot_A", "parking_status": [{"spot_id": "spot_1", "status": "occupied"}]}]"#,
    );
    let json = body_json(get(t.app(), "/parking").await).await;

    assert_eq!(statuses(&json), [("spot_1".to_string(), "occupied".to_string())]);

    // The claim outlives the snapshot swap.
    let json = body_json(get(t.app(), "/parking?user_id=user_1").await).await;
    assert_eq!(status_of(&json, "spot_1"), "claimed");
}

// ---------------------------------------------------------------------------
// Snapshot failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_snapshot_returns_500() {
    let t = build_test_app_with(Some("{ this is not json"));

    let response = get(t.app(), "/parking").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MALFORMED_SNAPSHOT");
    assert!(!json["error"].as_str().unwrap().contains("simulated_data"));
}

#[tokio::test]
async fn missing_snapshot_returns_503() {
    let t = build_test_app_with(None);

    let response = get(t.app(), "/parking?user_id=user_1").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SNAPSHOT_UNAVAILABLE");
}

#[tokio::test]
async fn claims_work_while_snapshot_is_missing() {
    let t = build_test_app_with(None);

    let response = post_json(t.app(), "/parking/claim", claim_body("spot_1", "user_1")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_http_claims_have_one_winner() {
    const CONTENDERS: usize = 32;
    let t = build_test_app();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let app = t.app();
            tokio::spawn(async move {
                post_json(app, "/parking/claim", claim_body("spot_2", &format!("user_{i}")))
                    .await
                    .status()
            })
        })
        .collect();

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflict, CONTENDERS - 1);
    let owner = t.state.claims.lookup("spot_2").await.unwrap().unwrap();
    assert!(owner.starts_with("user_"));
}
