use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rusqlite::{params, Connection};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt; // for `oneshot`

use wayfind_core::GraphCache;
use wayfind_service::store::RouteStore;
use wayfind_service::{build_router, AppState};

fn make_campus_db() -> tempfile::TempPath {
    let tmp = NamedTempFile::new().unwrap();
    let conn = Connection::open(tmp.path()).unwrap();
    conn.execute_batch(
        "CREATE TABLE path_segments (
             segment_id TEXT NOT NULL,
             network TEXT NOT NULL,
             geometry TEXT NOT NULL
         );
         CREATE TABLE places (
             place_id TEXT PRIMARY KEY,
             name TEXT NOT NULL,
             lat REAL NOT NULL,
             lng REAL NOT NULL,
             node_lat REAL,
             node_lng REAL,
             kind TEXT NOT NULL,
             vehicle TEXT
         );",
    )
    .unwrap();

    // One straight ~1.1 km corridor shared by all three networks
    let corridor = json!([
        [0.0, 0.0],
        [0.0, 0.002],
        [0.0, 0.004],
        [0.0, 0.006],
        [0.0, 0.008],
        [0.0, 0.01]
    ])
    .to_string();
    for (id, network) in [
        ("walk-corridor", "walking"),
        ("drive-corridor", "driving"),
        ("acc-corridor", "accessible"),
    ] {
        conn.execute(
            "INSERT INTO path_segments (segment_id, network, geometry) VALUES (?1, ?2, ?3)",
            params![id, network, corridor],
        )
        .unwrap();
    }

    let places: [(&str, &str, f64, f64, &str, Option<&str>); 6] = [
        ("kiosk", "Kiosk", 0.00005, 0.0005, "kiosk", None),
        ("gate", "Main Gate", 0.00005, 0.0, "gate", None),
        ("p-car", "East Car Parking", 0.00005, 0.009, "parking", Some("car")),
        ("p-car-2", "West Car Parking", 0.00005, 0.001, "parking", Some("car")),
        ("bldg-a", "Admin Building", 0.0001, 0.002, "building", None),
        ("bldg-b", "Library", 0.0001, 0.008, "building", None),
    ];
    for (id, name, lat, lng, kind, vehicle) in places {
        conn.execute(
            "INSERT INTO places (place_id, name, lat, lng, kind, vehicle)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, name, lat, lng, kind, vehicle],
        )
        .unwrap();
    }
    tmp.into_temp_path()
}

fn state_for(path: &std::path::Path) -> AppState {
    AppState {
        db_path: path.to_path_buf(),
        store: Arc::new(RouteStore::new(Duration::from_secs(60))),
        cache: Some(Arc::new(GraphCache::new(8))),
    }
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_routes(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/routes")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_ready_and_version() {
    let db = make_campus_db();
    let app = build_router(state_for(&db));

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = body_json(res).await;
    assert_eq!(v["ready"], true);

    let res = app
        .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = body_json(res).await;
    assert!(v.get("service_version").is_some());
    assert!(v.get("core_version").is_some());
}

#[tokio::test]
async fn walking_route_round_trip() {
    let db = make_campus_db();
    let app = build_router(state_for(&db));

    let res = app
        .clone()
        .oneshot(post_routes(json!({
            "start_id": "kiosk",
            "end_id": "bldg-b",
            "mode": "walking"
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = body_json(res).await;
    assert_eq!(v["status"], "complete");
    assert_eq!(v["route"]["phases"].as_array().unwrap().len(), 1);
    assert_eq!(v["route"]["steps"][0]["instruction"], "Start at Kiosk");
    // Pre-formatted for the kiosk display
    assert!(v["route"]["distance"].as_str().unwrap().ends_with(" m"));

    let id = v["id"].as_str().unwrap();
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/routes/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let stored = body_json(res).await;
    assert_eq!(stored["start_id"], "kiosk");
    assert_eq!(stored["end_id"], "bldg-b");

    let res = app
        .oneshot(Request::builder().uri("/routes/ffffffff0000").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn driving_from_a_building_negotiates_parking() {
    let db = make_campus_db();
    let app = build_router(state_for(&db));

    let res = app
        .clone()
        .oneshot(post_routes(json!({
            "start_id": "bldg-a",
            "end_id": "gate",
            "mode": "driving",
            "vehicle": "car"
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = body_json(res).await;
    assert_eq!(v["status"], "awaiting_parking_selection");
    assert_eq!(v["required_vehicle"], "car");

    // Retry with the chosen lot completes the route
    let res = app
        .oneshot(post_routes(json!({
            "start_id": "bldg-a",
            "end_id": "gate",
            "mode": "driving",
            "vehicle": "car",
            "parking_id": "p-car-2"
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = body_json(res).await;
    assert_eq!(v["status"], "complete");
    assert_eq!(v["route"]["parking_id"], "p-car-2");
    let phases = v["route"]["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0]["mode"], "walking");
    assert_eq!(phases[1]["mode"], "driving");
}

#[tokio::test]
async fn unknown_place_is_a_bad_request() {
    let db = make_campus_db();
    let app = build_router(state_for(&db));

    let res = app
        .oneshot(post_routes(json!({
            "start_id": "kiosk",
            "end_id": "atlantis",
            "mode": "walking"
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let v = body_json(res).await;
    assert_eq!(v["error"]["code"], "bad_request");
}

#[tokio::test]
async fn missing_parking_type_is_unprocessable() {
    let db = make_campus_db();
    let app = build_router(state_for(&db));

    let res = app
        .oneshot(post_routes(json!({
            "start_id": "kiosk",
            "end_id": "bldg-b",
            "mode": "driving",
            "vehicle": "motorcycle"
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let v = body_json(res).await;
    assert_eq!(v["error"]["code"], "no_matching_parking");
}

#[tokio::test]
async fn expired_routes_answer_gone() {
    let db = make_campus_db();
    let state = AppState {
        db_path: db.to_path_buf(),
        store: Arc::new(RouteStore::new(Duration::ZERO)),
        cache: None,
    };
    let app = build_router(state);

    let res = app
        .clone()
        .oneshot(post_routes(json!({
            "start_id": "kiosk",
            "end_id": "gate",
            "mode": "walking"
        })))
        .await
        .unwrap();
    let v = body_json(res).await;
    let id = v["id"].as_str().unwrap();

    let res = app
        .oneshot(
            Request::builder()
                .uri(format!("/routes/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::GONE);
    let v = body_json(res).await;
    assert_eq!(v["error"]["code"], "expired");
}
