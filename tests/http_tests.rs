use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::Value;

use storefront::{
    app::{build_router, users::model::NewUser, AppState},
    infrastructure::{config::HttpConfig, database::Database, migrations::Migrator},
};

async fn create_test_app() -> (TestServer, AppState) {
    let db = Database::in_memory().await.expect("in-memory database");
    Migrator::builtin()
        .run(db.get_pool())
        .await
        .expect("migrations");

    let state = AppState::new(db);
    let server = TestServer::new(build_router(state.clone(), &HttpConfig::default())).unwrap();
    (server, state)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_app().await;

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_person_renders_xml() {
    let (server, _) = create_test_app().await;

    let response = server.get("/people/1").await;
    response.assert_status_ok();
    assert!(response
        .header(header::CONTENT_TYPE)
        .to_str()
        .unwrap()
        .starts_with("application/xml"));

    let body = response.text();
    assert!(body.contains("David Heinemeier Hansson"));
    assert!(body.contains("<bio>A product of Danish Design"));

    #[derive(serde::Deserialize)]
    struct Person {
        name: String,
        bio: String,
    }
    let person: Person = quick_xml::de::from_str(&body).expect("well-formed xml");
    assert_eq!(person.name, "David Heinemeier Hansson");
    assert!(person.bio.starts_with("A product of Danish Design"));
}

#[tokio::test]
async fn test_person_ignores_id_and_accepts_xml_suffix() {
    let (server, _) = create_test_app().await;

    let plain = server.get("/people/1").await.text();
    let other = server.get("/people/anything.xml").await;
    other.assert_status_ok();
    assert_eq!(other.text(), plain);
}

#[tokio::test]
async fn test_person_refuses_json() {
    let (server, _) = create_test_app().await;

    server
        .get("/people/1.json")
        .await
        .assert_status(StatusCode::NOT_ACCEPTABLE);

    server
        .get("/people/1")
        .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
        .await
        .assert_status(StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_get_existing_user() {
    let (server, state) = create_test_app().await;
    let user = state
        .user_service
        .create_user(&NewUser {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        })
        .await
        .unwrap();

    let response = server.get(&format!("/users/{}", user.id)).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], user.id);
    assert_eq!(body["data"]["name"], "Test User");
    assert_eq!(body["data"]["email"], "test@example.com");
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"]["updated_at"].is_string());

    let suffixed = server.get(&format!("/users/{}.json", user.id)).await;
    suffixed.assert_status_ok();
    let body: Value = suffixed.json();
    assert_eq!(body["data"]["id"], user.id);
}

#[tokio::test]
async fn test_missing_user_is_404() {
    let (server, _) = create_test_app().await;

    let response = server.get("/users/999").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_non_numeric_user_id_is_404() {
    let (server, _) = create_test_app().await;

    server
        .get("/users/abc")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_refuses_xml() {
    let (server, state) = create_test_app().await;
    let user = state
        .user_service
        .create_user(&NewUser {
            name: "Xml Hater".to_string(),
            email: "xml@example.com".to_string(),
        })
        .await
        .unwrap();

    server
        .get(&format!("/users/{}.xml", user.id))
        .await
        .assert_status(StatusCode::NOT_ACCEPTABLE);
}
