mod common;

use axum::http::{Method, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};

use common::{TestApp, ADMIN_EMAIL};
use studio_site::auth::Claims;

fn signed(secret: &str, claims: &Claims) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

#[tokio::test]
async fn admin_pages_redirect_without_cookie() {
    let app = TestApp::new();

    for path in ["/admin", "/admin/requests/anything", "/admin/settings", "/admin/projects/x"] {
        let res = app.get(path).await;
        assert_eq!(res.status, StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(res.location(), Some("/login"));
    }
}

#[tokio::test]
async fn admin_pages_redirect_on_bad_tokens() {
    let app = TestApp::new();
    let secret = app.config.security.jwt_secret.clone();

    let expired = signed(&secret, &Claims::new(ADMIN_EMAIL, -3600));
    let just_expired = signed(&secret, &Claims::new(ADMIN_EMAIL, -5));
    let forged = signed("not-the-secret", &Claims::new(ADMIN_EMAIL, 3600));

    for token in ["garbage", expired.as_str(), just_expired.as_str(), forged.as_str()] {
        let cookie = format!("admin_session={}", token);
        let res = app.request(Method::GET, "/admin", Some(&cookie), None).await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
        assert_eq!(res.location(), Some("/login"));
    }
}

#[tokio::test]
async fn valid_session_reaches_the_dashboard() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let res = app.admin_get(&cookie, "/admin").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.text.contains("Dashboard"));
    assert!(res.text.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn unknown_admin_paths_are_404_once_signed_in() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let res = app.admin_get(&cookie, "/admin/settings").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.location(), None);
}

#[tokio::test]
async fn hand_signed_token_is_accepted() {
    let app = TestApp::new();
    let token = signed(&app.config.security.jwt_secret, &Claims::new(ADMIN_EMAIL, 600));

    let res = app.admin_get(&format!("admin_session={}", token), "/api/admin/session").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["email"], ADMIN_EMAIL);
    assert_eq!(res.data()["role"], "admin");
}

#[tokio::test]
async fn admin_api_answers_401_instead_of_redirecting() {
    let app = TestApp::new();

    let res = app.get("/api/admin/requests").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    let body = res.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn public_routes_need_no_session() {
    let app = TestApp::new();

    for path in ["/", "/about", "/projects", "/contact", "/privacy", "/terms", "/login", "/api/team"] {
        let res = app.get(path).await;
        assert_eq!(res.status, StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = TestApp::new();
    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["database"], "ok");
}

#[tokio::test]
async fn upload_config_is_disabled_without_media_settings() {
    let app = TestApp::new();
    let res = app.get("/api/uploads/config").await;
    assert_eq!(res.status, StatusCode::OK);

    let data = res.data();
    assert_eq!(data["enabled"], false);
    assert!(data["cloud_name"].is_null());
    assert!(data["upload_preset"].is_null());
}
