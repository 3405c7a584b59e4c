mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

fn without_updated_at(mut record: Value) -> Value {
    record.as_object_mut().unwrap().remove("updated_at");
    record
}

#[tokio::test]
async fn team_member_missing_role_is_rejected_and_not_stored() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let res = app.admin_post(&cookie, "/api/admin/team", json!({ "name": "Ada" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["role"], "This field is required");

    let list = app.get("/api/team").await.data();
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn team_is_listed_in_display_order() {
    let app = TestApp::new();
    let cookie = app.login().await;

    for (name, order) in [("Second", 2), ("First", 1), ("Third", 3)] {
        let res = app
            .admin_post(&cookie, "/api/admin/team", json!({ "name": name, "role": "Engineer", "order": order }))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let names: Vec<String> = app
        .get("/api/team")
        .await
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);

    let about = app.get("/about").await;
    assert!(about.text.find("First").unwrap() < about.text.find("Third").unwrap());
}

#[tokio::test]
async fn team_update_merges_and_is_idempotent() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let created = app
        .admin_post(
            &cookie,
            "/api/admin/team",
            json!({
                "name": "Grace",
                "role": "Designer",
                "socials": [{ "platform": "GitHub", "url": "https://github.com/grace" }]
            }),
        )
        .await
        .data();
    let path = format!("/api/admin/team/{}", created["id"].as_str().unwrap());

    let patch = json!({ "role": "Lead designer", "order": 4 });
    let first = app.admin_put(&cookie, &path, patch.clone()).await.data();
    let second = app.admin_put(&cookie, &path, patch).await.data();

    assert_eq!(first["role"], "Lead designer");
    assert_eq!(first["name"], "Grace");
    assert_eq!(first["socials"][0]["platform"], "GitHub");
    assert_eq!(without_updated_at(first), without_updated_at(second));

    let blanked = app.admin_put(&cookie, &path, json!({ "name": "  " })).await;
    assert_eq!(blanked.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.admin_get(&cookie, &path).await.data()["name"], "Grace");
}

#[tokio::test]
async fn team_delete_then_404() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let created = app
        .admin_post(&cookie, "/api/admin/team", json!({ "name": "Linus", "role": "Engineer" }))
        .await
        .data();
    let path = format!("/api/admin/team/{}", created["id"].as_str().unwrap());

    let res = app.admin_delete(&cookie, &path).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["deleted"], true);

    assert_eq!(app.admin_get(&cookie, &path).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.admin_delete(&cookie, &path).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_defaults_and_filters() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let shop = app
        .admin_post(
            &cookie,
            "/api/admin/projects",
            json!({
                "title": "Shop",
                "short_description": "Storefront",
                "categories": ["Web", "E-commerce"],
                "tech_stack": [{ "name": "React", "category": "Frontend", "icon": "SiReact" }],
                "featured": true
            }),
        )
        .await;
    assert_eq!(shop.status, StatusCode::CREATED);
    let shop = shop.data();
    assert_eq!(shop["status"], "completed");
    assert_eq!(shop["categories"], json!(["web", "e-commerce"]));

    app.admin_post(
        &cookie,
        "/api/admin/projects",
        json!({ "title": "App", "short_description": "Mobile app", "categories": ["mobile"], "status": "in_progress" }),
    )
    .await;

    let all = app.get("/api/projects").await.data();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let web = app.get("/api/projects?category=Web").await.data();
    assert_eq!(web.as_array().unwrap().len(), 1);
    assert_eq!(web[0]["title"], "Shop");

    let active = app.get("/api/projects?status=in_progress").await.data();
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["title"], "App");

    let one = app.get(&format!("/api/projects/{}", shop["id"].as_str().unwrap())).await;
    assert_eq!(one.data()["title"], "Shop");
}

#[tokio::test]
async fn project_validation() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let cases = [
        json!({ "short_description": "No title" }),
        json!({ "title": "T", "short_description": "S", "tech_stack": [{ "icon": "rust" }] }),
        json!({ "title": "T", "short_description": "S", "live_url": "not a url" }),
    ];
    for body in cases {
        let res = app.admin_post(&cookie, "/api/admin/projects", body.clone()).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", body);
    }

    let list = app.admin_get(&cookie, "/api/admin/projects").await.data();
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn project_pages_render_records() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let project = app
        .admin_post(
            &cookie,
            "/api/admin/projects",
            json!({
                "title": "Atlas <beta>",
                "short_description": "Maps",
                "features": ["Offline tiles"],
                "tech_stack": [{ "name": "Rust", "icon": "rust" }]
            }),
        )
        .await
        .data();

    let page = app.get(&format!("/projects/{}", project["id"].as_str().unwrap())).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text.contains("Atlas &lt;beta&gt;"));
    assert!(page.text.contains("Offline tiles"));
    assert!(page.text.contains(">Rs</span>"));

    assert!(app.get("/").await.text.contains("Atlas &lt;beta&gt;"));
    assert_eq!(app.get("/projects/missing").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/projects/missing").await.status, StatusCode::NOT_FOUND);
}
