#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use studio_site::config::AppConfig;
use studio_site::database::MemoryStore;
use studio_site::services::MemoryMailer;
use studio_site::AppState;

pub const ADMIN_EMAIL: &str = "admin@studio.test";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const ADMIN_INBOX: &str = "inbox@studio.test";
pub const WEBHOOK_SECRET: &str = "webhook-secret";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.admin_email = Some(ADMIN_EMAIL.to_string());
    config.security.admin_password = Some(ADMIN_PASSWORD.to_string());
    config.security.webhook_secret = Some(WEBHOOK_SECRET.to_string());
    config.mail.admin_address = Some(ADMIN_INBOX.to_string());
    config
}

/// The full router over an in-memory store and a recording mailer
pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<MemoryMailer>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(MemoryMailer::new())
    }

    /// App whose mail relay rejects every message
    pub fn with_failing_mail() -> Self {
        Self::with_mailer(MemoryMailer::failing())
    }

    fn with_mailer(mailer: MemoryMailer) -> Self {
        let config = test_config();
        let mailer = Arc::new(mailer);
        let state = AppState::new(config.clone(), Arc::new(MemoryStore::new()), mailer.clone());

        Self {
            router: studio_site::app(state),
            mailer,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");

        TestResponse {
            status,
            headers,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn request(&self, method: Method, path: &str, cookie: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("valid request")).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, None, Some(body)).await
    }

    /// Log in through the API and return a `Cookie` header value
    pub async fn login(&self) -> String {
        let res = self
            .post(
                "/api/auth/login",
                serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.text);

        let set_cookie = res.set_cookie().expect("login sets a cookie");
        set_cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string()
    }

    pub async fn admin_get(&self, cookie: &str, path: &str) -> TestResponse {
        self.request(Method::GET, path, Some(cookie), None).await
    }

    pub async fn admin_post(&self, cookie: &str, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(cookie), Some(body)).await
    }

    pub async fn admin_put(&self, cookie: &str, path: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(cookie), Some(body)).await
    }

    pub async fn admin_delete(&self, cookie: &str, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, Some(cookie), None).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or_else(|e| panic!("not JSON ({}): {}", e, self.text))
    }

    /// The `data` member of a success envelope
    pub fn data(&self) -> Value {
        let body = self.json();
        assert_eq!(body["success"], true, "not a success envelope: {}", self.text);
        body["data"].clone()
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}
