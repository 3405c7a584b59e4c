use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{self, protected, public};
use crate::middleware::{require_admin_api, require_admin_page};
use crate::pages;
use crate::state::AppState;

/// Full application router: public site, public API, guarded admin pages
/// and the guarded admin API
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(public_pages())
        .merge(public_api())
        .merge(admin_pages(state.clone()))
        .merge(admin_api(state.clone()))
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn public_pages() -> Router<AppState> {
    use pages::public;

    Router::new()
        .route("/", get(public::home))
        .route("/about", get(public::about))
        .route("/projects", get(public::projects))
        .route("/projects/:id", get(public::project_detail))
        .route("/contact", get(public::contact))
        .route("/forms/:id", get(public::form))
        .route("/login", get(public::login))
        .route("/privacy", get(public::privacy))
        .route("/terms", get(public::terms))
}

fn public_api() -> Router<AppState> {
    Router::new()
        // Session
        .route("/api/auth/login", post(public::auth::login))
        .route("/api/auth/logout", post(public::auth::logout))
        // Catalog
        .route("/api/team", get(public::catalog::team_list))
        .route("/api/projects", get(public::catalog::project_list))
        .route("/api/projects/:id", get(public::catalog::project_get))
        // Inbound requests
        .route("/api/forms/:id", get(public::forms::get))
        .route("/api/forms/:id/submit", post(public::forms::submit))
        .route("/api/contact", post(public::contact::submit))
        .route("/api/uploads/config", get(public::uploads::upload_config))
        .route("/api/webhooks/inbound-reply", post(public::webhooks::inbound_reply))
}

fn admin_pages(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(pages::admin::dashboard))
        .route("/admin/requests/:id", get(pages::admin::request_detail))
        .route("/admin/*rest", get(pages::admin::not_found))
        .route_layer(middleware::from_fn_with_state(state, require_admin_page))
}

fn admin_api(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/session", get(protected::session::current))
        .route(
            "/api/admin/team",
            get(protected::team::list).post(protected::team::create),
        )
        .route(
            "/api/admin/team/:id",
            get(protected::team::get)
                .put(protected::team::update)
                .delete(protected::team::delete),
        )
        .route(
            "/api/admin/projects",
            get(protected::projects::list).post(protected::projects::create),
        )
        .route(
            "/api/admin/projects/:id",
            get(protected::projects::get)
                .put(protected::projects::update)
                .delete(protected::projects::delete),
        )
        .route(
            "/api/admin/forms",
            get(protected::forms::list).post(protected::forms::create),
        )
        .route(
            "/api/admin/forms/:id",
            get(protected::forms::get)
                .put(protected::forms::update)
                .delete(protected::forms::delete),
        )
        .route("/api/admin/forms/:id/submissions", get(protected::forms::submissions))
        .route(
            "/api/admin/requests",
            get(protected::requests::list).post(protected::requests::create),
        )
        .route(
            "/api/admin/requests/:id",
            get(protected::requests::get)
                .put(protected::requests::update)
                .delete(protected::requests::delete),
        )
        .route("/api/admin/requests/:id/reply", post(protected::requests::reply))
        .route_layer(middleware::from_fn_with_state(state, require_admin_api))
}

/// Cross-origin access for the configured origins, with credentials so the
/// session cookie travels. `None` when CORS is disabled.
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS enabled but no valid origins configured");
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
