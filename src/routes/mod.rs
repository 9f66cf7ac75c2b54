//! Route definitions for the admin console API.

pub mod auth;
pub mod bets;
pub mod blogs;
pub mod dashboard;
pub mod flight_plans;
pub mod flights;
pub mod health;
pub mod payouts;
pub mod players;
pub mod products;
pub mod settings;
pub mod spareparts;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = match HeaderValue::from_str(&state.config.frontend_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(origin = %state.config.frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let console_routes = Router::new()
        .route("/dashboard", get(dashboard::get_stats))
        .route("/bets", get(bets::list).post(bets::create))
        .route(
            "/bets/{id}",
            get(bets::get_by_id).put(bets::update).delete(bets::delete),
        )
        .route("/payouts", get(payouts::list).post(payouts::create))
        .route(
            "/payouts/{id}",
            get(payouts::get_by_id)
                .put(payouts::update)
                .delete(payouts::delete),
        )
        .route("/flights", get(flights::list).post(flights::create))
        .route(
            "/flights/{id}",
            get(flights::get_by_id)
                .put(flights::update)
                .delete(flights::delete),
        )
        .route(
            "/flight-plans",
            get(flight_plans::list).post(flight_plans::create),
        )
        .route(
            "/flight-plans/{id}",
            get(flight_plans::get_by_id)
                .put(flight_plans::update)
                .delete(flight_plans::delete),
        )
        .route("/settings", get(settings::list).post(settings::create))
        .route(
            "/settings/{id}",
            get(settings::get_by_id)
                .put(settings::update)
                .delete(settings::delete),
        )
        .route("/players", get(players::list))
        .route("/players/{id}", get(players::get_by_id));

    let marketplace_routes = Router::new()
        .route("/products/search", get(products::search))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route(
            "/spareparts",
            get(spareparts::list).post(spareparts::create),
        )
        .route(
            "/spareparts/{id}",
            get(spareparts::get_by_id)
                .put(spareparts::update)
                .delete(spareparts::delete),
        )
        .route("/blogs", get(blogs::list).post(blogs::create))
        .route(
            "/blogs/{id}",
            get(blogs::get_by_id).put(blogs::update).delete(blogs::delete),
        );

    let upload_routes = Router::new()
        .route("/products", get(products::list))
        .route("/upload", post(products::upload))
        .route("/upload-products-csv", post(products::import_csv));

    let body_limit = state.config.upload_max_bytes;

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .merge(auth_routes)
        .merge(upload_routes)
        .nest("/api", console_routes.merge(marketplace_routes))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
