// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{article, auth, report, scheme, weather},
    state::AppState,
    utils::token::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: register, login, plant-health, scheme, article listings.
/// * Token-protected routes: weather, article/comment/like creation.
/// * Uploaded media is served read-only under /media.
/// * Applies global middleware (Trace, CORS) and injects the app state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Per-method auth: listing stays public while creation requires a token,
    // so the bearer check is layered onto individual method routers.
    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
        .route(
            "/weather/",
            get(weather::get_weather).layer(require_auth.clone()),
        )
        .route(
            "/plant-health/",
            get(report::list_reports).post(report::create_report),
        )
        .route(
            "/scheme/",
            get(scheme::list_schemes).post(scheme::create_scheme),
        )
        .route(
            "/articles/",
            get(article::list_articles)
                .merge(post(article::create_article).layer(require_auth.clone())),
        )
        .route(
            "/articles/{id}/comments/",
            get(article::list_comments)
                .merge(post(article::create_comment).layer(require_auth.clone())),
        )
        .route(
            "/articles/{id}/like/",
            post(article::like_article).layer(require_auth),
        )
        .nest_service("/media", ServeDir::new(&state.config.upload_dir))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
