//! Axum router construction.
//!
//! Public pages sit at the top level. Login-protected routes share the
//! session middleware, and each dashboard group adds a role guard inside it.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use gv_core::Role;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::auth::session_middleware;
use crate::middleware::request_id::request_id_middleware;
use crate::middleware::role::require_role;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let student_routes = Router::new()
        .route("/dashboard_student", get(routes::dashboards::dashboard_student))
        .route_layer(middleware::from_fn_with_state(Role::Student, require_role));

    let professor_routes = Router::new()
        .route("/dashboard_professor", get(routes::dashboards::dashboard_professor))
        .route("/defaulters", get(routes::dashboards::defaulters))
        .route_layer(middleware::from_fn_with_state(Role::Professor, require_role));

    // Session middleware wraps the role guards, so it runs first.
    let protected_routes = Router::new()
        .route("/logout", get(routes::auth::logout))
        .merge(student_routes)
        .merge(professor_routes)
        .route_layer(middleware::from_fn_with_state(ctx.clone(), session_middleware));

    let mut app = Router::new()
        .route("/", get(routes::index::index))
        .route(
            "/register",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route("/login", get(routes::auth::login_form).post(routes::auth::login))
        .route("/health", get(routes::health::health_check))
        .merge(protected_routes)
        .fallback(routes::not_found);

    if let Some(dir) = ctx.config.server.static_dir.as_ref() {
        if dir.is_dir() {
            tracing::info!("Serving static files from {}", dir.display());
            app = app.nest_service("/static", ServeDir::new(dir));
        } else {
            tracing::warn!("Static directory {} does not exist; /static disabled", dir.display());
        }
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
