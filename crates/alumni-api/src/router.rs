//! Route definitions for the alumni portal HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. Protected
//! groups carry two route layers: token authentication outermost, then the
//! group's role or permission guard.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use alumni_auth::guard::AccessRequirement;

use crate::handlers;
use crate::middleware::auth::require_auth;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::middleware::rbac::{self, require_access};
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes(&state))
        .merge(role_routes(&state))
        .merge(user_routes(&state))
        .merge(alumni_routes(&state))
        .merge(health_routes());

    #[cfg(feature = "dev-endpoints")]
    let api_routes = api_routes.merge(debug_routes(&state));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_logging))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(&state.config.server.cors))
                .layer(build_compression_layer())
                .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes)),
        )
        .with_state(state)
}

/// Register and login are public; everything else needs a token.
fn auth_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/verify", get(handlers::auth::verify))
        .route(
            "/auth/profile",
            get(handlers::auth::get_profile).put(handlers::auth::update_profile),
        )
        .route(
            "/auth/change-password",
            post(handlers::auth::change_password),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
}

/// Role management, admin only.
fn role_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/roles",
            post(handlers::roles::create_role).get(handlers::roles::list_roles),
        )
        .route(
            "/roles/{id}",
            get(handlers::roles::get_role)
                .put(handlers::roles::update_role)
                .delete(handlers::roles::delete_role),
        )
        .route(
            "/roles/{id}/add-permission",
            post(handlers::roles::add_permission),
        )
        .route(
            "/roles/{id}/remove-permission",
            post(handlers::roles::remove_permission),
        )
        .route("/roles/{id}/users", get(handlers::roles::role_users))
        .route_layer(from_fn_with_state(rbac::admin(), require_access))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
}

/// User administration for staff; role assignment for admins only.
fn user_routes(state: &AppState) -> Router<AppState> {
    let staff = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/users/{id}/roles", get(handlers::users::user_roles))
        .route_layer(from_fn_with_state(rbac::staff(), require_access));

    let admin = Router::new()
        .route(
            "/users/{id}/assign-role",
            post(handlers::users::assign_role),
        )
        .route(
            "/users/{id}/remove-role",
            post(handlers::users::remove_role),
        )
        .route_layer(from_fn_with_state(rbac::admin(), require_access));

    staff
        .merge(admin)
        .route_layer(from_fn_with_state(state.clone(), require_auth))
}

/// Reads are public. Writes share paths with reads, so the guards are
/// attached per method.
fn alumni_routes(state: &AppState) -> Router<AppState> {
    let auth = || from_fn_with_state(state.clone(), require_auth);
    let guard = |requirement: AccessRequirement| from_fn_with_state(requirement, require_access);

    Router::new()
        .route(
            "/alumni",
            get(handlers::alumni::list_alumni).merge(
                post(handlers::alumni::create_alumni)
                    .route_layer(guard(rbac::directory_editor()))
                    .route_layer(auth()),
            ),
        )
        .route("/alumni/search", get(handlers::alumni::search_alumni))
        .route("/alumni/statistics", get(handlers::alumni::alumni_statistics))
        .route(
            "/alumni/{id}",
            get(handlers::alumni::get_alumni)
                .merge(
                    put(handlers::alumni::update_alumni)
                        .route_layer(guard(rbac::directory_editor()))
                        .route_layer(auth()),
                )
                .merge(
                    delete(handlers::alumni::delete_alumni)
                        .route_layer(guard(rbac::manage_alumni()))
                        .route_layer(auth()),
                ),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Empty unless running in the development environment.
#[cfg(feature = "dev-endpoints")]
fn debug_routes(state: &AppState) -> Router<AppState> {
    use alumni_core::config::Environment;

    if state.config.app.environment != Environment::Development {
        tracing::info!(
            environment = %state.config.app.environment,
            "Debug endpoints compiled in but not mounted"
        );
        return Router::new();
    }

    tracing::warn!("Debug endpoints mounted under /api/debug");
    Router::new()
        .route(
            "/debug/seed-demo-users",
            post(handlers::debug::seed_demo_users),
        )
        .route("/debug/users", get(handlers::debug::list_users))
        .route(
            "/debug/users/{username}",
            get(handlers::debug::inspect_user),
        )
}
