//! Auth Router

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    routing::{get, post, put},
};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{RoleGate, require_auth, require_role};

/// `/signup`, `/login` (public) and `/me` (authenticated)
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/me", get(handlers::me::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}

/// Admin-only routes; every request needs a valid token with the admin role
pub fn admin_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let tokens = state.tokens.clone();
    let gate = RoleGate::admin_only();

    Router::new()
        .route("/overview", get(handlers::admin_overview))
        .route(
            "/users",
            get(handlers::list_users::<R>).post(handlers::create_user::<R>),
        )
        .route("/users/{id}/role", put(handlers::update_role::<R>))
        // Layers run bottom-up: authenticate first, then check the role
        .route_layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
            require_role(gate, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(tokens, require_auth))
        .with_state(state)
}

/// Everything mounted under `/api/v1`
pub fn api_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .nest("/auth", auth_router(state.clone()))
        .nest("/admin", admin_router(state))
}
