/// HTTP surface. One identity router serves all three role tiers; each
/// mount carries its `Role` as a request extension. Admin tiers
/// additionally get directory routes for the scopes they may manage.
use axum::{
    http::Method,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::directory::{
    delete_account, get_account, list_accounts, register_managed, update_account, ManagedRole,
};
use crate::handlers::{auth, reset};
use crate::middleware::auth::require_auth;
use crate::models::account::Role;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/user", role_router(Role::User, &state))
        .nest("/api/admin", role_router(Role::Admin, &state))
        .nest("/api/superadmin", role_router(Role::SuperAdmin, &state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn role_router(role: Role, state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verifyotp", post(auth::verify_otp))
        .route("/resendverifyotp", post(auth::resend_verify_otp))
        .route("/forgotpassword", post(reset::forgot_password))
        .route("/resetpassword/:token", put(reset::reset_password));

    let authed = Router::new()
        .route("/changepassword", post(auth::change_password))
        .route("/update/:id", put(auth::update_profile))
        .route("/protected", get(auth::protected))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let router = match role {
        Role::User => public.merge(authed),
        Role::Admin => public.merge(authed).merge(directory_router(Role::User, state)),
        Role::SuperAdmin => public
            .merge(authed)
            .merge(directory_router(Role::User, state))
            .merge(directory_router(Role::Admin, state)),
    };

    router.layer(Extension(role))
}

/// Management routes over one target scope. Paths derive from the target
/// ("/users", "/admins"); the scope rides along as a [`ManagedRole`]
/// extension so it cannot shadow the mount's own role.
fn directory_router(target: Role, state: &AppState) -> Router<AppState> {
    let register_path = format!("/register/{}", target.as_str());
    let collection = format!("/{}s", target.as_str());
    let item = format!("/{}s/:id", target.as_str());

    Router::new()
        .route(&register_path, post(register_managed))
        .route(&collection, get(list_accounts))
        .route(
            &item,
            get(get_account).put(update_account).delete(delete_account),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .layer(Extension(ManagedRole(target)))
}
