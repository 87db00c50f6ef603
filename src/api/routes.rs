use axum::{
    handler::Handler,
    middleware,
    routing::{get, on, MethodFilter},
    Router,
};

use crate::api::handlers::{
    create_access_token_handler, create_user_handler, find_user_handler, health_handler,
    login_handler, logout_handler, scoped_handler,
};
use crate::api::middleware::{authenticate, guard_remote_method};
use crate::api::state::ApiState;
use crate::errors::{Error, Result};
use crate::observability::trace_http_requests;
use crate::remoting::{names, MethodRegistry};

/// Bind a registered remote method to `handler`, guarded by its scopes and principal.
fn bind_method<H, T>(methods: &MethodRegistry, name: &str, handler: H) -> Result<Router<ApiState>>
where
    H: Handler<T, ApiState>,
    T: 'static,
{
    let method = methods.require(name)?;
    let filter = MethodFilter::try_from(method.verb().clone()).map_err(|err| {
        Error::config(format!("Remote method '{}' has unroutable verb: {}", name, err))
    })?;

    Ok(Router::new()
        .route(method.path(), on(filter, handler))
        .route_layer(middleware::from_fn_with_state(method.clone(), guard_remote_method)))
}

pub fn build_router(state: ApiState) -> Result<Router> {
    let methods = state.methods.clone();

    let user_routes = Router::new()
        .merge(bind_method(&methods, names::CREATE, create_user_handler)?)
        .merge(bind_method(&methods, names::LOGIN, login_handler)?)
        .merge(bind_method(&methods, names::LOGOUT, logout_handler)?)
        .merge(bind_method(&methods, names::SCOPED, scoped_handler)?)
        .merge(bind_method(&methods, names::FIND_BY_ID, find_user_handler)?)
        .merge(bind_method(&methods, names::CREATE_ACCESS_TOKEN, create_access_token_handler)?);

    let auth_layer = middleware::from_fn_with_state(state.auth.clone(), authenticate);

    Ok(Router::new()
        .route("/health", get(health_handler))
        .merge(user_routes.with_state(state).layer(auth_layer))
        .layer(middleware::from_fn(trace_http_requests)))
}
