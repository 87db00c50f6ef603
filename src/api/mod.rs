//! HTTP surface: routes for the registered remote methods, the middleware
//! that authenticates callers and guards each method, and error mapping.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use server::start_api_server;
pub use state::ApiState;
