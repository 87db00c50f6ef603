pub mod health;
pub mod users;

pub use health::health_handler;
pub use users::{
    create_access_token_handler, create_user_handler, find_user_handler, login_handler,
    logout_handler, scoped_handler,
};
