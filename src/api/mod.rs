pub mod auth;
pub mod extract;
pub mod routes;
pub mod state;

pub use auth::{AuthenticatedUser, USER_ID_HEADER};
pub use extract::{AppJson, AppPath};
pub use routes::create_router;
pub use state::AppState;
