//! Video service HTTP API
//!
//! Handlers, auth, middleware and application setup. `setup::build_app` assembles a
//! router from any repository/storage pair; `setup::initialize_app` does it from `Config`.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use middleware::REQUEST_ID_HEADER;
pub use state::AppState;
