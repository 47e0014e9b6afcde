//! Web layer for the station dashboard.
//!
//! Provides the dashboard page, the station list fragment, and the
//! detail/reload/retry endpoints.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
