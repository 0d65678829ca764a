//! Web layer for the crossing status service.
//!
//! Exposes the status estimate as JSON and a health check.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
