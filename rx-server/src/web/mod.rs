//! Web layer for the prescription backend.
//!
//! JSON endpoints for uploads, stored records, drug alternatives, the
//! dashboard and nearby-hospital routing.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
