mod error;
pub mod handlers;
mod router;
mod types;

pub use router::build_router;
pub use types::AppState;
