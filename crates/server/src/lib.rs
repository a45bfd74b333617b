//! HTTP surface, CLI, and terminal rendering for the pediatric case editor.

pub mod api;
pub mod cli;
pub mod render;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
