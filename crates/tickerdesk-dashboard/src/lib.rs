/*
[INPUT]:  Public API exports for tickerdesk-dashboard crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod session;

// Re-export main types for convenience
pub use config::DashboardConfig;
pub use session::{AccountSession, environment_session, screener_session, watchlist_session};
