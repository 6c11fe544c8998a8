/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public dashboard-backend adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod account;
pub mod client;
pub mod error;
pub mod market;
pub mod types;

// Re-export commonly used types
pub use client::{ClientConfig, Credentials, DashboardClient};
pub use error::{ClientError, Result};
pub use types::{AccountStatus, EnvironmentInfo, Quote, ScreenerRow, TradingMode};
