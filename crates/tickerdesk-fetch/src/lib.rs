/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public tickerdesk-fetch crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod operation;
pub mod polling;
pub mod token;

// Re-export the main types for convenience
pub use operation::{AsyncOperation, OperationConfig, OperationState};
pub use polling::PollingSession;
pub use token::{Invocation, TokenSlot};

// The cancellation primitive is part of the operation signature, so expose it
// from here rather than making every consumer depend on tokio-util directly.
pub use tokio_util::sync::CancellationToken;
