// Application layer - the session that a presentation front-end drives.
// The domain ledger stays pure; timestamps, display positions and logging live here.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
