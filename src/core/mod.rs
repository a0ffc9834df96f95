//! Core abstractions shared across the crate
//!
//! # Modules
//!
//! - `error`: structured error handling and ingestion rejection reasons
//! - `scheduler`: cancellable background task handle

pub mod error;
pub mod scheduler;

pub use error::{AudioOperation, FaceError, RejectReason, Result};
pub use scheduler::TaskHandle;
