//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod rate;
pub mod request;

// Re-export main types for cleaner imports
pub use error::{ServiceError, ValidationError};
pub use rate::{RateProvider, RateResponse};
pub use request::{Period, RateRequest, RawArgs};
