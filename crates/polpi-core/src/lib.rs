pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "real_estate")]
pub mod real_estate;

pub use error::PolpiError;
pub use types::*;

/// Standard result type for all polpi operations
pub type PolpiResult<T> = Result<T, PolpiError>;
