pub mod assumptions;
pub mod error;
pub mod rent_roll;
pub mod time_value;
pub mod types;
pub mod underwriting;

#[cfg(feature = "negotiation")]
pub mod negotiation;

#[cfg(all(feature = "scenarios", feature = "negotiation"))]
pub mod analysis;

pub use error::AlphaError;
pub use types::*;

/// Standard result type for fallible re-alpha operations
pub type AlphaResult<T> = Result<T, AlphaError>;
