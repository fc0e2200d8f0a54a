pub mod composer;
pub mod config;
pub mod curve;
pub mod error;
pub mod feed;
pub mod selection;
pub mod solver;
pub mod types;

pub use error::CurveError;
pub use types::*;

/// Standard result type for all curve-analytics operations
pub type CurveResult<T> = Result<T, CurveError>;
