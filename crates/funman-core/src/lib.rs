#![deny(missing_docs)]
#![doc = "Exact bounds, half-open intervals and the shared error, logging and configuration layer of the funman engine."]

/// Sentinel-aware exact bounds and the comparator primitives.
pub mod bound;
/// Request-level analysis configuration.
pub mod config;
/// Structured error types.
pub mod errors;
/// Half-open interval algebra.
pub mod interval;
/// Per-component logging contexts.
pub mod logging;
/// Seeded sampling streams.
pub mod rng;
/// Canonical JSON and YAML helpers.
pub mod serde;

pub use bound::Bound;
pub use config::{FunmanConfig, Interpolation};
pub use errors::{ErrorInfo, FunmanError};
pub use interval::{Interval, BIG_NUMBER};
pub use logging::{install_subscriber, LogContext, Verbosity};
pub use rng::{derive_substream_seed, SampleStream};

pub use num_rational::BigRational;
