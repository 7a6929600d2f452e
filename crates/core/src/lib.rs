//! Core types for the tessera collection engine.
//!
//! This crate defines the vocabulary shared by every layer above it:
//!
//! - [`Value`]: the shared, refcounted value object with cached integer
//!   encoding
//! - [`Literal`]: the borrowed-or-owned single-element view containers use
//!   to exchange elements across encodings
//! - [`Error`] / [`Result`]: the unified error type with stable wire
//!   messages
//! - [`CollectionLimits`]: the encoding-promotion thresholds
//!
//! Nothing here knows about keys, commands or clients; those live in
//! `tessera-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod literal;
pub mod value;

pub use error::{Error, Result};
pub use limits::CollectionLimits;
pub use literal::Literal;
pub use value::{parse_i64_strict, Value};
