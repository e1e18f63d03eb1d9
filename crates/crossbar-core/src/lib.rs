//! Shared primitives for crossbar crates
//!
//! Holds the request context passed through every provider call and the
//! `HttpError` trait the server layer uses to render domain errors.

mod context;
mod error;

pub use context::RequestContext;
pub use error::HttpError;
