//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit in front of every handler,
//! currently correlation-id stamping.

pub mod request_id;

pub use request_id::{Correlate, RequestId};
