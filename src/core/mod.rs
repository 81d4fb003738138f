//! Shared primitives for the Fieldbook engine.
//!
//! The data model, error type, notification log, and id/time helpers that
//! every engine component builds on live here.

pub mod error;
pub mod model;
pub mod notify;
pub mod seed;
pub mod time;
