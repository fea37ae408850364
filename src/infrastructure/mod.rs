//! # Infrastructure Layer
//!
//! - [`persistence`]: repository contracts and the in-memory reference engine
//! - [`telemetry`]: tracing subscriber setup

pub mod persistence;
pub mod telemetry;
