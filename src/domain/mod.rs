//! # Domain Layer
//!
//! Records, value objects and query objects shared by every storage
//! backend.
//!
//! - [`entities`]: strategies, orders, trades, positions and service registrations
//! - [`value_objects`]: identifiers, enums, timestamps, pagination, checked arithmetic
//! - [`queries`]: filter objects accepted by repository `query` operations
//! - [`errors`]: construction-time validation errors

pub mod entities;
pub mod errors;
pub mod queries;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
