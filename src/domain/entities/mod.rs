//! # Domain Entities
//!
//! Records persisted through the repository contracts.
//!
//! ## Trading Records
//!
//! - [`Strategy`]: configuration, status and running P&L of a strategy
//! - [`Order`]: order lifecycle from pending to a terminal state
//! - [`Trade`]: append-only execution record
//! - [`Position`]: signed holding with derived market fields
//!
//! ## Registry
//!
//! - [`ServiceInfo`]: service discovery entry

pub mod order;
pub mod position;
pub mod service_info;
pub mod strategy;
pub mod trade;

pub use order::Order;
pub use position::Position;
pub use service_info::ServiceInfo;
pub use strategy::{RiskLimits, Strategy};
pub use trade::Trade;
