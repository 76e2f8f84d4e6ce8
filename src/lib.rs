//! Commerce Domain Model
//!
//! Persistent e-commerce entities with field validation and derived-value
//! computation: catalog products (effective price, stock availability),
//! order line items (subtotal/discount/tax/total cascade), categories, and
//! the customer-tier lookup table.
//!
//! This crate is the domain layer only. Persistence, HTTP surfaces, and
//! transaction semantics belong to outer collaborators; entities expose
//! plain fields, typed relations, and `before_save` lifecycle hooks that
//! stamp timestamps, recompute derived totals, and validate declarative
//! field constraints before any record reaches storage.
//!
//! All monetary values use exact fixed-point decimals with 2 fractional
//! digits; where multiplication can produce more (tax, totals), the result
//! rounds half up.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod entities;
pub mod errors;
pub mod logging;

pub use config::{DomainConfig, DomainConfigError};
pub use entities::customer_tier::CustomerTier;
pub use entities::{category, customer_tier, order_item, product};
pub use errors::DomainError;
pub use logging::init_logging;
