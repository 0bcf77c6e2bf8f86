//! Salesbook Core - Domain types library.
//!
//! This crate provides the types shared by the Salesbook components:
//! - `web` - The sales-management web application
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Everything here is deterministic and unit-testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, prices, stock labels and order statuses
//! - [`access`] - Ownership checks for customer-scoped resources
//! - [`pagination`] - Page requests that clamp instead of failing
//! - [`filters`] - Order and product listing filters
//! - [`reports`] - Aggregate sales report shapes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod filters;
pub mod pagination;
pub mod reports;
pub mod types;

pub use access::{AccessDenied, Owned, authorize};
pub use types::*;
