//! Domain models for the web application.
//!
//! Models are what repositories return and routes render. Relations that
//! can be nulled by a delete (an order's product, a customer's owner) are
//! `Option`s so a dangling reference never reaches a template unhandled.

pub mod customer;
pub mod order;
pub mod product;
pub mod profile;
pub mod session;

pub use customer::{Customer, CustomerInput, CustomerStats};
pub use order::{Order, OrderLine, ProductRef};
pub use product::{Product, ProductInput};
pub use profile::{Profile, ProfileInput};
pub use session::{CurrentUser, keys as session_keys};
