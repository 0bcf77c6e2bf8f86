//! Salesbook web library.
//!
//! The server's modules as a library, so the CLI can reuse the migrations
//! and repositories and the pure pieces can be unit tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
