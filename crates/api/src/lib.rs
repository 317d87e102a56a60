//! Kasir point-of-sale API library.
//!
//! Catalog management, checkout with all-or-nothing stock reservation, an
//! append-only sales journal and time-range sales reports, served over HTTP.
//! The binary in `main.rs` wires these to `PostgreSQL`; tests wire them to
//! the in-process store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Build the application router without transport middleware.
pub fn app(state: AppState) -> Router {
    routes::routes().with_state(state)
}
