//! Kasir Core - Shared domain types.
//!
//! This crate provides the types used across all Kasir components:
//! - `api` - HTTP service for catalog, checkout and reporting
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. This keeps it lightweight and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, money, cart validation and report time ranges

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
