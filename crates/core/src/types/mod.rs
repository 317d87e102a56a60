//! Core types for Kasir.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod money;
pub mod range;

pub use cart::{Cart, CartError, CartLine, MAX_CART_LINES, Quantity, QuantityError};
pub use id::*;
pub use money::{Money, MoneyError};
pub use range::{RangeError, TimeRange, start_of_day};
