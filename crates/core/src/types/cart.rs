//! Cart validation.
//!
//! A [`Cart`] is the validated form of a checkout request: non-empty, every
//! quantity positive and within storage range, and no product listed twice.
//! Carts are transient and never persisted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Maximum number of distinct lines accepted in a single cart.
pub const MAX_CART_LINES: usize = 500;

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative quantity.
    #[error("quantity must be positive (got {0})")]
    NotPositive(i64),
    /// Quantity does not fit the stock column.
    #[error("quantity {0} exceeds the maximum of {max}", max = i32::MAX)]
    TooLarge(i64),
}

/// A strictly positive unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Parse a raw requested quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` for zero or negative values and
    /// `QuantityError::TooLarge` for values above `i32::MAX`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge(value))
    }

    /// Get the underlying unit count.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

/// A validated cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Units requested.
    pub quantity: Quantity,
}

/// Errors that make a cart invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The cart has no lines.
    #[error("cart is empty")]
    Empty,
    /// The cart has more lines than allowed.
    #[error("cart has {0} lines, at most {max} are allowed", max = MAX_CART_LINES)]
    TooManyLines(usize),
    /// A line has an unusable quantity.
    #[error("invalid quantity for product {product_id}: {source}")]
    InvalidQuantity {
        /// Product on the offending line.
        product_id: ProductId,
        /// Why the quantity was rejected.
        source: QuantityError,
    },
    /// The same product appears on more than one line.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
}

/// A validated, ordered set of cart lines.
///
/// ## Examples
///
/// ```
/// use kasir_core::{Cart, CartError, ProductId};
///
/// let cart = Cart::parse([(ProductId::new(1), 2), (ProductId::new(2), 1)]).unwrap();
/// assert_eq!(cart.lines().len(), 2);
///
/// assert_eq!(Cart::parse(Vec::<(ProductId, i64)>::new()), Err(CartError::Empty));
/// assert!(Cart::parse([(ProductId::new(1), 0)]).is_err());
/// assert_eq!(
///     Cart::parse([(ProductId::new(1), 1), (ProductId::new(1), 2)]),
///     Err(CartError::DuplicateProduct(ProductId::new(1)))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Validate raw `(product, quantity)` pairs in request order.
    ///
    /// # Errors
    ///
    /// Returns the first `CartError` encountered, checking lines in order.
    pub fn parse<I>(raw: I) -> Result<Self, CartError>
    where
        I: IntoIterator<Item = (ProductId, i64)>,
    {
        let mut lines = Vec::new();
        let mut seen = HashSet::new();

        for (product_id, quantity) in raw {
            let quantity = Quantity::new(quantity)
                .map_err(|source| CartError::InvalidQuantity { product_id, source })?;
            if !seen.insert(product_id) {
                return Err(CartError::DuplicateProduct(product_id));
            }
            lines.push(CartLine {
                product_id,
                quantity,
            });
        }

        if lines.is_empty() {
            return Err(CartError::Empty);
        }
        if lines.len() > MAX_CART_LINES {
            return Err(CartError::TooManyLines(lines.len()));
        }

        Ok(Self { lines })
    }

    /// Lines in request order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Product ids in request order.
    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.lines.iter().map(|line| line.product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-3), Err(QuantityError::NotPositive(-3)));
        assert_eq!(
            Quantity::new(i64::from(i32::MAX) + 1),
            Err(QuantityError::TooLarge(i64::from(i32::MAX) + 1))
        );
        assert_eq!(Quantity::new(5).unwrap().get(), 5);
    }

    #[test]
    fn test_cart_preserves_order() {
        let cart = Cart::parse([(ProductId::new(3), 1), (ProductId::new(1), 4)]).unwrap();
        let ids: Vec<_> = cart.product_ids().collect();
        assert_eq!(ids, vec![ProductId::new(3), ProductId::new(1)]);
    }

    #[test]
    fn test_cart_reports_offending_line() {
        let err = Cart::parse([(ProductId::new(1), 2), (ProductId::new(2), -1)]).unwrap_err();
        assert_eq!(
            err,
            CartError::InvalidQuantity {
                product_id: ProductId::new(2),
                source: QuantityError::NotPositive(-1),
            }
        );
    }

    #[test]
    fn test_cart_line_limit() {
        let raw = (1..=i32::try_from(MAX_CART_LINES).unwrap() + 1).map(|id| (ProductId::new(id), 1));
        assert_eq!(
            Cart::parse(raw),
            Err(CartError::TooManyLines(MAX_CART_LINES + 1))
        );
    }

    #[test]
    fn test_quantity_deserialize_rejects_zero() {
        let parsed: Result<Quantity, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
        let parsed: Quantity = serde_json::from_str("2").unwrap();
        assert_eq!(parsed.get(), 2);
    }
}
