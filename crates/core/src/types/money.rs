//! Integer money amounts.
//!
//! Amounts are stored in the smallest currency unit (e.g. rupiah, cents) as
//! an `i64`. There is a single currency per deployment, so no currency code
//! is carried alongside the amount.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Money`] amount.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount is below zero.
    #[error("amount cannot be negative (got {0})")]
    Negative(i64),
    /// Arithmetic on amounts exceeded the representable range.
    #[error("amount overflow")]
    Overflow,
}

/// A non-negative amount in the smallest currency unit.
///
/// ## Examples
///
/// ```
/// use kasir_core::Money;
///
/// let price = Money::from_minor(1000).unwrap();
/// let line = price.checked_mul(3).unwrap();
/// assert_eq!(line.as_i64(), 3000);
///
/// assert!(Money::from_minor(-1).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a value in the smallest currency unit.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` if `amount` is below zero.
    pub const fn from_minor(amount: i64) -> Result<Self, MoneyError> {
        if amount < 0 {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the amount in the smallest currency unit.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Add two amounts, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the sum does not fit in an `i64`.
    pub const fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        match self.0.checked_add(other.0) {
            Some(sum) => Ok(Self(sum)),
            None => Err(MoneyError::Overflow),
        }
    }

    /// Multiply by a unit count, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product does not fit in an `i64`.
    pub fn checked_mul(self, units: i32) -> Result<Self, MoneyError> {
        let units = i64::from(units);
        if units < 0 {
            return Err(MoneyError::Negative(units));
        }
        self.0
            .checked_mul(units)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Sum an iterator of amounts, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the running total leaves the `i64` range.
    pub fn checked_sum<I>(amounts: I) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl TryFrom<i64> for Money {
    type Error = MoneyError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        Self::from_minor(amount)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Type<::sqlx::Postgres> for Money {
    fn type_info() -> ::sqlx::postgres::PgTypeInfo {
        <i64 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for Money {
    fn decode(
        value: ::sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, ::sqlx::error::BoxDynError> {
        let amount = <i64 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_minor(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Encode<'_, ::sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut ::sqlx::postgres::PgArgumentBuffer,
    ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <i64 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
