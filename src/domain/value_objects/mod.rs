//! Value Objects for the marketplace

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency used across the marketplace.
pub const CURRENCY: &str = "INR";

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }
    pub fn inr(amount: Decimal) -> Self {
        Self::new(amount, CURRENCY)
    }
    pub fn zero(currency: &str) -> Self {
        Self::new(Decimal::ZERO, currency)
    }
    pub fn amount(&self) -> Decimal {
        self.amount
    }
    pub fn currency(&self) -> &str {
        &self.currency
    }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch);
        }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Money {
        Money::new(self.amount * Decimal::from(qty), &self.currency)
    }
    /// Price after taking `percent` off, e.g. `percent_off(20)` for a 20% discount.
    pub fn percent_off(&self, percent: u32) -> Money {
        let factor = Decimal::from(100 - percent.min(100)) / Decimal::from(100u32);
        Money::new(self.amount * factor, &self.currency)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero(CURRENCY)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone)]
pub enum MoneyError {
    CurrencyMismatch,
}
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency mismatch")
    }
}

/// Stock level in kilograms. Never negative: the only way to take stock
/// out is `checked_sub_qty`, which refuses to underflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockKg(Decimal);

impl StockKg {
    pub fn new(kg: Decimal) -> Option<Self> {
        (kg >= Decimal::ZERO).then_some(Self(kg))
    }
    pub fn amount(&self) -> Decimal {
        self.0
    }
    pub fn is_zero(&self) -> bool {
        self.0 == Decimal::ZERO
    }
    /// Whether this stock level can satisfy an order of `quantity` kg.
    pub fn covers(&self, quantity: u32) -> bool {
        self.0 >= Decimal::from(quantity)
    }
    pub fn checked_sub_qty(&self, quantity: u32) -> Option<Self> {
        let remaining = self.0 - Decimal::from(quantity);
        (remaining >= Decimal::ZERO).then_some(Self(remaining))
    }
    pub fn add_qty(&self, quantity: u32) -> Self {
        Self(self.0 + Decimal::from(quantity))
    }
}

impl Default for StockKg {
    fn default() -> Self {
        Self(Decimal::ZERO)
    }
}

impl fmt::Display for StockKg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kg", self.0)
    }
}
