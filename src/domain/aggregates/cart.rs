//! Cart Aggregate

use serde::Serialize;

use crate::domain::value_objects::{Money, CURRENCY};
use crate::{MarketError, Result};

#[derive(Clone, Debug, Serialize)]
pub struct Cart {
    vendor_id: String,
    lines: Vec<CartLine>,
}

/// A cart line freezes the unit price at add time, so an offer price
/// captured on the offers page survives until checkout.
#[derive(Clone, Debug, Serialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub emoji: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

impl Cart {
    pub fn new(vendor_id: impl Into<String>) -> Self {
        Self { vendor_id: vendor_id.into(), lines: vec![] }
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
    /// Total kilograms across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn add_line(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            // Re-adding merges quantities and keeps the first-captured price.
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> Result<()> {
        if !self.lines.iter().any(|l| l.product_id == product_id) {
            return Err(MarketError::ProductNotFound(product_id.to_string()));
        }
        if quantity == 0 {
            self.lines.retain(|l| l.product_id != product_id);
            return Ok(());
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    pub fn remove_line(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(CURRENCY), |acc, l| acc.add(&l.line_total()).unwrap_or(acc))
    }
}
