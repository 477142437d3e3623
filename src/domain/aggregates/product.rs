//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::{Money, StockKg};
use crate::{MarketError, Result};

/// Supplier stock below this level counts as "low" on the dashboard.
pub const LOW_STOCK_KG: u32 = 10;

#[derive(Clone, Debug, Serialize)]
pub struct Product {
    id: String,
    name: String,
    category: Category,
    price_per_kg: Money,
    stock_kg: StockKg,
    emoji: String,
    supplier_id: String,
    supplier_name: String,
    delivery_radius_km: u32,
    created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Vegetables,
    Fruits,
    Grains,
    Spices,
    Oils,
    Dairy,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vegetables => "Vegetables",
            Self::Fruits => "Fruits",
            Self::Grains => "Grains",
            Self::Spices => "Spices",
            Self::Oils => "Oils",
            Self::Dairy => "Dairy",
        };
        write!(f, "{name}")
    }
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        price_per_kg: Money,
        stock_kg: StockKg,
        emoji: impl Into<String>,
        supplier_id: impl Into<String>,
        supplier_name: impl Into<String>,
        delivery_radius_km: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            price_per_kg,
            stock_kg,
            emoji: emoji.into(),
            supplier_id: supplier_id.into(),
            supplier_name: supplier_name.into(),
            delivery_radius_km,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn category(&self) -> Category {
        self.category
    }
    pub fn price_per_kg(&self) -> &Money {
        &self.price_per_kg
    }
    pub fn stock_kg(&self) -> StockKg {
        self.stock_kg
    }
    pub fn emoji(&self) -> &str {
        &self.emoji
    }
    pub fn supplier_id(&self) -> &str {
        &self.supplier_id
    }
    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }
    pub fn delivery_radius_km(&self) -> u32 {
        self.delivery_radius_km
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn in_stock(&self) -> bool {
        !self.stock_kg.is_zero()
    }
    pub fn is_low_stock(&self) -> bool {
        self.stock_kg.amount() < Decimal::from(LOW_STOCK_KG)
    }
    /// Whether an order of `quantity` kg could currently be satisfied.
    pub fn covers(&self, quantity: u32) -> bool {
        self.stock_kg.covers(quantity)
    }

    /// Take `quantity` kg out of stock. Checked and applied as one step so
    /// a failed reservation leaves the product untouched.
    pub fn reserve_stock(&mut self, quantity: u32) -> Result<()> {
        self.stock_kg = self
            .stock_kg
            .checked_sub_qty(quantity)
            .ok_or_else(|| MarketError::InsufficientStock { product_ids: vec![self.id.clone()] })?;
        Ok(())
    }

    /// Return `quantity` kg to stock after a cancelled order.
    pub fn restore_stock(&mut self, quantity: u32) {
        self.stock_kg = self.stock_kg.add_qty(quantity);
    }
}
