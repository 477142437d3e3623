//! Order Aggregate

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::value_objects::Money;
use crate::{MarketError, Result};

/// Days between placing an order and its delivery ETA.
pub const DELIVERY_LEAD_DAYS: i64 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    CashOnDelivery,
    Online,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CashOnDelivery => write!(f, "COD"),
            Self::Online => write!(f, "Online"),
        }
    }
}

/// Stock side effect paired with a status transition. The engine applies
/// it against the catalog before the status change is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockEffect {
    /// Pending → Packed: take the order quantity out of stock.
    Decrement,
    /// Cancelling an approved order: put the quantity back.
    Restore,
    None,
}

/// Which transitions are allowed, and what they do to stock. Everything
/// not in this table (including anything out of a terminal state) is
/// rejected.
pub fn plan_transition(from: OrderStatus, to: OrderStatus) -> Result<StockEffect> {
    use OrderStatus::*;
    match (from, to) {
        (Pending, Packed) => Ok(StockEffect::Decrement),
        (Pending, Cancelled) => Ok(StockEffect::None),
        (Packed, Shipped) => Ok(StockEffect::None),
        (Packed, Cancelled) | (Shipped, Cancelled) => Ok(StockEffect::Restore),
        (Shipped, Delivered) => Ok(StockEffect::None),
        (from, to) => Err(MarketError::InvalidTransition { from, to }),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Order {
    id: String,
    vendor_id: String,
    vendor_name: String,
    supplier_id: String,
    supplier_name: String,
    product_id: String,
    product_name: String,
    quantity: u32,
    total_price: Money,
    status: OrderStatus,
    order_date: DateTime<Utc>,
    delivery_eta: DateTime<Utc>,
    delivery_location: String,
    payment_method: PaymentMethod,
}

impl Order {
    /// Build a fresh Pending order. `unit_price` comes from the cart line,
    /// not the catalog, so a discount captured at add-to-cart time sticks.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        vendor_id: impl Into<String>,
        vendor_name: impl Into<String>,
        supplier_id: impl Into<String>,
        supplier_name: impl Into<String>,
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: &Money,
        delivery_location: impl Into<String>,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id: vendor_id.into(),
            vendor_name: vendor_name.into(),
            supplier_id: supplier_id.into(),
            supplier_name: supplier_name.into(),
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            total_price: unit_price.multiply(quantity),
            status: OrderStatus::Pending,
            order_date: now,
            delivery_eta: now + Duration::days(DELIVERY_LEAD_DAYS),
            delivery_location: delivery_location.into(),
            payment_method,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }
    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }
    pub fn supplier_id(&self) -> &str {
        &self.supplier_id
    }
    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }
    pub fn product_id(&self) -> &str {
        &self.product_id
    }
    pub fn product_name(&self) -> &str {
        &self.product_name
    }
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
    pub fn total_price(&self) -> &Money {
        &self.total_price
    }
    pub fn status(&self) -> OrderStatus {
        self.status
    }
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }
    pub fn delivery_eta(&self) -> DateTime<Utc> {
        self.delivery_eta
    }
    pub fn delivery_location(&self) -> &str {
        &self.delivery_location
    }
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Commit a transition the engine has already planned and whose stock
    /// effect has been applied. An explicit Shipped → Delivered stamps the
    /// ETA with the actual delivery instant.
    pub(crate) fn apply(&mut self, target: OrderStatus, now: DateTime<Utc>) {
        if self.status == OrderStatus::Shipped && target == OrderStatus::Delivered {
            self.delivery_eta = now;
        }
        self.status = target;
    }

    /// Time-driven auto-delivery: flips a Shipped order to Delivered once
    /// the clock has passed its ETA. Unlike `apply`, the ETA is left as it
    /// was. Returns whether anything changed, so callers stay idempotent.
    pub(crate) fn settle_delivered(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == OrderStatus::Shipped && now >= self.delivery_eta {
            self.status = OrderStatus::Delivered;
            return true;
        }
        false
    }
}
