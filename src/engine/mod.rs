//! Order Engine
//!
//! Owns the order lifecycle and the paired stock accounting:
//!
//! - checkout creates Pending orders after an all-or-nothing availability
//!   check, without touching stock (suppliers confirm first);
//! - approval (Pending → Packed) is the one place stock is decremented,
//!   checked and applied under a single write guard;
//! - cancelling an approved order is the one place stock is restored;
//! - listing settles time-driven auto-delivery before reading.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::aggregates::order::{plan_transition, StockEffect};
use crate::domain::aggregates::{CartLine, Order, OrderStatus, PaymentMethod, Product};
use crate::domain::events::{DomainEvent, OrderEvent, ProductEvent};
use crate::store::{MarketState, MarketStore};
use crate::{MarketError, Result};

#[derive(Clone, Debug)]
pub struct OrderEngine {
    store: Arc<MarketStore>,
}

/// Per-user order counts for the dashboard; `low_stock` only for suppliers.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardStats {
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<usize>,
}

impl OrderEngine {
    pub fn new(store: Arc<MarketStore>) -> Self {
        Self { store }
    }

    /// Checkout: turn cart lines into Pending orders, one per product.
    ///
    /// The availability check covers the whole batch before anything is
    /// created; one offending line fails everything with the offending
    /// product ids, so the caller can drop them from the cart and retry.
    /// Stock is NOT decremented here. The new orders land at the front of
    /// the order store (most recent first). Clearing the cart is the
    /// caller's job.
    pub fn create_orders(
        &self,
        vendor_id: &str,
        lines: &[CartLine],
        delivery_location: &str,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        if lines.is_empty() {
            return Err(MarketError::EmptyCart);
        }
        if lines.iter().any(|l| l.quantity == 0) {
            return Err(MarketError::InvalidQuantity);
        }

        let mut state = self.store.write();
        let vendor = state
            .user(vendor_id)
            .ok_or_else(|| MarketError::UserNotFound(vendor_id.to_string()))?
            .clone();

        let offending: Vec<String> = lines
            .iter()
            .filter(|l| state.product(&l.product_id).map_or(true, |p| !p.covers(l.quantity)))
            .map(|l| l.product_id.clone())
            .collect();
        if !offending.is_empty() {
            return Err(MarketError::InsufficientStock { product_ids: offending });
        }

        let mut created = Vec::with_capacity(lines.len());
        for line in lines {
            // The availability pass above guarantees the lookup succeeds.
            let Some(product) = state.product(&line.product_id) else {
                return Err(MarketError::ProductNotFound(line.product_id.clone()));
            };
            created.push(Order::place(
                vendor.uid(),
                vendor.name(),
                product.supplier_id(),
                product.supplier_name(),
                product.id(),
                product.name(),
                line.quantity,
                &line.unit_price,
                delivery_location,
                payment_method,
                now,
            ));
        }

        for order in &created {
            state.record(DomainEvent::Order(OrderEvent::Placed {
                order_id: order.id().to_string(),
                vendor_id: order.vendor_id().to_string(),
                product_id: order.product_id().to_string(),
                quantity: order.quantity(),
            }));
        }
        state.orders.splice(0..0, created.iter().cloned());
        Ok(created)
    }

    /// Drive one status transition, applying its stock effect first so a
    /// failed approval leaves both the order and the product untouched.
    pub fn update_status(
        &self,
        order_id: &str,
        target: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        let mut state = self.store.write();

        let (from, product_id, quantity) = {
            let order = state
                .order(order_id)
                .ok_or_else(|| MarketError::OrderNotFound(order_id.to_string()))?;
            (order.status(), order.product_id().to_string(), order.quantity())
        };
        let effect = plan_transition(from, target)?;

        match effect {
            StockEffect::Decrement => {
                let product = state
                    .product_mut(&product_id)
                    .ok_or_else(|| MarketError::ProductNotFound(product_id.clone()))?;
                product.reserve_stock(quantity)?;
                let remaining_kg = product.stock_kg().amount();
                state.record(DomainEvent::Product(ProductEvent::StockDecremented {
                    product_id,
                    quantity,
                    remaining_kg,
                }));
            }
            StockEffect::Restore => {
                let product = state
                    .product_mut(&product_id)
                    .ok_or_else(|| MarketError::ProductNotFound(product_id.clone()))?;
                product.restore_stock(quantity);
                let remaining_kg = product.stock_kg().amount();
                state.record(DomainEvent::Product(ProductEvent::StockRestored {
                    product_id,
                    quantity,
                    remaining_kg,
                }));
            }
            StockEffect::None => {}
        }

        let order = state
            .order_mut(order_id)
            .ok_or_else(|| MarketError::OrderNotFound(order_id.to_string()))?;
        order.apply(target, now);
        let updated = order.clone();

        let event = match target {
            OrderStatus::Packed => Some(OrderEvent::Approved { order_id: order_id.to_string() }),
            OrderStatus::Shipped => Some(OrderEvent::Shipped { order_id: order_id.to_string() }),
            OrderStatus::Delivered => {
                Some(OrderEvent::Delivered { order_id: order_id.to_string(), auto: false })
            }
            OrderStatus::Cancelled => Some(OrderEvent::Cancelled {
                order_id: order_id.to_string(),
                restocked: effect == StockEffect::Restore,
            }),
            OrderStatus::Pending => None,
        };
        if let Some(event) = event {
            state.record(DomainEvent::Order(event));
        }
        Ok(updated)
    }

    /// A vendor's orders, auto-delivery settled, newest first.
    pub fn orders_for_vendor(&self, vendor_id: &str, now: DateTime<Utc>) -> Vec<Order> {
        let mut state = self.store.write();
        settle_auto_delivery(&mut state, now);
        sorted_orders(&state, |o| o.vendor_id() == vendor_id)
    }

    /// A supplier's incoming orders, auto-delivery settled, newest first.
    pub fn orders_for_supplier(&self, supplier_id: &str, now: DateTime<Utc>) -> Vec<Order> {
        let mut state = self.store.write();
        settle_auto_delivery(&mut state, now);
        sorted_orders(&state, |o| o.supplier_id() == supplier_id)
    }

    pub fn order(&self, order_id: &str) -> Result<Order> {
        self.store
            .read()
            .order(order_id)
            .cloned()
            .ok_or_else(|| MarketError::OrderNotFound(order_id.to_string()))
    }

    pub fn product(&self, product_id: &str) -> Result<Product> {
        self.store.product(product_id)
    }

    pub fn dashboard(&self, user_id: &str, now: DateTime<Utc>) -> Result<DashboardStats> {
        let mut state = self.store.write();
        settle_auto_delivery(&mut state, now);

        let user = state
            .user(user_id)
            .ok_or_else(|| MarketError::UserNotFound(user_id.to_string()))?
            .clone();
        let mine: Vec<&Order> = state
            .orders
            .iter()
            .filter(|o| {
                if user.is_vendor() {
                    o.vendor_id() == user.uid()
                } else {
                    o.supplier_id() == user.uid()
                }
            })
            .collect();

        let count = |status: OrderStatus| mine.iter().filter(|o| o.status() == status).count();
        let low_stock = user.is_supplier().then(|| {
            state
                .products
                .iter()
                .filter(|p| p.supplier_id() == user.uid() && p.is_low_stock())
                .count()
        });
        Ok(DashboardStats {
            pending: count(OrderStatus::Pending),
            active: count(OrderStatus::Packed) + count(OrderStatus::Shipped),
            completed: count(OrderStatus::Delivered),
            low_stock,
        })
    }
}

/// Flip every Shipped order whose ETA has passed to Delivered. Runs before
/// each listing; idempotent, so redundant triggering from the vendor and
/// supplier paths is harmless.
fn settle_auto_delivery(state: &mut MarketState, now: DateTime<Utc>) {
    let mut delivered = Vec::new();
    for order in state.orders.iter_mut() {
        if order.settle_delivered(now) {
            delivered.push(order.id().to_string());
        }
    }
    for order_id in delivered {
        state.record(DomainEvent::Order(OrderEvent::Delivered { order_id, auto: true }));
    }
}

fn sorted_orders(state: &MarketState, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
    let mut orders: Vec<Order> = state.orders.iter().filter(|o| keep(o)).cloned().collect();
    orders.sort_by(|a, b| b.order_date().cmp(&a.order_date()));
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::Category;
    use crate::domain::aggregates::user::UserRole;
    use crate::domain::aggregates::User;
    use crate::domain::value_objects::{Money, StockKg};
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn product(id: &str, price: i64, stock: i64, supplier_id: &str, now: DateTime<Utc>) -> Product {
        Product::new(
            id,
            id,
            Category::Vegetables,
            Money::inr(Decimal::new(price, 0)),
            StockKg::new(Decimal::new(stock, 0)).unwrap(),
            "🥕",
            supplier_id,
            "Test Farm",
            20,
            now,
        )
    }

    fn setup(stocks: &[(&str, i64)]) -> (Arc<MarketStore>, OrderEngine, DateTime<Utc>) {
        let now = Utc::now();
        let products =
            stocks.iter().map(|(id, stock)| product(id, 45, *stock, "sup1", now)).collect();
        let users = vec![
            User::new("ven1", "Saravana Snacks", "saravana@example.com", "9840011001", UserRole::Vendor, "T. Nagar", true, now),
            User::new("sup1", "Test Farm", "farm@example.com", "9840022001", UserRole::Supplier, "Red Hills", true, now),
        ];
        let store = Arc::new(MarketStore::new(products, users));
        let engine = OrderEngine::new(Arc::clone(&store));
        (store, engine, now)
    }

    fn line(product_id: &str, quantity: u32, price: i64) -> CartLine {
        CartLine {
            product_id: product_id.into(),
            name: product_id.into(),
            emoji: "🥕".into(),
            quantity,
            unit_price: Money::inr(Decimal::new(price, 0)),
        }
    }

    fn stock_of(store: &MarketStore, id: &str) -> Decimal {
        store.product(id).unwrap().stock_kg().amount()
    }

    fn place_one(engine: &OrderEngine, qty: u32, now: DateTime<Utc>) -> Order {
        let orders = engine
            .create_orders("ven1", &[line("prod1", qty, 45)], "T. Nagar", PaymentMethod::CashOnDelivery, now)
            .unwrap();
        orders.into_iter().next().unwrap()
    }

    #[test]
    fn test_create_checks_stock_but_does_not_decrement() {
        let (store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.delivery_eta(), now + Duration::days(3));
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));
    }

    #[test]
    fn test_total_price_uses_cart_price_not_catalog() {
        let (_store, engine, now) = setup(&[("prod1", 10)]);
        // Catalog price is 45; the cart captured a discounted 36.
        let orders = engine
            .create_orders("ven1", &[line("prod1", 4, 36)], "T. Nagar", PaymentMethod::Online, now)
            .unwrap();
        assert_eq!(orders[0].total_price().amount(), Decimal::new(144, 0));
    }

    #[test]
    fn test_batch_atomicity() {
        let (store, engine, now) = setup(&[("prod1", 10), ("prod2", 3)]);
        let err = engine
            .create_orders(
                "ven1",
                &[line("prod1", 4, 45), line("prod2", 5, 45)],
                "T. Nagar",
                PaymentMethod::CashOnDelivery,
                now,
            )
            .unwrap_err();
        match err {
            MarketError::InsufficientStock { product_ids } => {
                assert_eq!(product_ids, vec!["prod2".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(engine.orders_for_vendor("ven1", now).is_empty());
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));
    }

    #[test]
    fn test_unknown_product_fails_whole_batch() {
        let (_store, engine, now) = setup(&[("prod1", 10)]);
        let err = engine
            .create_orders(
                "ven1",
                &[line("prod1", 4, 45), line("prod9", 1, 45)],
                "T. Nagar",
                PaymentMethod::CashOnDelivery,
                now,
            )
            .unwrap_err();
        assert!(matches!(err, MarketError::InsufficientStock { .. }));
        assert!(engine.orders_for_vendor("ven1", now).is_empty());
    }

    #[test]
    fn test_empty_and_zero_quantity_batches() {
        let (_store, engine, now) = setup(&[("prod1", 10)]);
        assert!(matches!(
            engine.create_orders("ven1", &[], "T. Nagar", PaymentMethod::Online, now),
            Err(MarketError::EmptyCart)
        ));
        assert!(matches!(
            engine.create_orders("ven1", &[line("prod1", 0, 45)], "T. Nagar", PaymentMethod::Online, now),
            Err(MarketError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_approve_decrements_exactly_once() {
        let (store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);

        let updated = engine.update_status(order.id(), OrderStatus::Packed, now).unwrap();
        assert_eq!(updated.status(), OrderStatus::Packed);
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(6u32));

        // Re-approving is not a valid transition and must not touch stock.
        let err = engine.update_status(order.id(), OrderStatus::Packed, now).unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition { .. }));
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(6u32));
    }

    #[test]
    fn test_approval_race_rejects_second_order() {
        let (store, engine, now) = setup(&[("prod1", 6)]);
        let first = place_one(&engine, 4, now);
        let second = place_one(&engine, 4, now);

        engine.update_status(first.id(), OrderStatus::Packed, now).unwrap();
        let err = engine.update_status(second.id(), OrderStatus::Packed, now).unwrap_err();
        assert!(matches!(err, MarketError::InsufficientStock { .. }));

        // The rejected approval left no partial mutation behind.
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(2u32));
        assert_eq!(engine.order(second.id()).unwrap().status(), OrderStatus::Pending);
    }

    #[test]
    fn test_cancel_pending_does_not_restore() {
        let (store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);
        engine.update_status(order.id(), OrderStatus::Cancelled, now).unwrap();
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));
    }

    #[test]
    fn test_cancel_packed_restores_once() {
        let (store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);
        engine.update_status(order.id(), OrderStatus::Packed, now).unwrap();
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(6u32));

        engine.update_status(order.id(), OrderStatus::Cancelled, now).unwrap();
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));

        // Cancelled is terminal: a second cancel restores nothing.
        let err = engine.update_status(order.id(), OrderStatus::Cancelled, now).unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition { .. }));
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));
    }

    #[test]
    fn test_cancel_shipped_restores() {
        let (store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);
        engine.update_status(order.id(), OrderStatus::Packed, now).unwrap();
        engine.update_status(order.id(), OrderStatus::Shipped, now).unwrap();
        engine.update_status(order.id(), OrderStatus::Cancelled, now).unwrap();
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));
    }

    #[test]
    fn test_approve_cancel_reapprove_round_trip() {
        // Stock 10; order 4 kg; approve; cancel; approval again is rejected.
        let (store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));

        engine.update_status(order.id(), OrderStatus::Packed, now).unwrap();
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(6u32));

        engine.update_status(order.id(), OrderStatus::Cancelled, now).unwrap();
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));

        assert!(engine.update_status(order.id(), OrderStatus::Packed, now).is_err());
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(10u32));
    }

    #[test]
    fn test_explicit_delivery_stamps_eta() {
        let (_store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);
        engine.update_status(order.id(), OrderStatus::Packed, now).unwrap();
        engine.update_status(order.id(), OrderStatus::Shipped, now).unwrap();

        let delivered_at = now + Duration::days(1);
        let updated = engine.update_status(order.id(), OrderStatus::Delivered, delivered_at).unwrap();
        assert_eq!(updated.delivery_eta(), delivered_at);
    }

    #[test]
    fn test_auto_delivery_on_listing_is_idempotent() {
        let (_store, engine, now) = setup(&[("prod1", 10)]);
        let order = place_one(&engine, 4, now);
        engine.update_status(order.id(), OrderStatus::Packed, now).unwrap();
        engine.update_status(order.id(), OrderStatus::Shipped, now).unwrap();
        let eta = engine.order(order.id()).unwrap().delivery_eta();

        let later = now + Duration::days(4);
        // Vendor and supplier listings both observe the flip; only the first
        // mutates anything.
        let seen_by_vendor = engine.orders_for_vendor("ven1", later);
        assert_eq!(seen_by_vendor[0].status(), OrderStatus::Delivered);
        let seen_by_supplier = engine.orders_for_supplier("sup1", later);
        assert_eq!(seen_by_supplier[0].status(), OrderStatus::Delivered);

        // Auto-delivery keeps the original ETA.
        assert_eq!(engine.order(order.id()).unwrap().delivery_eta(), eta);
    }

    #[test]
    fn test_listing_is_newest_first() {
        let (_store, engine, now) = setup(&[("prod1", 100)]);
        place_one(&engine, 1, now);
        place_one(&engine, 2, now + Duration::hours(1));
        place_one(&engine, 3, now + Duration::hours(2));
        let orders = engine.orders_for_vendor("ven1", now + Duration::hours(3));
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].quantity(), 3);
        assert_eq!(orders[2].quantity(), 1);
    }

    #[test]
    fn test_stock_never_negative_through_sequence() {
        let (store, engine, now) = setup(&[("prod1", 9)]);
        let a = place_one(&engine, 4, now);
        let b = place_one(&engine, 4, now);
        let c = place_one(&engine, 4, now);

        for step in [a.id(), b.id(), c.id()] {
            let _ = engine.update_status(step, OrderStatus::Packed, now);
            assert!(stock_of(&store, "prod1") >= Decimal::ZERO);
        }
        // Two approvals fit in 9 kg, the third was rejected.
        assert_eq!(stock_of(&store, "prod1"), Decimal::from(1u32));
        assert_eq!(engine.order(c.id()).unwrap().status(), OrderStatus::Pending);
    }

    #[test]
    fn test_update_unknown_order() {
        let (_store, engine, now) = setup(&[("prod1", 10)]);
        assert!(matches!(
            engine.update_status("missing", OrderStatus::Packed, now),
            Err(MarketError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_dashboard_counts() {
        let (_store, engine, now) = setup(&[("prod1", 100)]);
        let a = place_one(&engine, 1, now);
        let b = place_one(&engine, 2, now);
        place_one(&engine, 3, now);
        engine.update_status(a.id(), OrderStatus::Packed, now).unwrap();
        engine.update_status(b.id(), OrderStatus::Packed, now).unwrap();
        engine.update_status(b.id(), OrderStatus::Shipped, now).unwrap();
        engine.update_status(b.id(), OrderStatus::Delivered, now).unwrap();

        let vendor = engine.dashboard("ven1", now).unwrap();
        assert_eq!(vendor.pending, 1);
        assert_eq!(vendor.active, 1);
        assert_eq!(vendor.completed, 1);
        assert!(vendor.low_stock.is_none());

        let supplier = engine.dashboard("sup1", now).unwrap();
        assert_eq!(supplier.pending, 1);
        assert_eq!(supplier.low_stock, Some(0));
    }
}
