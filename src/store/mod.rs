//! In-memory market store
//!
//! The single owner of all mutable marketplace state: catalog, orders,
//! carts, users and the domain-event log. Everything sits behind one
//! `RwLock`; core mutations take the write guard once, so a check and its
//! paired stock effect commit as one step even under concurrent requests.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::domain::aggregates::{Cart, CartLine, Order, Product, User};
use crate::domain::events::{DomainEvent, OrderEvent, ProductEvent};
use crate::offers;
use crate::{MarketError, Result};

pub mod seed;

#[derive(Debug)]
pub(crate) struct MarketState {
    pub(crate) products: Vec<Product>,
    /// Most recent first; listing re-sorts by order date anyway.
    pub(crate) orders: Vec<Order>,
    pub(crate) carts: HashMap<String, Cart>,
    pub(crate) users: Vec<User>,
    pub(crate) events: Vec<DomainEvent>,
}

impl MarketState {
    pub(crate) fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }
    pub(crate) fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id() == id)
    }
    pub(crate) fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id() == id)
    }
    pub(crate) fn order_mut(&mut self, id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id() == id)
    }
    pub(crate) fn user(&self, uid: &str) -> Option<&User> {
        self.users.iter().find(|u| u.uid() == uid)
    }

    /// Append to the event log and mirror it as a structured trace event.
    pub(crate) fn record(&mut self, event: DomainEvent) {
        emit(&event);
        self.events.push(event);
    }
}

fn emit(event: &DomainEvent) {
    match event {
        DomainEvent::Order(e) => match e {
            OrderEvent::Placed { order_id, vendor_id, product_id, quantity } => {
                tracing::info!(%order_id, %vendor_id, %product_id, quantity, "order placed");
            }
            OrderEvent::Approved { order_id } => {
                tracing::info!(%order_id, "order approved");
            }
            OrderEvent::Shipped { order_id } => {
                tracing::info!(%order_id, "order shipped");
            }
            OrderEvent::Delivered { order_id, auto } => {
                tracing::info!(%order_id, auto, "order delivered");
            }
            OrderEvent::Cancelled { order_id, restocked } => {
                tracing::info!(%order_id, restocked, "order cancelled");
            }
        },
        DomainEvent::Product(e) => match e {
            ProductEvent::StockDecremented { product_id, quantity, remaining_kg } => {
                tracing::info!(%product_id, quantity, %remaining_kg, "stock decremented");
            }
            ProductEvent::StockRestored { product_id, quantity, remaining_kg } => {
                tracing::info!(%product_id, quantity, %remaining_kg, "stock restored");
            }
        },
    }
}

#[derive(Debug)]
pub struct MarketStore {
    state: RwLock<MarketState>,
}

impl MarketStore {
    pub fn new(products: Vec<Product>, users: Vec<User>) -> Self {
        Self {
            state: RwLock::new(MarketState {
                products,
                orders: vec![],
                carts: HashMap::new(),
                users,
                events: vec![],
            }),
        }
    }

    /// A store pre-loaded with the demo catalog and user directory.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::new(seed::products(now), seed::users(now))
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, MarketState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, MarketState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    // ----- catalog -----

    pub fn products(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    pub fn products_by_supplier(&self, supplier_id: &str) -> Vec<Product> {
        self.read()
            .products
            .iter()
            .filter(|p| p.supplier_id() == supplier_id)
            .cloned()
            .collect()
    }

    pub fn product(&self, id: &str) -> Result<Product> {
        self.read()
            .product(id)
            .cloned()
            .ok_or_else(|| MarketError::ProductNotFound(id.to_string()))
    }

    // ----- users -----

    pub fn users(&self) -> Vec<User> {
        self.read().users.clone()
    }

    pub fn user(&self, uid: &str) -> Result<User> {
        self.read()
            .user(uid)
            .cloned()
            .ok_or_else(|| MarketError::UserNotFound(uid.to_string()))
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.read().users.iter().find(|u| u.email() == email).cloned()
    }

    /// Add a user unless the email is already registered. Check and insert
    /// share one write guard so concurrent sign-ups cannot both win.
    pub(crate) fn try_add_user(&self, user: User) -> Result<()> {
        let mut state = self.write();
        if state.users.iter().any(|u| u.email() == user.email()) {
            return Err(MarketError::EmailTaken(user.email().to_string()));
        }
        state.users.push(user);
        Ok(())
    }

    // ----- carts -----

    pub fn cart(&self, vendor_id: &str) -> Cart {
        self.read()
            .carts
            .get(vendor_id)
            .cloned()
            .unwrap_or_else(|| Cart::new(vendor_id))
    }

    /// Add `quantity` kg of a product to the vendor's cart. The unit price
    /// is captured here, discounted if an offer currently applies, and
    /// stays frozen in the line from then on.
    pub fn add_to_cart(
        &self,
        vendor_id: &str,
        product_id: &str,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<Cart> {
        if quantity == 0 {
            return Err(MarketError::InvalidQuantity);
        }
        let mut state = self.write();
        let line = {
            let product = state
                .product(product_id)
                .ok_or_else(|| MarketError::ProductNotFound(product_id.to_string()))?;
            CartLine {
                product_id: product.id().to_string(),
                name: product.name().to_string(),
                emoji: product.emoji().to_string(),
                quantity,
                unit_price: offers::current_price(product, now),
            }
        };
        let cart = state
            .carts
            .entry(vendor_id.to_string())
            .or_insert_with(|| Cart::new(vendor_id));
        cart.add_line(line);
        Ok(cart.clone())
    }

    pub fn set_cart_quantity(&self, vendor_id: &str, product_id: &str, quantity: u32) -> Result<Cart> {
        let mut state = self.write();
        let cart = state
            .carts
            .entry(vendor_id.to_string())
            .or_insert_with(|| Cart::new(vendor_id));
        cart.update_quantity(product_id, quantity)?;
        Ok(cart.clone())
    }

    pub fn remove_from_cart(&self, vendor_id: &str, product_id: &str) -> Cart {
        let mut state = self.write();
        let cart = state
            .carts
            .entry(vendor_id.to_string())
            .or_insert_with(|| Cart::new(vendor_id));
        cart.remove_line(product_id);
        cart.clone()
    }

    pub fn clear_cart(&self, vendor_id: &str) {
        if let Some(cart) = self.write().carts.get_mut(vendor_id) {
            cart.clear();
        }
    }

    // ----- events -----

    /// Drain the recorded domain events (primarily for tests and debugging;
    /// every event has already been emitted through `tracing`).
    pub fn take_events(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.write().events)
    }
}
