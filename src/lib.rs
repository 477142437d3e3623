//! Sandhai - Produce Marketplace
//!
//! Connects street-food vendors (buyers) with farm suppliers (sellers).
//!
//! ## Features
//! - Product catalog with live stock tracking
//! - Shopping cart and checkout
//! - Order lifecycle with supplier approval and stock accounting
//! - Seasonal, weekend and surplus-stock offers
//! - Simulated, user-advanceable clock driving delivery ETAs
//! - English and Tamil interface text

pub mod api;
pub mod auth;
pub mod clock;
pub mod domain;
pub mod engine;
pub mod i18n;
pub mod offers;
pub mod store;

use thiserror::Error;

use crate::domain::aggregates::order::OrderStatus;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Insufficient stock for {}", .product_ids.join(", "))]
    InsufficientStock { product_ids: Vec<String> },

    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Quantity must be at least 1 kg")]
    InvalidQuantity,

    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    #[error("No account matches those credentials")]
    InvalidCredentials,

    #[error("Invalid signup details: {0}")]
    InvalidSignup(String),
}

pub type Result<T> = std::result::Result<T, MarketError>;
