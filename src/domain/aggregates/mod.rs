//! Aggregates module
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use order::{Order, OrderStatus, PaymentMethod};
pub use product::{Category, Product};
pub use user::{User, UserRole};
