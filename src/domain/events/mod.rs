//! Domain events
use rust_decimal::Decimal;

#[derive(Clone, Debug)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug)]
pub enum ProductEvent {
    StockDecremented { product_id: String, quantity: u32, remaining_kg: Decimal },
    StockRestored { product_id: String, quantity: u32, remaining_kg: Decimal },
}

#[derive(Clone, Debug)]
pub enum OrderEvent {
    Placed { order_id: String, vendor_id: String, product_id: String, quantity: u32 },
    Approved { order_id: String },
    Shipped { order_id: String },
    Delivered { order_id: String, auto: bool },
    Cancelled { order_id: String, restocked: bool },
}
