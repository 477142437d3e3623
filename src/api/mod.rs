//! HTTP surface
//!
//! A thin axum JSON API over the in-process core. Handlers translate
//! between requests and engine/store calls; every rule lives below this
//! layer. User-facing messages are localized per the `locale` query or
//! body field.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clock::SimClock;
use crate::engine::OrderEngine;
use crate::i18n::Localizer;
use crate::store::MarketStore;
use crate::MarketError;

mod handlers;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MarketStore>,
    pub engine: OrderEngine,
    pub clock: SimClock,
    pub localizer: Arc<Localizer>,
}

impl AppState {
    /// Demo state: simulated clock at the real present, seeded store.
    pub fn seeded() -> Result<Self, serde_json::Error> {
        let clock = SimClock::starting_now();
        let store = Arc::new(MarketStore::seeded(clock.now()));
        Self::with_store(store, clock)
    }

    pub fn with_store(store: Arc<MarketStore>, clock: SimClock) -> Result<Self, serde_json::Error> {
        Ok(Self {
            engine: OrderEngine::new(Arc::clone(&store)),
            store,
            clock,
            localizer: Arc::new(Localizer::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/signup", post(handlers::signup))
        .route("/api/v1/users", get(handlers::list_users))
        .route("/api/v1/products", get(handlers::list_products))
        .route("/api/v1/products/:id", get(handlers::get_product))
        .route("/api/v1/offers", get(handlers::list_offers))
        .route("/api/v1/cart/:vendor_id", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/api/v1/cart/:vendor_id/items", post(handlers::add_cart_item))
        .route(
            "/api/v1/cart/:vendor_id/items/:product_id",
            axum::routing::put(handlers::set_cart_quantity).delete(handlers::remove_cart_item),
        )
        .route("/api/v1/checkout", post(handlers::checkout))
        .route("/api/v1/orders", get(handlers::list_orders))
        .route("/api/v1/orders/:id/status", post(handlers::update_order_status))
        .route("/api/v1/dashboard/:user_id", get(handlers::dashboard))
        .route("/api/v1/time", get(handlers::get_time))
        .route("/api/v1/time/advance", post(handlers::advance_time))
        .route("/api/v1/time/reset", post(handlers::reset_time))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error envelope: a status code plus a message ready for display.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        let status = match err {
            MarketError::ProductNotFound(_)
            | MarketError::OrderNotFound(_)
            | MarketError::UserNotFound(_) => StatusCode::NOT_FOUND,
            MarketError::InsufficientStock { .. }
            | MarketError::InvalidTransition { .. }
            | MarketError::EmailTaken(_) => StatusCode::CONFLICT,
            MarketError::EmptyCart
            | MarketError::InvalidQuantity
            | MarketError::InvalidSignup(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MarketError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
