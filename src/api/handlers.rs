//! Route handlers and their request/response DTOs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::{self, SignupDetails};
use crate::domain::aggregates::product::Category;
use crate::domain::aggregates::{Cart, Order, OrderStatus, PaymentMethod, Product, User};
use crate::engine::DashboardStats;
use crate::i18n::Locale;
use crate::offers::{self, OfferKind, OfferListing, Season};
use crate::MarketError;

use super::{ApiError, AppState};

/// Simulated network delay observed as a loading state during checkout.
const CHECKOUT_DELAY: Duration = Duration::from_millis(1500);

type ApiResult<T> = std::result::Result<T, ApiError>;

fn t(state: &AppState, locale: Locale, key: &str, args: &[(&str, String)]) -> String {
    state.localizer.translate(locale, key, args)
}

fn status_label(state: &AppState, locale: Locale, status: OrderStatus) -> String {
    t(state, locale, &format!("status_{status}"), &[])
}

#[derive(Debug, Deserialize)]
pub(super) struct LocaleQuery {
    #[serde(default)]
    locale: Locale,
}

// ----- health -----

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "service": "sandhai"}))
}

// ----- auth -----

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    email: String,
    /// Accepted but ignored: authentication is a mock directory lookup.
    #[serde(default)]
    #[allow(dead_code)]
    password: String,
}

#[derive(Debug, Serialize)]
pub(super) struct UserResponse {
    user: User,
    message: String,
}

pub(super) async fn login(
    State(state): State<AppState>,
    Query(q): Query<LocaleQuery>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = auth::sign_in(&state.store, &req.email, &req.password).map_err(|_| {
        ApiError::new(StatusCode::UNAUTHORIZED, t(&state, q.locale, "auth_login_failed", &[]))
    })?;
    let message = t(&state, q.locale, "auth_welcome", &[("name", user.name().to_string())]);
    Ok(Json(UserResponse { user, message }))
}

pub(super) async fn signup(
    State(state): State<AppState>,
    Query(q): Query<LocaleQuery>,
    Json(details): Json<SignupDetails>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = auth::sign_up(&state.store, &details, state.clock.now()).map_err(|err| match err {
        MarketError::EmailTaken(_) => {
            ApiError::conflict(t(&state, q.locale, "auth_email_taken", &[]))
        }
        other => ApiError::from(other),
    })?;
    let message =
        t(&state, q.locale, "auth_signup_success", &[("name", user.name().to_string())]);
    Ok((StatusCode::CREATED, Json(UserResponse { user, message })))
}

/// The mock directory backing the demo account switcher.
pub(super) async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.users())
}

// ----- catalog -----

#[derive(Debug, Deserialize)]
pub(super) struct ProductsQuery {
    category: Option<Category>,
    supplier_id: Option<String>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<ProductsQuery>,
) -> Json<Vec<Product>> {
    let mut products = match q.supplier_id {
        Some(supplier_id) => state.store.products_by_supplier(&supplier_id),
        None => state.store.products(),
    };
    if let Some(category) = q.category {
        products.retain(|p| p.category() == category);
    }
    Json(products)
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.store.product(&id)?))
}

// ----- offers -----

#[derive(Debug, Serialize)]
pub(super) struct OfferSection {
    kind: OfferKind,
    title: String,
    listings: Vec<OfferListing>,
}

#[derive(Debug, Serialize)]
pub(super) struct OffersResponse {
    season: Season,
    sections: Vec<OfferSection>,
}

pub(super) async fn list_offers(
    State(state): State<AppState>,
    Query(q): Query<LocaleQuery>,
) -> Json<OffersResponse> {
    let now = state.clock.now();
    let season = Season::at(now);
    let listings = offers::active_offers(&state.store.products(), now);

    let sections = OfferKind::IN_PRIORITY_ORDER
        .into_iter()
        .filter_map(|kind| {
            let matching: Vec<OfferListing> =
                listings.iter().filter(|l| l.kind == kind).cloned().collect();
            if matching.is_empty() {
                return None;
            }
            let title = match kind {
                OfferKind::Seasonal => {
                    let season_name = t(&state, q.locale, &format!("season_{season}"), &[]);
                    t(&state, q.locale, "offers_seasonal_title", &[("season", season_name)])
                }
                OfferKind::Weekend => t(&state, q.locale, "offers_weekend_title", &[]),
                OfferKind::Stock => t(&state, q.locale, "offers_stock_title", &[]),
            };
            Some(OfferSection { kind, title, listings: matching })
        })
        .collect();

    Json(OffersResponse { season, sections })
}

// ----- cart -----

#[derive(Debug, Deserialize)]
pub(super) struct AddCartItemRequest {
    product_id: String,
    quantity: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct CartResponse {
    cart: Cart,
    message: String,
}

pub(super) async fn get_cart(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> Json<Cart> {
    Json(state.store.cart(&vendor_id))
}

pub(super) async fn add_cart_item(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Query(q): Query<LocaleQuery>,
    Json(req): Json<AddCartItemRequest>,
) -> ApiResult<Json<CartResponse>> {
    let now = state.clock.now();
    let product = state.store.product(&req.product_id)?;
    let cart = state.store.add_to_cart(&vendor_id, &req.product_id, req.quantity, now)?;
    let message =
        t(&state, q.locale, "cart_item_added", &[("productName", product.name().to_string())]);
    Ok(Json(CartResponse { cart, message }))
}

#[derive(Debug, Deserialize)]
pub(super) struct SetQuantityRequest {
    quantity: u32,
}

pub(super) async fn set_cart_quantity(
    State(state): State<AppState>,
    Path((vendor_id, product_id)): Path<(String, String)>,
    Json(req): Json<SetQuantityRequest>,
) -> ApiResult<Json<Cart>> {
    Ok(Json(state.store.set_cart_quantity(&vendor_id, &product_id, req.quantity)?))
}

pub(super) async fn remove_cart_item(
    State(state): State<AppState>,
    Path((vendor_id, product_id)): Path<(String, String)>,
) -> Json<Cart> {
    Json(state.store.remove_from_cart(&vendor_id, &product_id))
}

pub(super) async fn clear_cart(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> StatusCode {
    state.store.clear_cart(&vendor_id);
    StatusCode::NO_CONTENT
}

// ----- checkout -----

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutRequest {
    vendor_id: String,
    delivery_location: String,
    payment_method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckoutResponse {
    orders: Vec<Order>,
    message: String,
}

pub(super) async fn checkout(
    State(state): State<AppState>,
    Query(q): Query<LocaleQuery>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<CheckoutResponse>)> {
    if req.delivery_location.trim().is_empty() {
        return Err(ApiError::unprocessable("Delivery location is required"));
    }

    let now = state.clock.now();
    let lines = state.store.cart(&req.vendor_id).lines().to_vec();
    let orders = state
        .engine
        .create_orders(&req.vendor_id, &lines, req.delivery_location.trim(), req.payment_method, now)
        .map_err(|err| match err {
            MarketError::InsufficientStock { product_ids } => {
                // Drop what can no longer be fulfilled so the vendor can retry.
                for product_id in &product_ids {
                    state.store.remove_from_cart(&req.vendor_id, product_id);
                }
                ApiError::conflict(t(&state, q.locale, "checkout_order_failed", &[]))
            }
            other => ApiError::from(other),
        })?;

    // Artificial suspension the UI shows as a loading state.
    tokio::time::sleep(CHECKOUT_DELAY).await;

    state.store.clear_cart(&req.vendor_id);
    let message = t(
        &state,
        q.locale,
        "checkout_order_success",
        &[("count", orders.len().to_string())],
    );
    Ok((StatusCode::CREATED, Json(CheckoutResponse { orders, message })))
}

// ----- orders -----

#[derive(Debug, Deserialize)]
pub(super) struct OrdersQuery {
    vendor_id: Option<String>,
    supplier_id: Option<String>,
}

pub(super) async fn list_orders(
    State(state): State<AppState>,
    Query(q): Query<OrdersQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let now = state.clock.now();
    let orders = match (q.vendor_id, q.supplier_id) {
        (Some(vendor_id), None) => state.engine.orders_for_vendor(&vendor_id, now),
        (None, Some(supplier_id)) => state.engine.orders_for_supplier(&supplier_id, now),
        _ => {
            return Err(ApiError::unprocessable(
                "Pass exactly one of vendor_id or supplier_id",
            ))
        }
    };
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusRequest {
    status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderResponse {
    order: Order,
    message: String,
}

pub(super) async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Query(q): Query<LocaleQuery>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let now = state.clock.now();
    let order = state.engine.update_status(&order_id, req.status, now).map_err(|err| match err {
        MarketError::InsufficientStock { .. } => {
            let product_name = state
                .engine
                .order(&order_id)
                .map(|o| o.product_name().to_string())
                .unwrap_or_default();
            ApiError::conflict(t(
                &state,
                q.locale,
                "orders_approval_failed",
                &[("productName", product_name)],
            ))
        }
        other => ApiError::from(other),
    })?;

    let short_id: String = order.id().chars().take(7).collect();
    let message = t(
        &state,
        q.locale,
        "orders_updated",
        &[("orderId", short_id), ("status", status_label(&state, q.locale, order.status()))],
    );
    Ok(Json(OrderResponse { order, message }))
}

// ----- dashboard -----

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.engine.dashboard(&user_id, state.clock.now())?))
}

// ----- simulated time -----

#[derive(Debug, Serialize)]
pub(super) struct TimeResponse {
    now: DateTime<Utc>,
    season: Season,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub(super) async fn get_time(State(state): State<AppState>) -> Json<TimeResponse> {
    let now = state.clock.now();
    Json(TimeResponse { now, season: Season::at(now), message: None })
}

#[derive(Debug, Deserialize)]
pub(super) struct AdvanceRequest {
    days: i64,
}

pub(super) async fn advance_time(
    State(state): State<AppState>,
    Query(q): Query<LocaleQuery>,
    Json(req): Json<AdvanceRequest>,
) -> ApiResult<Json<TimeResponse>> {
    if req.days < 1 {
        return Err(ApiError::unprocessable("days must be at least 1"));
    }
    let now = state.clock.advance_days(req.days);
    let message = t(&state, q.locale, "time_advanced", &[("days", req.days.to_string())]);
    Ok(Json(TimeResponse { now, season: Season::at(now), message: Some(message) }))
}

pub(super) async fn reset_time(
    State(state): State<AppState>,
    Query(q): Query<LocaleQuery>,
) -> Json<TimeResponse> {
    let now = state.clock.reset();
    let message = t(&state, q.locale, "time_reset", &[]);
    Json(TimeResponse { now, season: Season::at(now), message: Some(message) })
}
