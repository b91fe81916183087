//! HTTP surface for the store.
//!
//! Routes under `/api` map one-to-one onto service client calls, with the
//! checkout coordinator behind `POST /api/orders`. Handlers return
//! `Result<_, ApiError>` so domain errors turn into the right status codes.

pub mod auth;
pub mod cart;
pub mod error;
pub mod orders;
pub mod products;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;

use crate::app_system::StoreSystem;
use crate::checkout::Checkout;
use crate::clients::{CartClient, CatalogClient, OrderClient, UserClient};

/// Shared handler state: one client per service plus the checkout
/// coordinator built over them. Cloning is cheap, every field is a
/// channel sender underneath.
#[derive(Clone)]
pub struct AppState {
    pub users: UserClient,
    pub catalog: CatalogClient,
    pub cart: CartClient,
    pub orders: OrderClient,
    pub checkout: Checkout,
}

impl AppState {
    pub fn new(system: &StoreSystem) -> Self {
        Self {
            users: system.users.clone(),
            catalog: system.catalog.clone(),
            cart: system.cart.clone(),
            orders: system.orders.clone(),
            checkout: system.checkout(),
        }
    }
}

/// Builds the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/profile", get(auth::profile))
        .route("/api/products", get(products::list_products).post(products::create_product))
        .route(
            "/api/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/api/cart/items", post(cart::add_item))
        .route(
            "/api/cart/items/:id",
            put(cart::update_item).delete(cart::remove_item),
        )
        .route("/api/orders", get(orders::list_orders).post(orders::place_order))
        .route("/api/orders/admin/all", get(orders::list_all_orders))
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
}

/// GET /api/health
async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        message: "Server is running",
    })
}
