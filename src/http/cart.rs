use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::CartLine;
use crate::http::auth::AuthUser;
use crate::http::error::ApiError;
use crate::http::AppState;

/// Cart line joined with the catalog fields the storefront renders.
/// Lines whose product has been deleted are dropped from the view.
#[derive(Serialize)]
pub struct CartItemView {
    id: String,
    quantity: u32,
    product_id: String,
    name: String,
    price: Decimal,
    image_url: String,
}

#[derive(Serialize)]
pub struct CartView {
    items: Vec<CartItemView>,
    total: Decimal,
    count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    product_id: Option<String>,
    #[serde(default)]
    quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    #[serde(default)]
    quantity: Option<i64>,
}

#[derive(Serialize)]
pub struct CartItemMessage {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<CartLine>,
}

#[derive(Serialize)]
pub struct RemovedMessage {
    message: String,
}

#[derive(Serialize)]
pub struct ClearedMessage {
    message: String,
    cleared: usize,
}

/// GET /api/cart
pub async fn get_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CartView>, ApiError> {
    let lines = state.cart.get_lines(user.id).await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(product) = state.catalog.get_product(line.product_id.clone()).await? else {
            continue;
        };
        items.push(CartItemView {
            id: line.id,
            quantity: line.quantity,
            product_id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
        });
    }

    let total = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum::<Decimal>()
        .round_dp(2);
    let count = items.len();

    Ok(Json(CartView {
        items,
        total,
        count,
    }))
}

/// POST /api/cart/items
pub async fn add_item(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartItemMessage>), ApiError> {
    let product_id = body
        .product_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Valid product ID is required"))?;

    let quantity = body
        .quantity
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q >= 1)
        .ok_or_else(|| ApiError::bad_request("Quantity must be at least 1"))?;

    let product = state
        .catalog
        .get_product(product_id.clone())
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    if product.stock < quantity {
        return Err(ApiError::bad_request("Insufficient stock"));
    }

    let item = state.cart.upsert_line(user.id, product_id, quantity).await?;

    Ok((
        StatusCode::CREATED,
        Json(CartItemMessage {
            message: "Item added to cart".to_string(),
            item: Some(item),
        }),
    ))
}

/// PUT /api/cart/items/:id
///
/// Quantity zero removes the line, matching the store semantics; negative
/// or absent quantities are rejected.
pub async fn update_item(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<CartItemMessage>, ApiError> {
    let quantity = body
        .quantity
        .filter(|q| *q >= 0)
        .ok_or_else(|| ApiError::bad_request("Valid quantity is required"))?;

    let item = state.cart.set_line_quantity(user.id, id, quantity).await?;

    if quantity == 0 {
        return Ok(Json(CartItemMessage {
            message: "Item removed from cart".to_string(),
            item: None,
        }));
    }

    let item = item.ok_or_else(|| ApiError::not_found("Cart item not found"))?;
    Ok(Json(CartItemMessage {
        message: "Cart item updated".to_string(),
        item: Some(item),
    }))
}

/// DELETE /api/cart/items/:id
pub async fn remove_item(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemovedMessage>, ApiError> {
    state.cart.set_line_quantity(user.id, id, 0).await?;

    Ok(Json(RemovedMessage {
        message: "Item removed from cart".to_string(),
    }))
}

/// DELETE /api/cart
pub async fn clear_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ClearedMessage>, ApiError> {
    let cleared = state.cart.clear(user.id).await?;

    Ok(Json(ClearedMessage {
        message: "Cart cleared".to_string(),
        cleared,
    }))
}
