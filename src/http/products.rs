use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{Product, ProductInput};
use crate::http::auth::AdminUser;
use crate::http::error::ApiError;
use crate::http::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Serialize)]
pub struct Pagination {
    limit: usize,
    offset: usize,
    count: usize,
}

#[derive(Serialize)]
pub struct ProductList {
    products: Vec<Product>,
    pagination: Pagination,
}

#[derive(Serialize)]
pub struct ProductResponse {
    product: Product,
}

#[derive(Serialize)]
pub struct ProductMessage {
    message: String,
    product: Product,
}

/// GET /api/products (public)
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductList>, ApiError> {
    let limit = query.limit.unwrap_or(20);
    let offset = query.offset.unwrap_or(0);

    let products = state.catalog.list_products(limit, offset).await?;
    let count = products.len();

    Ok(Json(ProductList {
        products,
        pagination: Pagination {
            limit,
            offset,
            count,
        },
    }))
}

/// GET /api/products/:id (public)
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .catalog
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    Ok(Json(ProductResponse { product }))
}

/// POST /api/products (admin only)
pub async fn create_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductMessage>), ApiError> {
    let product = state.catalog.create_product(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductMessage {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// PUT /api/products/:id (admin only)
pub async fn update_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductMessage>, ApiError> {
    let product = state.catalog.update_product(id, input).await?;

    Ok(Json(ProductMessage {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    message: String,
}

/// DELETE /api/products/:id (admin only)
pub async fn delete_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.catalog.delete_product(id).await?;

    Ok(Json(DeleteResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
