use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::domain::Order;
use crate::http::auth::{AdminUser, AuthUser};
use crate::http::error::ApiError;
use crate::http::AppState;

#[derive(Serialize)]
pub struct OrderList {
    orders: Vec<Order>,
}

#[derive(Serialize)]
pub struct OrderMessage {
    message: String,
    order: Order,
}

/// Order joined with the owning user's display fields for the admin view.
#[derive(Serialize)]
pub struct AdminOrderView {
    #[serde(flatten)]
    order: Order,
    user_name: String,
    user_email: String,
}

#[derive(Serialize)]
pub struct AdminOrderList {
    orders: Vec<AdminOrderView>,
}

/// POST /api/orders
///
/// Runs the checkout pipeline over the caller's cart.
pub async fn place_order(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<OrderMessage>), ApiError> {
    let order = state.checkout.place_order(&user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderMessage {
            message: "Order created successfully".to_string(),
            order,
        }),
    ))
}

/// GET /api/orders
pub async fn list_orders(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<OrderList>, ApiError> {
    let orders = state.orders.list_by_user(user.id).await?;
    Ok(Json(OrderList { orders }))
}

/// GET /api/orders/admin/all (admin only)
pub async fn list_all_orders(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<AdminOrderList>, ApiError> {
    let all = state.orders.list_all().await?;

    let mut orders = Vec::with_capacity(all.len());
    for order in all {
        let Some(user) = state.users.get_user(order.user_id.clone()).await? else {
            continue;
        };
        orders.push(AdminOrderView {
            order,
            user_name: user.name,
            user_email: user.email,
        });
    }

    Ok(Json(AdminOrderList { orders }))
}
