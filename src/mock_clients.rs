//! Test doubles for the service clients.
//!
//! Each constructor returns a real client wired to a channel whose receiving
//! end the test holds, so the test can stand in for the service: inspect the
//! request that arrives, then answer through its oneshot. This makes every
//! step of a checkout observable and lets failures be injected at any point.

use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::clients::{CartClient, CatalogClient, OrderClient};
use crate::domain::{CartLine, Order, OrderItem, Product};
use crate::error::{CartError, CatalogError, OrderError};
use crate::messages::{CartRequest, CatalogRequest, OrderRequest, ServiceResponse};

pub fn mock_cart_client(buffer_size: usize) -> (CartClient, mpsc::Receiver<CartRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CartClient::new(sender), receiver)
}

pub fn mock_catalog_client(buffer_size: usize) -> (CatalogClient, mpsc::Receiver<CatalogRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CatalogClient::new(sender), receiver)
}

pub fn mock_order_client(buffer_size: usize) -> (OrderClient, mpsc::Receiver<OrderRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (OrderClient::new(sender), receiver)
}

/// Next message must be a GetLines request.
pub async fn expect_get_lines(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(String, ServiceResponse<Vec<CartLine>, CartError>)> {
    match receiver.recv().await {
        Some(CartRequest::GetLines {
            user_id,
            respond_to,
        }) => Some((user_id, respond_to)),
        _ => None,
    }
}

/// Next message must be a Clear request.
pub async fn expect_clear(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(String, ServiceResponse<usize, CartError>)> {
    match receiver.recv().await {
        Some(CartRequest::Clear {
            user_id,
            respond_to,
        }) => Some((user_id, respond_to)),
        _ => None,
    }
}

/// Next message must be a GetProduct request.
pub async fn expect_get_product(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(String, ServiceResponse<Option<Product>, CatalogError>)> {
    match receiver.recv().await {
        Some(CatalogRequest::GetProduct { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a DecrementStock request.
pub async fn expect_decrement_stock(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(String, u32, ServiceResponse<(), CatalogError>)> {
    match receiver.recv().await {
        Some(CatalogRequest::DecrementStock {
            id,
            quantity,
            respond_to,
        }) => Some((id, quantity, respond_to)),
        _ => None,
    }
}

/// Next message must be a RestoreStock request.
pub async fn expect_restore_stock(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(String, u32, ServiceResponse<(), CatalogError>)> {
    match receiver.recv().await {
        Some(CatalogRequest::RestoreStock {
            id,
            quantity,
            respond_to,
        }) => Some((id, quantity, respond_to)),
        _ => None,
    }
}

/// Next message must be a CreateOrder request.
pub async fn expect_create_order(
    receiver: &mut mpsc::Receiver<OrderRequest>,
) -> Option<(
    String,
    Vec<OrderItem>,
    Decimal,
    ServiceResponse<Order, OrderError>,
)> {
    match receiver.recv().await {
        Some(OrderRequest::CreateOrder {
            user_id,
            items,
            total,
            respond_to,
        }) => Some((user_id, items, total, respond_to)),
        _ => None,
    }
}
