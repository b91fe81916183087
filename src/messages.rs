use rust_decimal::Decimal;
use tokio::sync::oneshot;

use crate::domain::{CartLine, Order, OrderItem, Product, ProductInput, User, UserCreate};
use crate::error::{AuthError, CartError, CatalogError, OrderError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed message enums for actor communication. Each variant includes
/// parameters and a oneshot channel for responses.

#[derive(Debug)]
pub enum UserRequest {
    Register {
        create: UserCreate,
        respond_to: ServiceResponse<(User, String), AuthError>,
    },
    Login {
        email: String,
        password: String,
        respond_to: ServiceResponse<(User, String), AuthError>,
    },
    Authenticate {
        token: String,
        respond_to: ServiceResponse<User, AuthError>,
    },
    GetUser {
        id: String,
        respond_to: ServiceResponse<Option<User>, AuthError>,
    },
    Shutdown,
    #[cfg(test)]
    GetUserCount {
        respond_to: ServiceResponse<usize, AuthError>,
    },
}

#[derive(Debug)]
pub enum CatalogRequest {
    ListProducts {
        limit: usize,
        offset: usize,
        respond_to: ServiceResponse<Vec<Product>, CatalogError>,
    },
    GetProduct {
        id: String,
        respond_to: ServiceResponse<Option<Product>, CatalogError>,
    },
    CreateProduct {
        input: ProductInput,
        respond_to: ServiceResponse<Product, CatalogError>,
    },
    UpdateProduct {
        id: String,
        input: ProductInput,
        respond_to: ServiceResponse<Product, CatalogError>,
    },
    DeleteProduct {
        id: String,
        respond_to: ServiceResponse<(), CatalogError>,
    },
    GetStock {
        id: String,
        respond_to: ServiceResponse<u32, CatalogError>,
    },
    DecrementStock {
        id: String,
        quantity: u32,
        respond_to: ServiceResponse<(), CatalogError>,
    },
    RestoreStock {
        id: String,
        quantity: u32,
        respond_to: ServiceResponse<(), CatalogError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum CartRequest {
    GetLines {
        user_id: String,
        respond_to: ServiceResponse<Vec<CartLine>, CartError>,
    },
    UpsertLine {
        user_id: String,
        product_id: String,
        quantity: u32,
        respond_to: ServiceResponse<CartLine, CartError>,
    },
    SetLineQuantity {
        user_id: String,
        line_id: String,
        quantity: i64,
        respond_to: ServiceResponse<Option<CartLine>, CartError>,
    },
    Clear {
        user_id: String,
        respond_to: ServiceResponse<usize, CartError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum OrderRequest {
    CreateOrder {
        user_id: String,
        items: Vec<OrderItem>,
        total: Decimal,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    ListByUser {
        user_id: String,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    ListAll {
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    Shutdown,
}
