use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{CartLine, Order, OrderItem, Product, ProductInput, User, UserCreate};
use crate::error::{AuthError, CartError, CatalogError, OrderError};
use crate::messages::{CartRequest, CatalogRequest, OrderRequest, UserRequest};

/// Generates a client method that sends one request variant and awaits the
/// oneshot reply, mapping channel failures onto the domain error type.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response
                    .await
                    .map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

// =============================================================================
// USER CLIENT
// =============================================================================

/// Client for [`crate::services::UserService`].
///
/// Methods are written out by hand here: register and login carry plaintext
/// passwords and authenticate carries a bearer token, none of which belong
/// in trace fields.
#[derive(Clone)]
pub struct UserClient {
    sender: mpsc::Sender<UserRequest>,
}

impl UserClient {
    pub fn new(sender: mpsc::Sender<UserRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self, create))]
    pub async fn register(&self, create: UserCreate) -> Result<(User, String), AuthError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(UserRequest::Register { create, respond_to })
            .await
            .map_err(|_| AuthError::ActorCommunicationError("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: String, password: String) -> Result<(User, String), AuthError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(UserRequest::Login {
                email,
                password,
                respond_to,
            })
            .await
            .map_err(|_| AuthError::ActorCommunicationError("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: String) -> Result<User, AuthError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(UserRequest::Authenticate { token, respond_to })
            .await
            .map_err(|_| AuthError::ActorCommunicationError("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(UserRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(UserClient => fn get_user(id: String) -> Option<User> as UserRequest::GetUser, Error = AuthError);

// Test-only method for internal state inspection
#[cfg(test)]
client_method!(UserClient => fn get_user_count() -> usize as UserRequest::GetUserCount, Error = AuthError);

// =============================================================================
// CATALOG CLIENT
// =============================================================================

/// Client for [`crate::services::CatalogService`].
#[derive(Clone)]
pub struct CatalogClient {
    sender: mpsc::Sender<CatalogRequest>,
}

impl CatalogClient {
    pub fn new(sender: mpsc::Sender<CatalogRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(CatalogRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(CatalogClient => fn list_products(limit: usize, offset: usize) -> Vec<Product> as CatalogRequest::ListProducts, Error = CatalogError);
client_method!(CatalogClient => fn get_product(id: String) -> Option<Product> as CatalogRequest::GetProduct, Error = CatalogError);
client_method!(CatalogClient => fn create_product(input: ProductInput) -> Product as CatalogRequest::CreateProduct, Error = CatalogError);
client_method!(CatalogClient => fn update_product(id: String, input: ProductInput) -> Product as CatalogRequest::UpdateProduct, Error = CatalogError);
client_method!(CatalogClient => fn delete_product(id: String) -> () as CatalogRequest::DeleteProduct, Error = CatalogError);
client_method!(CatalogClient => fn get_stock(id: String) -> u32 as CatalogRequest::GetStock, Error = CatalogError);
client_method!(CatalogClient => fn decrement_stock(id: String, quantity: u32) -> () as CatalogRequest::DecrementStock, Error = CatalogError);
client_method!(CatalogClient => fn restore_stock(id: String, quantity: u32) -> () as CatalogRequest::RestoreStock, Error = CatalogError);

// =============================================================================
// CART CLIENT
// =============================================================================

/// Client for [`crate::services::CartService`].
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(CartClient => fn get_lines(user_id: String) -> Vec<CartLine> as CartRequest::GetLines, Error = CartError);
client_method!(CartClient => fn upsert_line(user_id: String, product_id: String, quantity: u32) -> CartLine as CartRequest::UpsertLine, Error = CartError);
client_method!(CartClient => fn set_line_quantity(user_id: String, line_id: String, quantity: i64) -> Option<CartLine> as CartRequest::SetLineQuantity, Error = CartError);
client_method!(CartClient => fn clear(user_id: String) -> usize as CartRequest::Clear, Error = CartError);

// =============================================================================
// ORDER CLIENT
// =============================================================================

/// Client for [`crate::services::OrderService`].
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(OrderRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(OrderClient => fn create_order(user_id: String, items: Vec<OrderItem>, total: Decimal) -> Order as OrderRequest::CreateOrder, Error = OrderError);
client_method!(OrderClient => fn list_by_user(user_id: String) -> Vec<Order> as OrderRequest::ListByUser, Error = OrderError);
client_method!(OrderClient => fn list_all() -> Vec<Order> as OrderRequest::ListAll, Error = OrderError);
