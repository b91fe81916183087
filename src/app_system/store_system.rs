use tracing::{error, info, instrument};

use crate::checkout::Checkout;
use crate::clients::{CartClient, CatalogClient, OrderClient, UserClient};
use crate::services::{CartService, CatalogService, OrderService, UserService};

/// Coordinator for the store's actor system.
///
/// Starts every service, hands out their clients, and shuts the whole thing
/// down in one place so no task is left running when the process exits.
pub struct StoreSystem {
    pub users: UserClient,
    pub catalog: CatalogClient,
    pub cart: CartClient,
    pub orders: OrderClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreSystem {
    pub fn new(buffer_size: usize) -> Self {
        let mut handles = Vec::new();

        info!("Starting store system");

        let (user_service, users) = UserService::new(buffer_size);
        handles.push(tokio::spawn(user_service.run()));

        let (catalog_service, catalog) = CatalogService::new(buffer_size);
        handles.push(tokio::spawn(catalog_service.run()));

        let (cart_service, cart) = CartService::new(buffer_size);
        handles.push(tokio::spawn(cart_service.run()));

        let (order_service, orders) = OrderService::new(buffer_size);
        handles.push(tokio::spawn(order_service.run()));

        info!("Store system started successfully");

        Self {
            users,
            catalog,
            cart,
            orders,
            handles,
        }
    }

    /// Builds a checkout coordinator over this system's clients.
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.cart.clone(), self.catalog.clone(), self.orders.clone())
    }

    /// Gracefully shuts down the entire actor system: signal every service,
    /// then wait for the tasks to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down store system");

        let _ = self.orders.shutdown().await;
        let _ = self.cart.shutdown().await;
        let _ = self.catalog.shutdown().await;
        let _ = self.users.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Store system shutdown complete");
        Ok(())
    }
}
