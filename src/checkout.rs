use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::clients::{CartClient, CatalogClient, OrderClient};
use crate::domain::{Order, OrderItem};
use crate::error::{CatalogError, CheckoutError};

/// Coordinates the multi-service checkout flow.
///
/// Checkout is not an actor itself. It runs on the caller's task and talks to
/// the cart, catalog and order services through their clients, so two
/// checkouts may interleave at every await point. Correctness under that
/// interleaving comes from the catalog actor applying each stock decrement as
/// a single check-and-write message.
///
/// Write ordering: stock is decremented before the order is written. A failed
/// decrement or a failed order write rolls back the decrements already
/// applied by restoring stock, so no order ever exists without its stock
/// having been taken. The price of this ordering is the opposite window: a
/// crash after the decrements but before the order write leaks reserved
/// stock, which we accept over the alternative of an order that oversells.
#[derive(Clone)]
pub struct Checkout {
    cart: CartClient,
    catalog: CatalogClient,
    orders: OrderClient,
}

impl Checkout {
    pub fn new(cart: CartClient, catalog: CatalogClient, orders: OrderClient) -> Self {
        Self {
            cart,
            catalog,
            orders,
        }
    }

    /// Places an order for everything in the user's cart.
    ///
    /// Validates every line before touching stock, decrements stock per line,
    /// writes the order with price-and-name snapshots, then clears the cart.
    /// Stock mutations are rolled back if a later step fails; a cart that
    /// fails to clear is reported as an error but leaves the written order
    /// in place.
    #[instrument(name = "checkout", fields(user_id = %user_id), skip(self, user_id))]
    pub async fn place_order(&self, user_id: &str) -> Result<Order, CheckoutError> {
        info!("Processing checkout");

        // Step 1: Load the cart
        let lines = self
            .cart
            .get_lines(user_id.to_string())
            .await
            .map_err(|e| CheckoutError::Persistence(e.to_string()))?;

        if lines.is_empty() {
            warn!("Checkout attempted with empty cart");
            return Err(CheckoutError::EmptyCart);
        }

        // Step 2: Validate every line before any write
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = self
                .catalog
                .get_product(line.product_id.clone())
                .await
                .map_err(|e| CheckoutError::Persistence(e.to_string()))?
                .ok_or_else(|| {
                    warn!(product_id = %line.product_id, "Cart references missing product");
                    CheckoutError::ProductNotFound {
                        product: line.product_id.clone(),
                    }
                })?;

            if product.stock < line.quantity {
                warn!(
                    product_id = %product.id,
                    available = product.stock,
                    requested = line.quantity,
                    "Insufficient stock at validation"
                );
                return Err(CheckoutError::InsufficientStock {
                    product: product.name,
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            items.push(OrderItem {
                product_id: product.id,
                name: product.name,
                unit_price: product.price,
                quantity: line.quantity,
            });
        }

        // Step 3: Total from the snapshot prices
        let total = items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum::<Decimal>()
            .round_dp(2);

        // Step 4: Decrement stock, rolling back on the first failure
        let mut applied: Vec<(String, u32)> = Vec::with_capacity(items.len());
        for item in &items {
            match self
                .catalog
                .decrement_stock(item.product_id.clone(), item.quantity)
                .await
            {
                Ok(()) => applied.push((item.product_id.clone(), item.quantity)),
                Err(e) => {
                    warn!(product_id = %item.product_id, error = %e, "Stock decrement failed");
                    self.restore_applied(&applied).await;
                    return Err(match e {
                        CatalogError::InsufficientStock {
                            requested,
                            available,
                        } => CheckoutError::InsufficientStock {
                            product: item.name.clone(),
                            available,
                            requested,
                        },
                        CatalogError::NotFound(_) => CheckoutError::ProductNotFound {
                            product: item.product_id.clone(),
                        },
                        other => CheckoutError::Persistence(other.to_string()),
                    });
                }
            }
        }

        // Step 5: Write the order
        let order = match self
            .orders
            .create_order(user_id.to_string(), items, total)
            .await
        {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Order write failed, restoring stock");
                self.restore_applied(&applied).await;
                return Err(CheckoutError::Persistence(e.to_string()));
            }
        };

        // Step 6: Clear the cart. The order already stands, so a failure
        // here surfaces as an error without undoing anything.
        if let Err(e) = self.cart.clear(user_id.to_string()).await {
            error!(order_id = %order.id, error = %e, "Cart clear failed after order write");
            return Err(CheckoutError::Persistence(e.to_string()));
        }

        info!(order_id = %order.id, total = %order.total, "Checkout complete");
        Ok(order)
    }

    /// Returns decremented stock after a failed checkout. Restore failures
    /// are logged and skipped so the remaining products still get their
    /// stock back.
    async fn restore_applied(&self, applied: &[(String, u32)]) {
        for (product_id, quantity) in applied {
            if let Err(e) = self
                .catalog
                .restore_stock(product_id.clone(), *quantity)
                .await
            {
                error!(product_id = %product_id, error = %e, "Stock restore failed");
            }
        }
    }
}
