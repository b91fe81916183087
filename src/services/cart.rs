use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::CartClient;
use crate::domain::CartLine;
use crate::error::CartError;
use crate::messages::{CartRequest, ServiceResponse};

/// Owns every user's cart lines, keyed by user id in insertion order.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    carts: HashMap<String, Vec<CartLine>>,
    next_id: u64,
}

impl CartService {
    pub fn new(buffer_size: usize) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            carts: HashMap::new(),
            next_id: 1,
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::GetLines {
                    user_id,
                    respond_to,
                } => {
                    self.handle_get_lines(user_id, respond_to);
                }
                CartRequest::UpsertLine {
                    user_id,
                    product_id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_upsert_line(user_id, product_id, quantity, respond_to);
                }
                CartRequest::SetLineQuantity {
                    user_id,
                    line_id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_set_line_quantity(user_id, line_id, quantity, respond_to);
                }
                CartRequest::Clear {
                    user_id,
                    respond_to,
                } => {
                    self.handle_clear(user_id, respond_to);
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_get_lines(
        &self,
        user_id: String,
        respond_to: ServiceResponse<Vec<CartLine>, CartError>,
    ) {
        debug!("Processing get_lines request");

        let lines = self.carts.get(&user_id).cloned().unwrap_or_default();
        debug!(line_count = lines.len(), "Cart read");

        let _ = respond_to.send(Ok(lines));
    }

    /// Adding a product already in the cart increases that line's quantity
    /// instead of inserting a second line. A merge that would overflow the
    /// quantity counter is rejected and leaves the line unchanged.
    #[instrument(fields(user_id = %user_id, product_id = %product_id, quantity = quantity), skip(self, respond_to))]
    fn handle_upsert_line(
        &mut self,
        user_id: String,
        product_id: String,
        quantity: u32,
        respond_to: ServiceResponse<CartLine, CartError>,
    ) {
        debug!("Processing upsert_line request");

        let lines = self.carts.entry(user_id.clone()).or_default();

        let result = match lines.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => match line.quantity.checked_add(quantity) {
                Some(merged) => {
                    line.quantity = merged;
                    info!(line_id = %line.id, quantity = line.quantity, "Cart line quantity increased");
                    Ok(line.clone())
                }
                None => {
                    error!(
                        line_id = %line.id,
                        current = line.quantity,
                        added = quantity,
                        "Merged quantity overflows"
                    );
                    Err(CartError::InvalidQuantity(
                        i64::from(line.quantity) + i64::from(quantity),
                    ))
                }
            },
            None => {
                let id = format!("item_{}", self.next_id);
                self.next_id += 1;

                let line = CartLine {
                    id,
                    user_id,
                    product_id,
                    quantity,
                };
                lines.push(line.clone());
                info!(line_id = %line.id, "Cart line added");
                Ok(line)
            }
        };

        let _ = respond_to.send(result);
    }

    /// A quantity of zero or less removes the line (idempotently); a positive
    /// quantity replaces it and fails if the line does not exist.
    #[instrument(fields(user_id = %user_id, line_id = %line_id, quantity = quantity), skip(self, respond_to))]
    fn handle_set_line_quantity(
        &mut self,
        user_id: String,
        line_id: String,
        quantity: i64,
        respond_to: ServiceResponse<Option<CartLine>, CartError>,
    ) {
        debug!("Processing set_line_quantity request");

        let result = if quantity <= 0 {
            if let Some(lines) = self.carts.get_mut(&user_id) {
                lines.retain(|line| line.id != line_id);
            }
            info!("Cart line removed");
            Ok(None)
        } else {
            match u32::try_from(quantity) {
                Ok(quantity) => {
                    match self
                        .carts
                        .get_mut(&user_id)
                        .and_then(|lines| lines.iter_mut().find(|line| line.id == line_id))
                    {
                        Some(line) => {
                            line.quantity = quantity;
                            info!(quantity = line.quantity, "Cart line updated");
                            Ok(Some(line.clone()))
                        }
                        None => {
                            error!("Cart line not found");
                            Err(CartError::ItemNotFound(line_id))
                        }
                    }
                }
                Err(_) => Err(CartError::InvalidQuantity(quantity)),
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_clear(&mut self, user_id: String, respond_to: ServiceResponse<usize, CartError>) {
        debug!("Processing clear request");

        let cleared = self.carts.remove(&user_id).map(|lines| lines.len()).unwrap_or(0);
        info!(cleared = cleared, "Cart cleared");

        let _ = respond_to.send(Ok(cleared));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_service() -> CartClient {
        let (service, client) = CartService::new(8);
        tokio::spawn(service.run());
        client
    }

    #[tokio::test]
    async fn upsert_inserts_then_merges_quantities() {
        let client = start_service();

        let first = client
            .upsert_line("user_1".to_string(), "product_1".to_string(), 2)
            .await
            .unwrap();
        assert_eq!(first.quantity, 2);

        let merged = client
            .upsert_line("user_1".to_string(), "product_1".to_string(), 3)
            .await
            .unwrap();
        assert_eq!(merged.id, first.id);
        assert_eq!(merged.quantity, 5);

        let lines = client.get_lines("user_1".to_string()).await.unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    async fn lines_keep_insertion_order_per_user() {
        let client = start_service();
        for product in ["product_1", "product_2", "product_3"] {
            client
                .upsert_line("user_1".to_string(), product.to_string(), 1)
                .await
                .unwrap();
        }
        client
            .upsert_line("user_2".to_string(), "product_9".to_string(), 1)
            .await
            .unwrap();

        let lines = client.get_lines("user_1".to_string()).await.unwrap();
        let products: Vec<&str> = lines.iter().map(|l| l.product_id.as_str()).collect();

        assert_eq!(products, vec!["product_1", "product_2", "product_3"]);
    }

    #[tokio::test]
    async fn upsert_rejects_merges_past_the_quantity_limit() {
        let client = start_service();

        let huge = 3_000_000_000;
        client
            .upsert_line("user_1".to_string(), "product_1".to_string(), huge)
            .await
            .unwrap();

        let merged = client
            .upsert_line("user_1".to_string(), "product_1".to_string(), huge)
            .await;
        assert_eq!(merged, Err(CartError::InvalidQuantity(6_000_000_000)));

        // The line is unchanged and the service still answers.
        let lines = client.get_lines("user_1".to_string()).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, huge);
    }

    #[tokio::test]
    async fn set_quantity_updates_or_removes() {
        let client = start_service();
        let line = client
            .upsert_line("user_1".to_string(), "product_1".to_string(), 2)
            .await
            .unwrap();

        let updated = client
            .set_line_quantity("user_1".to_string(), line.id.clone(), 7)
            .await
            .unwrap();
        assert_eq!(updated.unwrap().quantity, 7);

        let removed = client
            .set_line_quantity("user_1".to_string(), line.id.clone(), 0)
            .await
            .unwrap();
        assert!(removed.is_none());
        assert!(client.get_lines("user_1".to_string()).await.unwrap().is_empty());

        // Removal is idempotent, updates are not.
        let removed_again = client
            .set_line_quantity("user_1".to_string(), line.id.clone(), -1)
            .await
            .unwrap();
        assert!(removed_again.is_none());

        let missing = client
            .set_line_quantity("user_1".to_string(), line.id, 3)
            .await;
        assert!(matches!(missing, Err(CartError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn clear_removes_all_lines_and_reports_count() {
        let client = start_service();
        for product in ["product_1", "product_2"] {
            client
                .upsert_line("user_1".to_string(), product.to_string(), 1)
                .await
                .unwrap();
        }

        let cleared = client.clear("user_1".to_string()).await.unwrap();
        assert_eq!(cleared, 2);

        let again = client.clear("user_1".to_string()).await.unwrap();
        assert_eq!(again, 0);

        assert!(client.get_lines("user_1".to_string()).await.unwrap().is_empty());
    }
}
