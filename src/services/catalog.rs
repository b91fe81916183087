use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::CatalogClient;
use crate::domain::{Product, ProductInput};
use crate::error::CatalogError;
use crate::messages::{CatalogRequest, ServiceResponse};

/// Owns the product catalog, including every product's stock count.
///
/// Stock mutations are handled inline in the message loop, so a conditional
/// decrement is one indivisible check-and-write. Concurrent checkouts
/// serialize here and nowhere else.
pub struct CatalogService {
    receiver: mpsc::Receiver<CatalogRequest>,
    products: HashMap<String, Product>,
    /// Insertion order of product ids; listings walk it newest first.
    insertion_order: Vec<String>,
    next_id: u64,
}

impl CatalogService {
    pub fn new(buffer_size: usize) -> (Self, CatalogClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            products: HashMap::new(),
            insertion_order: Vec::new(),
            next_id: 1,
        };
        let client = CatalogClient::new(sender);
        (service, client)
    }

    #[instrument(name = "catalog_service", skip(self))]
    pub async fn run(mut self) {
        info!("CatalogService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CatalogRequest::ListProducts {
                    limit,
                    offset,
                    respond_to,
                } => {
                    self.handle_list_products(limit, offset, respond_to);
                }
                CatalogRequest::GetProduct { id, respond_to } => {
                    self.handle_get_product(id, respond_to);
                }
                CatalogRequest::CreateProduct { input, respond_to } => {
                    self.handle_create_product(input, respond_to);
                }
                CatalogRequest::UpdateProduct {
                    id,
                    input,
                    respond_to,
                } => {
                    self.handle_update_product(id, input, respond_to);
                }
                CatalogRequest::DeleteProduct { id, respond_to } => {
                    self.handle_delete_product(id, respond_to);
                }
                CatalogRequest::GetStock { id, respond_to } => {
                    self.handle_get_stock(id, respond_to);
                }
                CatalogRequest::DecrementStock {
                    id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_decrement_stock(id, quantity, respond_to);
                }
                CatalogRequest::RestoreStock {
                    id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_restore_stock(id, quantity, respond_to);
                }
                CatalogRequest::Shutdown => {
                    info!("CatalogService shutting down");
                    break;
                }
            }
        }

        info!("CatalogService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_products(
        &self,
        limit: usize,
        offset: usize,
        respond_to: ServiceResponse<Vec<Product>, CatalogError>,
    ) {
        debug!("Processing list_products request");

        let products: Vec<Product> = self
            .insertion_order
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .filter_map(|id| self.products.get(id).cloned())
            .collect();

        info!(product_count = products.len(), "Listed products");
        let _ = respond_to.send(Ok(products));
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_get_product(
        &self,
        id: String,
        respond_to: ServiceResponse<Option<Product>, CatalogError>,
    ) {
        debug!("Processing get_product request");

        let product = self.products.get(&id).cloned();

        match &product {
            Some(product) => {
                debug!(product_name = %product.name, price = %product.price, "Product found")
            }
            None => debug!("Product not found"),
        }

        let _ = respond_to.send(Ok(product));
    }

    #[instrument(fields(product_name = %input.name), skip(self, input, respond_to))]
    fn handle_create_product(
        &mut self,
        input: ProductInput,
        respond_to: ServiceResponse<Product, CatalogError>,
    ) {
        debug!("Processing create_product request");

        let result = validate_input(&input).map(|stock| {
            let id = format!("product_{}", self.next_id);
            self.next_id += 1;

            let product = Product {
                id: id.clone(),
                name: input.name.trim().to_string(),
                price: input.price,
                stock,
                description: input.description.trim().to_string(),
                image_url: input.image_url.trim().to_string(),
                created_at: Utc::now(),
            };
            self.products.insert(id.clone(), product.clone());
            self.insertion_order.push(id);

            info!(product_id = %product.id, stock = product.stock, "Product created");
            product
        });

        if let Err(e) = &result {
            error!(error = %e, "Product validation failed");
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, input, respond_to))]
    fn handle_update_product(
        &mut self,
        id: String,
        input: ProductInput,
        respond_to: ServiceResponse<Product, CatalogError>,
    ) {
        debug!("Processing update_product request");

        let result = match validate_input(&input) {
            Ok(stock) => match self.products.get_mut(&id) {
                Some(product) => {
                    product.name = input.name.trim().to_string();
                    product.price = input.price;
                    product.stock = stock;
                    product.description = input.description.trim().to_string();
                    product.image_url = input.image_url.trim().to_string();

                    info!(product_name = %product.name, "Product updated");
                    Ok(product.clone())
                }
                None => {
                    error!("Product not found for update");
                    Err(CatalogError::NotFound(id))
                }
            },
            Err(e) => {
                error!(error = %e, "Product validation failed");
                Err(e)
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_delete_product(&mut self, id: String, respond_to: ServiceResponse<(), CatalogError>) {
        debug!("Processing delete_product request");

        let result = match self.products.remove(&id) {
            Some(product) => {
                self.insertion_order.retain(|existing| existing != &id);
                info!(product_name = %product.name, "Product deleted");
                Ok(())
            }
            None => {
                error!("Product not found for delete");
                Err(CatalogError::NotFound(id))
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_get_stock(&self, id: String, respond_to: ServiceResponse<u32, CatalogError>) {
        debug!("Processing get_stock request");

        let result = match self.products.get(&id) {
            Some(product) => {
                debug!(stock_level = product.stock, "Stock checked");
                Ok(product.stock)
            }
            None => Err(CatalogError::NotFound(id)),
        };

        let _ = respond_to.send(result);
    }

    /// The conditional decrement. Check and write happen in one handler
    /// invocation, so no other request can interleave between them.
    #[instrument(fields(product_id = %id, quantity = quantity), skip(self, respond_to))]
    fn handle_decrement_stock(
        &mut self,
        id: String,
        quantity: u32,
        respond_to: ServiceResponse<(), CatalogError>,
    ) {
        debug!("Processing decrement_stock request");

        let result = match self.products.get_mut(&id) {
            Some(product) => {
                if product.stock >= quantity {
                    product.stock -= quantity;
                    info!(remaining_stock = product.stock, "Stock decremented");
                    Ok(())
                } else {
                    error!(
                        available = product.stock,
                        requested = quantity,
                        "Insufficient stock"
                    );
                    Err(CatalogError::InsufficientStock {
                        requested: quantity,
                        available: product.stock,
                    })
                }
            }
            None => {
                error!("Product not found");
                Err(CatalogError::NotFound(id))
            }
        };

        let _ = respond_to.send(result);
    }

    /// Compensation for a decrement that must be unwound. A missing product
    /// means it was deleted mid-flight; there is nothing to restore onto.
    /// The add saturates at the counter maximum.
    #[instrument(fields(product_id = %id, quantity = quantity), skip(self, respond_to))]
    fn handle_restore_stock(
        &mut self,
        id: String,
        quantity: u32,
        respond_to: ServiceResponse<(), CatalogError>,
    ) {
        debug!("Processing restore_stock request");

        match self.products.get_mut(&id) {
            Some(product) => {
                product.stock = product.stock.saturating_add(quantity);
                info!(restored_stock = product.stock, "Stock restored");
            }
            None => debug!("Product missing, nothing to restore"),
        }

        let _ = respond_to.send(Ok(()));
    }
}

/// Shared validation for create and update. Returns the parsed stock count.
fn validate_input(input: &ProductInput) -> Result<u32, CatalogError> {
    if input.name.trim().chars().count() < 2 {
        return Err(CatalogError::ValidationError(
            "Product name is required".to_string(),
        ));
    }
    if input.price <= Decimal::ZERO {
        return Err(CatalogError::ValidationError(
            "Valid price is required".to_string(),
        ));
    }
    u32::try_from(input.stock).map_err(|_| {
        CatalogError::ValidationError("Valid stock quantity is required".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start_service() -> CatalogClient {
        let (service, client) = CatalogService::new(8);
        tokio::spawn(service.run());
        client
    }

    fn input(name: &str, price: Decimal, stock: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price,
            stock,
            description: String::new(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let client = start_service();

        let bad_name = client.create_product(input("X", dec!(10.00), 5)).await;
        assert!(matches!(bad_name, Err(CatalogError::ValidationError(_))));

        let bad_price = client.create_product(input("Widget", dec!(0), 5)).await;
        assert!(matches!(bad_price, Err(CatalogError::ValidationError(_))));

        let bad_stock = client.create_product(input("Widget", dec!(10.00), -1)).await;
        assert!(matches!(bad_stock, Err(CatalogError::ValidationError(_))));

        let ok = client.create_product(input("Widget", dec!(10.00), 5)).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn list_is_newest_first_with_pagination() {
        let client = start_service();
        for name in ["First", "Second", "Third"] {
            client
                .create_product(input(name, dec!(1.00), 1))
                .await
                .unwrap();
        }

        let all = client.list_products(20, 0).await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);

        let page = client.list_products(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Second");
    }

    #[tokio::test]
    async fn decrement_applies_only_with_sufficient_stock() {
        let client = start_service();
        let product = client
            .create_product(input("Widget", dec!(25.00), 2))
            .await
            .unwrap();

        // Exact stock drains to zero.
        client.decrement_stock(product.id.clone(), 2).await.unwrap();
        assert_eq!(client.get_stock(product.id.clone()).await.unwrap(), 0);

        // Any further decrement fails and leaves stock untouched.
        let result = client.decrement_stock(product.id.clone(), 1).await;
        assert!(matches!(
            result,
            Err(CatalogError::InsufficientStock {
                requested: 1,
                available: 0
            })
        ));
        assert_eq!(client.get_stock(product.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_decrement_does_not_change_stock() {
        let client = start_service();
        let product = client
            .create_product(input("Widget", dec!(25.00), 1))
            .await
            .unwrap();

        let result = client.decrement_stock(product.id.clone(), 5).await;

        assert!(matches!(
            result,
            Err(CatalogError::InsufficientStock {
                requested: 5,
                available: 1
            })
        ));
        assert_eq!(client.get_stock(product.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_decrements_never_oversell() {
        let client = start_service();
        let product = client
            .create_product(input("Widget", dec!(25.00), 1))
            .await
            .unwrap();

        let first = client.decrement_stock(product.id.clone(), 1);
        let second = client.decrement_stock(product.id.clone(), 1);
        let (a, b) = tokio::join!(first, second);

        assert!(a.is_ok() != b.is_ok(), "exactly one decrement must win");
        assert_eq!(client.get_stock(product.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn restore_adds_stock_back() {
        let client = start_service();
        let product = client
            .create_product(input("Widget", dec!(25.00), 5))
            .await
            .unwrap();

        client.decrement_stock(product.id.clone(), 3).await.unwrap();
        client.restore_stock(product.id.clone(), 3).await.unwrap();

        assert_eq!(client.get_stock(product.id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn restore_on_missing_product_is_a_noop() {
        let client = start_service();

        let result = client.restore_stock("product_404".to_string(), 3).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn restore_saturates_at_the_stock_limit() {
        let client = start_service();
        let product = client
            .create_product(input("Widget", dec!(25.00), i64::from(u32::MAX - 1)))
            .await
            .unwrap();

        client.restore_stock(product.id.clone(), 5).await.unwrap();

        assert_eq!(client.get_stock(product.id).await.unwrap(), u32::MAX);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_delete_removes() {
        let client = start_service();
        let product = client
            .create_product(input("Widget", dec!(25.00), 5))
            .await
            .unwrap();

        let updated = client
            .update_product(product.id.clone(), input("Better Widget", dec!(30.00), 7))
            .await
            .unwrap();
        assert_eq!(updated.name, "Better Widget");
        assert_eq!(updated.price, dec!(30.00));
        assert_eq!(updated.stock, 7);
        assert_eq!(updated.id, product.id);

        client.delete_product(product.id.clone()).await.unwrap();
        assert_eq!(client.get_product(product.id.clone()).await.unwrap(), None);

        let missing = client.delete_product(product.id).await;
        assert!(matches!(missing, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_stock_fails_for_unknown_product() {
        let client = start_service();

        let result = client.get_stock("product_404".to_string()).await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }
}
