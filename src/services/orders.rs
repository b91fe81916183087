use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::clients::OrderClient;
use crate::domain::{Order, OrderItem, OrderStatus};
use crate::error::OrderError;
use crate::messages::{OrderRequest, ServiceResponse};

/// Append-only ledger of finalized orders. Orders are never mutated or
/// deleted once written; reads walk the log newest first.
pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    orders: Vec<Order>,
    next_id: u64,
}

impl OrderService {
    pub fn new(buffer_size: usize) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            orders: Vec::new(),
            next_id: 1,
        };
        let client = OrderClient::new(sender);
        (service, client)
    }

    #[instrument(name = "order_service", skip(self))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::CreateOrder {
                    user_id,
                    items,
                    total,
                    respond_to,
                } => {
                    self.handle_create_order(user_id, items, total, respond_to);
                }
                OrderRequest::ListByUser {
                    user_id,
                    respond_to,
                } => {
                    self.handle_list_by_user(user_id, respond_to);
                }
                OrderRequest::ListAll { respond_to } => {
                    self.handle_list_all(respond_to);
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
            }
        }

        info!("OrderService stopped");
    }

    #[instrument(fields(user_id = %user_id, total = %total), skip(self, items, respond_to))]
    fn handle_create_order(
        &mut self,
        user_id: String,
        items: Vec<OrderItem>,
        total: Decimal,
        respond_to: ServiceResponse<Order, OrderError>,
    ) {
        debug!("Processing create_order request");

        let id = format!("order_{}", self.next_id);
        self.next_id += 1;

        let order = Order {
            id,
            user_id,
            total,
            status: OrderStatus::Pending,
            items,
            created_at: Utc::now(),
        };
        self.orders.push(order.clone());

        info!(order_id = %order.id, item_count = order.items.len(), "Order created");
        let _ = respond_to.send(Ok(order));
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_list_by_user(
        &self,
        user_id: String,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    ) {
        debug!("Processing list_by_user request");

        let orders: Vec<Order> = self
            .orders
            .iter()
            .rev()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();

        info!(order_count = orders.len(), "Listed user orders");
        let _ = respond_to.send(Ok(orders));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_all(&self, respond_to: ServiceResponse<Vec<Order>, OrderError>) {
        debug!("Processing list_all request");

        let orders: Vec<Order> = self.orders.iter().rev().cloned().collect();

        info!(order_count = orders.len(), "Listed all orders");
        let _ = respond_to.send(Ok(orders));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start_service() -> OrderClient {
        let (service, client) = OrderService::new(8);
        tokio::spawn(service.run());
        client
    }

    fn widget_snapshot(quantity: u32) -> Vec<OrderItem> {
        vec![OrderItem {
            product_id: "product_1".to_string(),
            name: "Widget".to_string(),
            unit_price: dec!(25.00),
            quantity,
        }]
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_pending_status() {
        let client = start_service();

        let first = client
            .create_order("user_1".to_string(), widget_snapshot(2), dec!(50.00))
            .await
            .unwrap();
        let second = client
            .create_order("user_1".to_string(), widget_snapshot(1), dec!(25.00))
            .await
            .unwrap();

        assert_eq!(first.id, "order_1");
        assert_eq!(second.id, "order_2");
        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(first.total, dec!(50.00));
        assert_eq!(first.items.len(), 1);
    }

    #[tokio::test]
    async fn list_by_user_filters_and_returns_newest_first() {
        let client = start_service();
        client
            .create_order("user_1".to_string(), widget_snapshot(1), dec!(25.00))
            .await
            .unwrap();
        client
            .create_order("user_2".to_string(), widget_snapshot(1), dec!(25.00))
            .await
            .unwrap();
        client
            .create_order("user_1".to_string(), widget_snapshot(2), dec!(50.00))
            .await
            .unwrap();

        let orders = client.list_by_user("user_1".to_string()).await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, "order_3");
        assert_eq!(orders[1].id, "order_1");
    }

    #[tokio::test]
    async fn list_all_returns_every_order_newest_first() {
        let client = start_service();
        client
            .create_order("user_1".to_string(), widget_snapshot(1), dec!(25.00))
            .await
            .unwrap();
        client
            .create_order("user_2".to_string(), widget_snapshot(2), dec!(50.00))
            .await
            .unwrap();

        let orders = client.list_all().await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, "order_2");
        assert_eq!(orders[1].id, "order_1");
    }
}
