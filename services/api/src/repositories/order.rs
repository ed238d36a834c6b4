//! Order repository

use reqwest::Method;
use tracing::info;

use crate::{
    client::ApiClient,
    error::ApiResult,
    models::{MessageResponse, Order},
};

/// Order repository
#[derive(Clone)]
pub struct OrderRepository {
    client: ApiClient,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Buy a course outright
    ///
    /// Fails with [`crate::ApiError::Conflict`] when the course is already
    /// owned.
    pub async fn purchase(&self, course_id: i64) -> ApiResult<Order> {
        info!("Purchasing course: {}", course_id);

        let builder = self
            .client
            .request(Method::POST, "/api/orders/purchase")?
            .query(&[("courseId", course_id)]);
        self.client.fetch(builder).await
    }

    /// Get the order history of the current user
    pub async fn get_all(&self) -> ApiResult<Vec<Order>> {
        self.client.get("/api/orders").await
    }

    /// Get one order of the current user
    pub async fn get_by_id(&self, order_id: i64) -> ApiResult<Order> {
        self.client.get(&format!("/api/orders/{}", order_id)).await
    }

    /// Cancel a pending order
    pub async fn cancel(&self, order_id: i64) -> ApiResult<MessageResponse> {
        info!("Cancelling order: {}", order_id);
        self.client
            .delete(&format!("/api/orders/{}/cancel", order_id))
            .await
    }
}
