//! Admin sub-client — product management and back-office listings.
//!
//! Every call requires a signed-in customer with the `admin` role and fails
//! with [`AuthError::AdminRequired`] before any request otherwise. Product
//! mutations drop the catalog cache.

use tracing::info;

use crate::client::StoreClient;
use crate::domain::admin::wire::{OrderStatusResponse, OrderStatusUpdate};
use crate::domain::admin::OrderStatus;
use crate::domain::order::convert::extract_created_order;
use crate::domain::order::Order;
use crate::domain::product::{Page, Product, ProductInput};
use crate::error::{AuthError, SdkError};
use crate::http::client::plain_text;
use crate::http::RetryPolicy;
use crate::session::Customer;
use crate::shared::{OrderId, ProductId};

/// Sub-client for admin operations.
pub struct Admin<'a> {
    pub(crate) client: &'a StoreClient,
}

impl<'a> Admin<'a> {
    pub async fn add_product(&self, input: &ProductInput) -> Result<Product, SdkError> {
        self.ensure_admin()?;
        input.validate()?;

        let product: Product = self
            .client
            .http
            .post("/products/add", input, RetryPolicy::None)
            .await?;
        self.client.response_cache.clear(None);
        info!(product_id = %product.id, "Product added");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, SdkError> {
        self.ensure_admin()?;
        require_id(id.is_valid(), "Product ID is required")?;
        input.validate()?;

        let product: Product = self
            .client
            .http
            .put(&format!("/products/update/{id}"), input, RetryPolicy::None)
            .await?;
        self.client.response_cache.clear(None);
        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Delete a product. Returns the server's confirmation text.
    pub async fn delete_product(&self, id: ProductId) -> Result<String, SdkError> {
        self.ensure_admin()?;
        require_id(id.is_valid(), "Product ID is required")?;

        let body = self
            .client
            .http
            .delete_text(&format!("/products/delete/{id}"), RetryPolicy::None)
            .await?;
        self.client.response_cache.clear(None);
        info!(product_id = %id, "Product deleted");
        Ok(plain_text(&body))
    }

    /// One page of all customers' orders.
    pub async fn orders(&self, page: u32, size: u32) -> Result<Page<Order>, SdkError> {
        self.ensure_admin()?;
        Ok(self
            .client
            .http
            .get(
                &format!("/admin/orders?page={page}&size={size}"),
                RetryPolicy::Idempotent,
            )
            .await?)
    }

    pub async fn customers(&self, page: u32, size: u32) -> Result<Page<Customer>, SdkError> {
        self.ensure_admin()?;
        Ok(self
            .client
            .http
            .get(
                &format!("/admin/customers?page={page}&size={size}"),
                RetryPolicy::Idempotent,
            )
            .await?)
    }

    /// Move an order to `status`. Returns the updated order.
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, SdkError> {
        self.ensure_admin()?;
        require_id(order_id.is_valid(), "Order ID is required")?;

        let resp: OrderStatusResponse = self
            .client
            .http
            .put(
                &format!("/admin/orders/{order_id}/status"),
                &OrderStatusUpdate { status },
                RetryPolicy::None,
            )
            .await?;
        let order = resp.order.ok_or_else(|| {
            SdkError::UnexpectedResponse(
                resp.message
                    .unwrap_or_else(|| "status update returned no order".to_string()),
            )
        })?;
        info!(%order_id, %status, "Order status updated");
        extract_created_order(order)
    }

    fn ensure_admin(&self) -> Result<Customer, AuthError> {
        let customer = self.client.session.require_customer()?;
        if customer.is_admin() {
            Ok(customer)
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}

fn require_id(valid: bool, message: &str) -> Result<(), SdkError> {
    if valid {
        Ok(())
    } else {
        Err(SdkError::InvalidArgument(message.to_string()))
    }
}
