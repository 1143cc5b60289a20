//! Browse the catalog, fill a cart and check out against a running backend.
//!
//! ```bash
//! BUYGREEN_API_BASE_URL=http://localhost:8080 \
//! BUYGREEN_DEMO_EMAIL=jane@example.com BUYGREEN_DEMO_PASSWORD=secret1 \
//! cargo run --example storefront
//! ```

use buygreen_sdk::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), SdkError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("buygreen_sdk=info")),
        )
        .init();

    // BUYGREEN_SESSION_FILE keeps the login across runs.
    let client = StoreClientBuilder::from_config(ClientConfig::from_env()?).build()?;

    client.subscribe(|event| {
        if let StoreEvent::CartChanged(cart) = event {
            println!("  cart: {} item(s), subtotal {}", cart.count(), cart.subtotal());
        }
    });

    let page = client.products().list(0, 6).await?;
    println!("{} products:", page.total_elements);
    for product in &page.content {
        println!("  #{} {} ({})", product.id, product.name, product.price);
        client.history().add(product);
    }

    let (Ok(email), Ok(password)) = (
        std::env::var("BUYGREEN_DEMO_EMAIL"),
        std::env::var("BUYGREEN_DEMO_PASSWORD"),
    ) else {
        println!("Set BUYGREEN_DEMO_EMAIL and BUYGREEN_DEMO_PASSWORD to try the cart.");
        return Ok(());
    };

    let customer = client.auth().login(&email, &password).await?;
    println!("Signed in as {}", customer.name);

    client.cart().fetch().await?;
    if let Some(product) = page.content.iter().find(|p| p.in_stock()) {
        client.cart().add(product, 1).await?;
    }

    let total = client.cart().subtotal().await;
    let validation = client.coupons().validate("GREEN10", total).await?;
    let mut request = PlaceOrderRequest::default();
    if let Some(coupon) = validation.applied() {
        println!("Coupon {} saves {}", coupon.code, coupon.discount_amount);
        request = request.with_coupon(coupon.code);
    }

    match client.checkout().place(request).await {
        Ok(CheckoutOutcome::Placed(order)) | Ok(CheckoutOutcome::Recovered(order)) => {
            println!("Order #{} placed", order.id);
        }
        Ok(CheckoutOutcome::Stalled(pending)) => {
            println!("Order is taking long; checking history...");
            let found = pending.recover().await?;
            match found {
                Some(order) => println!("Order #{} found", order.id),
                None => println!("Order #{} placed", pending.wait().await?.id),
            }
        }
        Err(SdkError::EmptyOrder) => println!("Nothing to order"),
        Err(e) => return Err(e),
    }

    let picks = client.products().recommended(4).await?;
    println!("Recommended: {:?}", picks.iter().map(|p| &p.name).collect::<Vec<_>>());

    client.auth().logout().await;
    Ok(())
}
