use std::sync::Arc;

use chrono::Utc;

use invopress_api::app;
use invopress_api::app::services::AppServices;
use invopress_api::config::AppConfig;
use invopress_core::OrderId;
use invopress_mailer::SmtpInvoiceMailer;
use invopress_orders::{InMemoryOrderStore, Order, OrderStore};

#[tokio::main]
async fn main() {
    invopress_observability::init();

    let config = AppConfig::from_env();

    let orders: Arc<dyn OrderStore> = Arc::new(InMemoryOrderStore::new());
    seed_demo_orders(orders.as_ref());

    let services = Arc::new(AppServices::new(
        config.company.clone(),
        config.output_dir.clone(),
        orders,
        Arc::new(SmtpInvoiceMailer::new(config.mail.clone())),
    ));

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

/// Order intake is a separate service; seed a few records so the invoice
/// endpoint has something to serve in a standalone dev run.
fn seed_demo_orders(store: &dyn OrderStore) {
    let seeds = [
        (1, 7, "orders", "postgres", "16", "ap-south-1", 1499.0),
        (2, 7, "analytics", "mysql", "8.4", "eu-west-1", 899.0),
        (3, 12, "sessions", "redis", "7.2", "us-east-1", 249.0),
    ];
    for (order_id, customer_id, db_name, db_engine, db_version, region, price) in seeds {
        store.insert(Order {
            order_id: OrderId::new(order_id),
            customer_id,
            customer_email: format!("customer-{customer_id}@example.test"),
            db_name: db_name.to_string(),
            db_engine: db_engine.to_string(),
            db_version: db_version.to_string(),
            storage_gb: 50,
            region: region.to_string(),
            price_monthly: price,
            created_at: Utc::now(),
        });
    }
}
