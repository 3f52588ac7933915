use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

use invopress_api::app::services::AppServices;
use invopress_core::OrderId;
use invopress_document::CompanyInfo;
use invopress_mailer::{InvoiceMailer, MailError};
use invopress_orders::{InMemoryOrderStore, Order, OrderStore, StoreError};

/// Mailer double that records every send instead of dialing SMTP.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(u64, String, PathBuf)>>,
}

impl InvoiceMailer for RecordingMailer {
    fn send_invoice(
        &self,
        order_id: OrderId,
        recipient: &str,
        pdf_path: &Path,
    ) -> Result<(), MailError> {
        self.sent.lock().unwrap().push((
            order_id.as_u64(),
            recipient.to_string(),
            pdf_path.to_path_buf(),
        ));
        Ok(())
    }
}

/// Mailer double that always fails after the handler has written the file.
struct FailingMailer;

impl InvoiceMailer for FailingMailer {
    fn send_invoice(&self, _: OrderId, _: &str, _: &Path) -> Result<(), MailError> {
        Err(MailError::Send("connection refused".to_string()))
    }
}

/// Store wrapper counting lookups, to prove malformed ids never reach it.
struct CountingStore {
    inner: InMemoryOrderStore,
    lookups: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryOrderStore::new(),
            lookups: AtomicUsize::new(0),
        }
    }
}

impl OrderStore for CountingStore {
    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id)
    }

    fn insert(&self, order: Order) {
        self.inner.insert(order);
    }
}

struct TestServer {
    base_url: String,
    output_dir: PathBuf,
    handle: tokio::task::JoinHandle<()>,
    _tmp: tempfile::TempDir,
}

impl TestServer {
    async fn spawn(store: Arc<dyn OrderStore>, mailer: Arc<dyn InvoiceMailer>) -> Self {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        // Not pre-created: lets tests observe whether an action wrote at all.
        let output_dir = tmp.path().join("invoice-data");

        let services = Arc::new(AppServices::new(
            CompanyInfo {
                name: "Payment Service Pvt Ltd".to_string(),
                tax_id: "GSTIN: XX1234XXXX".to_string(),
                address: "Bengaluru, Karnataka, India".to_string(),
                contact: "support@company.com | +91-0000000000".to_string(),
            },
            output_dir.clone(),
            store,
            mailer,
        ));

        // Same router as prod, bound to an ephemeral port.
        let app = invopress_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            output_dir,
            handle,
            _tmp: tmp,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_order(id: u64) -> Order {
    Order {
        order_id: OrderId::new(id),
        customer_id: 7,
        customer_email: "customer-7@example.test".to_string(),
        db_name: "orders".to_string(),
        db_engine: "postgres".to_string(),
        db_version: "16".to_string(),
        storage_gb: 50,
        region: "ap-south-1".to_string(),
        price_monthly: 1499.0,
        created_at: Utc::now(),
    }
}

fn seeded_store(ids: &[u64]) -> Arc<InMemoryOrderStore> {
    let store = Arc::new(InMemoryOrderStore::new());
    for &id in ids {
        store.insert(test_order(id));
    }
    store
}

fn header<'a>(res: &'a reqwest::Response, name: &str) -> &'a str {
    res.headers()
        .get(name)
        .map(|v| v.to_str().unwrap())
        .unwrap_or("")
}

#[tokio::test]
async fn preview_serves_inline_pdf_and_persists_file() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=preview",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, "content-type"), "application/pdf");
    assert_eq!(
        header(&res, "content-disposition"),
        r#"inline; filename="invoice-42.pdf""#
    );
    assert_eq!(header(&res, "cache-control"), "no-store");

    let body = res.bytes().await.unwrap();
    assert!(body.starts_with(b"%PDF"));

    let on_disk = srv.output_dir.join("invoice-42.pdf");
    assert_eq!(std::fs::read(on_disk).unwrap(), body.to_vec());
}

#[tokio::test]
async fn action_defaults_to_preview_when_absent() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!("{}/v1/invoices/42/document", srv.base_url))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(header(&res, "content-disposition").starts_with("inline"));
}

#[tokio::test]
async fn action_parsing_is_case_insensitive() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=DOWNLOAD",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(header(&res, "content-disposition").starts_with("attachment"));
}

#[tokio::test]
async fn download_returns_attachment_without_persisting() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=download",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, "content-type"), "application/pdf");
    assert_eq!(
        header(&res, "content-disposition"),
        r#"attachment; filename="invoice-42.pdf""#
    );

    let body = res.bytes().await.unwrap();
    assert!(!body.is_empty());
    assert!(body.starts_with(b"%PDF"));

    assert!(!srv.output_dir.exists());
}

#[tokio::test]
async fn generate_returns_json_and_issues_no_filesystem_writes() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=generate",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["invoice"]["id"], "42");
    assert_eq!(body["invoice"]["customer_name"], "Customer-7");
    assert_eq!(body["invoice"]["currency"], "INR");
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    // 1499 + 18% tax.
    assert_eq!(body["totals"]["subtotal"], 1499.0);
    assert_eq!(body["totals"]["grand_total"], 1499.0 * 1.18);

    assert!(!srv.output_dir.exists());
}

#[tokio::test]
async fn sendemail_confirms_after_mailer_and_reports_file_path() {
    let mailer = Arc::new(RecordingMailer::default());
    let srv = TestServer::spawn(seeded_store(&[42]), mailer.clone()).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=sendemail",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invoice email sent successfully");
    let file = body["file"].as_str().unwrap();
    assert!(file.ends_with("invoice-42.pdf"));
    assert!(std::path::Path::new(file).exists());

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 42);
    assert_eq!(sent[0].1, "customer-7@example.test");
}

#[tokio::test]
async fn sendemail_failure_is_500_and_leaves_file_on_disk() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(FailingMailer)).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=sendemail",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("connection refused"));

    // At-least-attempted-write: no rollback of the rendered artifact.
    assert!(srv.output_dir.join("invoice-42.pdf").exists());
}

#[tokio::test]
async fn unknown_action_is_rejected_with_allowed_list() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=bogus",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "error": "invalid action",
            "allowed": ["preview", "download", "generate", "upload"],
        })
    );
}

#[tokio::test]
async fn upload_is_not_implemented() {
    let srv = TestServer::spawn(seeded_store(&[42]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/42/document?action=upload",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "upload action not implemented yet");
}

#[tokio::test]
async fn missing_order_is_404_regardless_of_action() {
    let srv = TestServer::spawn(seeded_store(&[]), Arc::new(RecordingMailer::default())).await;

    for action in ["preview", "download", "generate", "sendemail", "upload", "bogus"] {
        let res = reqwest::get(format!(
            "{}/v1/invoices/42/document?action={action}",
            srv.base_url
        ))
        .await
        .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND, "action={action}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "order not found");
    }
}

#[tokio::test]
async fn malformed_id_fails_before_any_lookup() {
    let store = Arc::new(CountingStore::new());
    store.insert(test_order(42));
    let mailer = Arc::new(RecordingMailer::default());
    let srv = TestServer::spawn(store.clone(), mailer.clone()).await;

    let res = reqwest::get(format!(
        "{}/v1/invoices/not-a-number/document?action=sendemail",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid id");

    assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let srv = TestServer::spawn(seeded_store(&[]), Arc::new(RecordingMailer::default())).await;

    let res = reqwest::get(format!("{}/healthz", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
