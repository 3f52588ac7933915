//! Collaborator wiring shared by all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use invopress_core::OrderId;
use invopress_document::CompanyInfo;
use invopress_mailer::InvoiceMailer;
use invopress_orders::OrderStore;

/// Read-only service bundle injected into handlers via `Extension`.
///
/// One instance per process; everything here is safe for concurrent reads.
pub struct AppServices {
    pub company: CompanyInfo,
    pub output_dir: PathBuf,
    pub orders: Arc<dyn OrderStore>,
    pub mailer: Arc<dyn InvoiceMailer>,
}

impl AppServices {
    pub fn new(
        company: CompanyInfo,
        output_dir: PathBuf,
        orders: Arc<dyn OrderStore>,
        mailer: Arc<dyn InvoiceMailer>,
    ) -> Self {
        Self {
            company,
            output_dir,
            orders,
            mailer,
        }
    }

    /// Name of the on-disk artifact for one order.
    pub fn invoice_filename(id: OrderId) -> String {
        format!("invoice-{id}.pdf")
    }

    /// Atomically publishes rendered bytes as `<output_dir>/invoice-<id>.pdf`.
    ///
    /// Writes to a uniquely-named temp file in the same directory and renames
    /// it over the target, so concurrent requests for the same order id never
    /// observe a partially written file.
    pub fn write_invoice_file(&self, id: OrderId, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let target = self.output_dir.join(Self::invoice_filename(id));
        let tmp = self
            .output_dir
            .join(format!(".invoice-{id}.{}.tmp", uuid::Uuid::new_v4()));

        std::fs::write(&tmp, bytes)?;
        if let Err(e) = std::fs::rename(&tmp, &target) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invopress_mailer::{MailConfig, SmtpInvoiceMailer};
    use invopress_orders::InMemoryOrderStore;

    fn test_services(dir: PathBuf) -> AppServices {
        AppServices::new(
            CompanyInfo {
                name: "Co".to_string(),
                tax_id: String::new(),
                address: String::new(),
                contact: String::new(),
            },
            dir,
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(SmtpInvoiceMailer::new(MailConfig::default())),
        )
    }

    #[test]
    fn write_invoice_file_creates_directory_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("invoices");
        let services = test_services(nested.clone());

        let path = services
            .write_invoice_file(OrderId::new(5), b"%PDF-stub")
            .unwrap();
        assert_eq!(path, nested.join("invoice-5.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-stub");

        let leftovers: Vec<_> = std::fs::read_dir(&nested)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_invoice_file_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let services = test_services(dir.path().to_path_buf());

        services.write_invoice_file(OrderId::new(5), b"old").unwrap();
        let path = services.write_invoice_file(OrderId::new(5), b"new").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }
}
