use std::fs;
use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::{SmtpTransport, Transport};
use thiserror::Error;

use invopress_core::OrderId;

/// Mail delivery failure. Wraps the rendered-file-missing case as well as
/// transport-level problems so the HTTP layer can treat them uniformly.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invoice pdf not found: {0}")]
    MissingAttachment(PathBuf),

    #[error("failed to read invoice pdf: {0}")]
    ReadAttachment(#[from] std::io::Error),

    #[error("invalid mail address: {0}")]
    InvalidMailbox(String),

    #[error("failed to build email: {0}")]
    Build(String),

    #[error("failed to send email: {0}")]
    Send(String),
}

/// Seam the dispatcher talks to; tests substitute a recording fake.
pub trait InvoiceMailer: Send + Sync {
    /// Sends the rendered invoice at `pdf_path` to `recipient`. Blocking.
    fn send_invoice(&self, order_id: OrderId, recipient: &str, pdf_path: &Path)
    -> Result<(), MailError>;
}

/// SMTP connection settings, supplied by application configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        // Local dev relay (MailHog-style), matching the service defaults.
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            from: "billing@local.test".to_string(),
        }
    }
}

/// Sends invoices over a plain SMTP relay. No retry; one dial per send.
pub struct SmtpInvoiceMailer {
    config: MailConfig,
}

impl SmtpInvoiceMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn build_message(
        &self,
        order_id: OrderId,
        recipient: &str,
        pdf_path: &Path,
    ) -> Result<Message, MailError> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|_| MailError::InvalidMailbox(self.config.from.clone()))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|_| MailError::InvalidMailbox(recipient.to_string()))?;

        let pdf_bytes = fs::read(pdf_path)?;
        let filename = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("invoice-{order_id}.pdf"));

        let content_type = ContentType::parse("application/pdf")
            .map_err(|e| MailError::Build(e.to_string()))?;
        let attachment = Attachment::new(filename).body(pdf_bytes, content_type);

        let body = "Hi,\n\nPlease find your invoice attached.\n\nThanks,\nBilling Team\n";

        Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Invoice for Order #{order_id}"))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(attachment),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

impl InvoiceMailer for SmtpInvoiceMailer {
    fn send_invoice(
        &self,
        order_id: OrderId,
        recipient: &str,
        pdf_path: &Path,
    ) -> Result<(), MailError> {
        if !pdf_path.exists() {
            return Err(MailError::MissingAttachment(pdf_path.to_path_buf()));
        }

        let message = self.build_message(order_id, recipient, pdf_path)?;

        // Plain relay: dev/staging SMTP sinks do not speak TLS.
        let transport = SmtpTransport::builder_dangerous(self.config.smtp_host.as_str())
            .port(self.config.smtp_port)
            .build();

        transport
            .send(&message)
            .map_err(|e| MailError::Send(e.to_string()))?;

        tracing::info!(order_id = order_id.as_u64(), recipient, "invoice email sent");
        Ok(())
    }
}
