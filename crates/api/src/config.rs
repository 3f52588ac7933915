//! Application configuration.
//!
//! Built once in `main` from the environment and passed into the service
//! wiring as a plain value, so handlers never consult ambient globals.

use std::path::PathBuf;

use invopress_document::CompanyInfo;
use invopress_mailer::MailConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Working directory for rendered invoice files (`preview`/`sendemail`).
    pub output_dir: PathBuf,
    pub company: CompanyInfo,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let smtp_port = env_or("SMTP_PORT", "1025").parse::<u16>().unwrap_or_else(|_| {
            tracing::warn!("SMTP_PORT is not a valid port; falling back to 1025");
            1025
        });

        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            output_dir: PathBuf::from(env_or("INVOICE_PDF_DIR", "./invoice-data")),
            company: CompanyInfo {
                name: env_or("COMPANY_NAME", "Payment Service Pvt Ltd"),
                tax_id: env_or("COMPANY_TAX_ID", "GSTIN: XX1234XXXX"),
                address: env_or("COMPANY_ADDRESS", "Bengaluru, Karnataka, India"),
                contact: env_or("COMPANY_CONTACT", "support@company.com | +91-XXXXXXXXXX"),
            },
            mail: MailConfig {
                smtp_host: env_or("SMTP_HOST", "localhost"),
                smtp_port,
                from: env_or("MAIL_FROM", "billing@local.test"),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
