//! Outbound invoice mail.
//!
//! Thin seam used only by the `sendemail` action: given a rendered file
//! path, an order id and a recipient, deliver the PDF as an attachment.
//! The SMTP transport is blocking; callers decide where to run it.

pub mod smtp;

pub use smtp::{InvoiceMailer, MailConfig, MailError, SmtpInvoiceMailer};
