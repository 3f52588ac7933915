//! `invopress-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod format;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use format::{blank_or, format_money, round2};
pub use id::OrderId;
