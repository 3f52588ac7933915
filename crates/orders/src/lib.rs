//! Order records and the lookup seam the invoice endpoint depends on.
//!
//! Persistence proper is outside this system; the dispatcher only needs
//! lookup-by-id returning a record or a not-found signal. [`OrderStore`] is
//! that seam, with an in-memory implementation for the server and tests.

pub mod order;
pub mod store;

pub use order::Order;
pub use store::{InMemoryOrderStore, OrderStore, StoreError};
