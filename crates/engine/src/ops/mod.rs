//! Engine operations, one module per resource.
//!
//! Reads go straight through the connection; writes are single-row updates,
//! so no cross-row database transactions are needed here.

pub(crate) mod aggregation;
pub(crate) mod settings;
pub(crate) mod transactions;
pub(crate) mod wallets;
