//! Middleware for converting handler assertions into responses

pub mod recovery;

pub use recovery::{RecoveryLayer, RecoveryService, UnclassifiedPolicy};
