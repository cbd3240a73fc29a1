//! Request handlers

pub mod reconciliation;
pub mod differences;
pub mod health;
