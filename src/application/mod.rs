//! Application layer orchestrating the payment lifecycle.
//!
//! `PaymentService` is the boundary every caller goes through: it consults the
//! authorization table, runs the validator, and applies lifecycle transitions
//! through the store ports.

pub mod service;
