//! Domain layer: the payment model and the pure rules around it.
//!
//! Nothing here performs IO. Persistence, identity lookup and auditing are
//! reached only through the traits in `ports`.

pub mod authorization;
pub mod identity;
pub mod lifecycle;
pub mod payment;
pub mod ports;
pub mod validation;
