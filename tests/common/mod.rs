#![allow(dead_code)]

use payrelease::application::service::PaymentService;
use payrelease::domain::identity::{OwnerProfile, UserId};
use payrelease::domain::validation::{PaymentFields, Validator};
use payrelease::infrastructure::audit::TracingAuditSink;
use payrelease::infrastructure::in_memory::{InMemoryDirectory, InMemoryPaymentStore};
use std::sync::Arc;

pub const HEADER: &str =
    "actor,role,action,payment,amount,currency,provider,payee_account,routing_code";

pub fn fields() -> PaymentFields {
    PaymentFields {
        amount: "150.00".to_string(),
        currency: "USD".to_string(),
        provider: "SWIFT".to_string(),
        payee_account: "123456789".to_string(),
        routing_code: "ABCD1234".to_string(),
    }
}

pub fn service() -> PaymentService {
    service_with_directory(InMemoryDirectory::new())
}

pub fn service_with_directory(directory: InMemoryDirectory) -> PaymentService {
    PaymentService::new(
        Box::new(InMemoryPaymentStore::new()),
        Box::new(directory),
        Arc::new(TracingAuditSink),
        Validator::default(),
    )
}

pub fn profile(id: u64, name: &str, username: &str) -> (UserId, OwnerProfile) {
    (
        UserId(id),
        OwnerProfile {
            full_name: name.to_string(),
            account_number: format!("1000{id:04}"),
            username: username.to_string(),
        },
    )
}
