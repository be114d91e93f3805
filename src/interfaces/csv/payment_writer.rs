use crate::domain::payment::Payment;
use crate::error::Result;
use chrono::SecondsFormat;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct PaymentRow<'a> {
    id: u64,
    customer: u64,
    amount: String,
    currency: &'a str,
    provider: &'a str,
    payee_account: &'a str,
    routing_code: &'a str,
    status: &'static str,
    verified_by: Option<u64>,
    submitted_at: Option<String>,
}

impl<'a> From<&'a Payment> for PaymentRow<'a> {
    fn from(payment: &'a Payment) -> Self {
        Self {
            id: payment.id.0,
            customer: payment.customer_id.0,
            amount: payment.amount.to_string(),
            currency: &payment.currency,
            provider: &payment.provider,
            payee_account: &payment.payee_account,
            routing_code: &payment.routing_code,
            status: payment.status.as_str(),
            verified_by: payment.verified_by.map(|id| id.0),
            submitted_at: payment
                .submitted_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments(&mut self, payments: &[Payment]) -> Result<()> {
        if payments.is_empty() {
            self.writer.write_record([
                "id",
                "customer",
                "amount",
                "currency",
                "provider",
                "payee_account",
                "routing_code",
                "status",
                "verified_by",
                "submitted_at",
            ])?;
        }
        for payment in payments {
            self.writer.serialize(PaymentRow::from(payment))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
