use crate::domain::ports::{AuditRecord, AuditSink};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// Writes audit records to the log under the `audit` target.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        let line = serde_json::to_string(&record).map_err(|e| {
            PaymentError::StoreUnavailable(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        info!(target: "audit", "{}", line);
        Ok(())
    }
}

/// Forwards audit records to an in-process receiver.
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    tx: mpsc::UnboundedSender<AuditRecord>,
}

impl ChannelAuditSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AuditRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl AuditSink for ChannelAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        self.tx.send(record).map_err(|_| {
            PaymentError::StoreUnavailable(Box::new(std::io::Error::other(
                "audit receiver closed",
            )))
        })
    }
}
