use crate::domain::lifecycle::Transition;
use crate::domain::payment::{Payment, PaymentDraft, PaymentId, PaymentStatus};
use crate::domain::ports::{PaymentStore, UpdateOutcome};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Column Family for storing payment records.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for bookkeeping such as the id sequence.
pub const CF_META: &str = "meta";

const LAST_ID_KEY: &[u8] = b"last_payment_id";

/// A persistent payment store using RocksDB.
///
/// Payments are stored as JSON under big-endian id keys, so iteration follows
/// id order. Writes that depend on a prior read (id allocation and
/// conditional updates) are serialized through `write_lock`.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("payments" and "meta") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PaymentError::StoreUnavailable(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn read_payment(&self, id: PaymentId) -> Result<Option<Payment>> {
        let cf = self.cf(CF_PAYMENTS)?;
        match self.db.get_cf(&cf, id.0.to_be_bytes())? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn write_payment(&self, payment: &Payment) -> Result<()> {
        let cf = self.cf(CF_PAYMENTS)?;
        self.db
            .put_cf(&cf, payment.id.0.to_be_bytes(), encode(payment)?)?;
        Ok(())
    }

    fn last_id(&self) -> Result<u64> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(&cf, LAST_ID_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    PaymentError::StoreUnavailable(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "corrupt payment id sequence",
                    )))
                })?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }

    fn scan(&self) -> Result<Vec<Payment>> {
        let handle = self.cf(CF_PAYMENTS)?;
        let mut payments = Vec::new();
        for item in self.db.iterator_cf(handle, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            payments.push(decode(&value)?);
        }
        Ok(payments)
    }
}

fn encode(payment: &Payment) -> Result<Vec<u8>> {
    serde_json::to_vec(payment).map_err(|e| {
        PaymentError::StoreUnavailable(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )))
    })
}

fn decode(bytes: &[u8]) -> Result<Payment> {
    serde_json::from_slice(bytes).map_err(|e| {
        PaymentError::StoreUnavailable(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn get(&self, id: PaymentId) -> Result<Option<Payment>> {
        self.read_payment(id)
    }

    async fn create(&self, draft: PaymentDraft) -> Result<Payment> {
        let _guard = self.write_lock.lock().await;

        let id = PaymentId(self.last_id()? + 1);
        let payment = Payment::from_draft(id, draft);

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_PAYMENTS)?, id.0.to_be_bytes(), encode(&payment)?);
        batch.put_cf(self.cf(CF_META)?, LAST_ID_KEY, id.0.to_be_bytes());
        self.db.write(batch)?;

        debug!(payment = %id, "persisted new payment");
        Ok(payment)
    }

    async fn conditional_update(
        &self,
        id: PaymentId,
        expected: PaymentStatus,
        transition: Transition,
    ) -> Result<UpdateOutcome> {
        let _guard = self.write_lock.lock().await;

        let Some(mut payment) = self.read_payment(id)? else {
            return Ok(UpdateOutcome::Missing);
        };
        if payment.status != expected {
            return Ok(UpdateOutcome::Conflict(payment.status));
        }
        transition.apply(&mut payment)?;
        self.write_payment(&payment)?;
        Ok(UpdateOutcome::Updated(payment))
    }

    async fn list_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|p| p.status == status)
            .collect())
    }

    async fn all(&self) -> Result<Vec<Payment>> {
        self.scan()
    }
}
