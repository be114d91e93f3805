use crate::domain::authorization::Action;
use crate::domain::identity::{Identity, Role, UserId};
use crate::domain::payment::PaymentId;
use crate::domain::validation::PaymentFields;
use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of the commands file, before it is checked for completeness.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub actor: u64,
    pub role: Role,
    pub action: Action,
    pub payment: Option<u64>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub provider: Option<String>,
    pub payee_account: Option<String>,
    pub routing_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create(PaymentFields),
    List,
    Verify(PaymentId),
    Submit(PaymentId),
}

/// A caller action ready to hand to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub identity: Identity,
    pub request: Request,
}

impl TryFrom<CommandRecord> for Command {
    type Error = PaymentError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let identity = Identity {
            id: UserId(record.actor),
            role: record.role,
        };
        let target = || {
            record.payment.map(PaymentId).ok_or_else(|| {
                PaymentError::MalformedCommand(format!("{} requires a payment id", record.action))
            })
        };

        let request = match record.action {
            Action::Create => Request::Create(PaymentFields {
                amount: record.amount.clone().unwrap_or_default(),
                currency: record.currency.clone().unwrap_or_default(),
                provider: record.provider.clone().unwrap_or_default(),
                payee_account: record.payee_account.clone().unwrap_or_default(),
                routing_code: record.routing_code.clone().unwrap_or_default(),
            }),
            Action::List => Request::List,
            Action::Verify => Request::Verify(target()?),
            Action::Submit => Request::Submit(target()?),
        };

        Ok(Self { identity, request })
    }
}

pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|result| result.map_err(PaymentError::from).and_then(Command::try_from))
    }
}
