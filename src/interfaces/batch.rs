use crate::application::service::PaymentService;
use crate::error::Result;
use crate::interfaces::csv::command_reader::{Command, Request};
use tracing::{info, warn};

/// Counts of what happened to each row of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub applied: usize,
    pub rejected: usize,
    pub unreadable: usize,
}

/// Feeds a stream of commands through the service in file order.
///
/// Unreadable rows and domain rejections are logged and skipped. A store
/// failure stops the batch, since later rows may depend on the lost write.
pub async fn run_commands<I>(service: &PaymentService, commands: I) -> Result<BatchSummary>
where
    I: IntoIterator<Item = Result<Command>>,
{
    let mut summary = BatchSummary::default();

    for (index, command) in commands.into_iter().enumerate() {
        let row = index + 1;
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                warn!(row, error = %e, "Error reading command");
                summary.unreadable += 1;
                continue;
            }
        };

        match dispatch(service, &command).await {
            Ok(()) => summary.applied += 1,
            Err(e) if e.is_retryable() => return Err(e),
            Err(e) => {
                warn!(row, actor = %command.identity.id, error = %e, "Command rejected");
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}

async fn dispatch(service: &PaymentService, command: &Command) -> Result<()> {
    let identity = &command.identity;
    match &command.request {
        Request::Create(fields) => {
            service.create_payment(identity, fields).await?;
        }
        Request::List => {
            for entry in service.list_pending(identity).await? {
                let owner = entry
                    .owner
                    .as_ref()
                    .map(|o| format!("{} ({}, account {})", o.full_name, o.username, o.account_number))
                    .unwrap_or_else(|| "unknown owner".to_string());
                info!(
                    payment = %entry.payment.id,
                    amount = %entry.payment.amount,
                    currency = %entry.payment.currency,
                    %owner,
                    "pending payment"
                );
            }
        }
        Request::Verify(id) => {
            service.verify_payment(identity, *id).await?;
        }
        Request::Submit(id) => {
            service.submit_payment(identity, *id).await?;
        }
    }
    Ok(())
}
