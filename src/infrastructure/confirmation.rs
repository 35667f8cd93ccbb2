use std::io::Write;

use error_stack::{Report, ResultExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{oneshot, Mutex};
use tracing::instrument;

use crate::ports::login_confirmation::{ConfirmationError, LoginConfirmation};

pub const DEFAULT_PROMPT: &str = "Press Enter once you are logged in: ";

/// Asks the operator on the terminal and waits for a line on stdin.
#[derive(Debug, Clone)]
pub struct StdinConfirmation {
    prompt: String,
}

impl Default for StdinConfirmation {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LoginConfirmation for StdinConfirmation {
    #[instrument(skip(self))]
    async fn wait_for_login(&self) -> error_stack::Result<(), ConfirmationError> {
        tracing_indicatif::suspend_tracing_indicatif(|| {
            let mut stdout = std::io::stdout();
            print!("{}", self.prompt);
            stdout.flush()
        })
        .change_context(ConfirmationError::Read)?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .change_context(ConfirmationError::Read)?;

        if read == 0 {
            return Err(Report::new(ConfirmationError::ChannelClosed)
                .attach_printable("stdin reached end of file"));
        }

        tracing::info!("Operator confirmed login");
        Ok(())
    }
}

/// Resolves once the paired sender fires. Usable for a single wait.
#[derive(Debug)]
pub struct OneshotConfirmation {
    receiver: Mutex<Option<oneshot::Receiver<()>>>,
}

impl OneshotConfirmation {
    pub fn new(receiver: oneshot::Receiver<()>) -> Self {
        Self {
            receiver: Mutex::new(Some(receiver)),
        }
    }

    pub fn channel() -> (oneshot::Sender<()>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self::new(receiver))
    }
}

#[async_trait::async_trait]
impl LoginConfirmation for OneshotConfirmation {
    async fn wait_for_login(&self) -> error_stack::Result<(), ConfirmationError> {
        let receiver = self.receiver.lock().await.take().ok_or_else(|| {
            Report::new(ConfirmationError::ChannelClosed)
                .attach_printable("confirmation was already consumed")
        })?;

        receiver.await.change_context(ConfirmationError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_oneshot_resolves_after_signal() {
        let (sender, confirmation) = OneshotConfirmation::channel();

        let waiter = tokio::spawn(async move { confirmation.wait_for_login().await });
        sender.send(()).unwrap();

        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_oneshot_dropped_sender_is_closed() {
        let (sender, confirmation) = OneshotConfirmation::channel();
        drop(sender);

        let report = confirmation.wait_for_login().await.unwrap_err();
        assert_eq!(*report.current_context(), ConfirmationError::ChannelClosed);
    }

    #[tokio::test]
    async fn test_oneshot_second_wait_fails() {
        let (sender, confirmation) = OneshotConfirmation::channel();
        sender.send(()).unwrap();

        assert!(confirmation.wait_for_login().await.is_ok());
        assert!(confirmation.wait_for_login().await.is_err());
    }
}
