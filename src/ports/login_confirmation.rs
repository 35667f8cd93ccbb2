use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("Login confirmation channel closed before the operator confirmed")]
    ChannelClosed,
    #[error("Failed to read the operator confirmation")]
    Read,
}

/// The point where the run hands over to a human until they report the login
/// as done. Waiting has no timeout.
#[async_trait::async_trait]
pub trait LoginConfirmation: Send + Sync {
    async fn wait_for_login(&self) -> error_stack::Result<(), ConfirmationError>;
}
