use thiserror::Error;

/// Failures of the isolation channel itself, as opposed to script errors.
#[derive(Debug, Error)]
pub enum IsolationError {
    #[error("failed to start script worker: {0}")]
    Setup(#[source] std::io::Error),

    #[error("script worker channel closed")]
    ChannelClosed,
}
