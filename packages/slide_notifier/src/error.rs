/// Errors raised while setting the notifier up.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("invalid notification target {url:?}: {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("poll interval must be greater than zero")]
    InvalidPollInterval,

    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<figment::Error> for NotifierError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// A slide-change notification that could not be delivered.
///
/// Only ever observed inside the dispatch task, where it becomes a log line.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryFailure {
    #[error("listener is unreachable")]
    Unreachable(#[source] reqwest::Error),

    #[error("request timed out")]
    TimedOut(#[source] reqwest::Error),

    #[error(transparent)]
    Request(reqwest::Error),
}

impl DeliveryFailure {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Unreachable(err)
        } else if err.is_timeout() {
            Self::TimedOut(err)
        } else {
            Self::Request(err)
        }
    }
}
