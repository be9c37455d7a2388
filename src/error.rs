use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalendarError>;

#[derive(Debug, Error)]
pub enum CalendarError {
    /// The calendar backend could not be run or exited unsuccessfully.
    #[error("calendar source unavailable: {0}")]
    SourceUnavailable(String),

    /// The backend output did not have the expected shape.
    #[error("failed to parse calendar output: {0}")]
    ParseFailure(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Lifecycle misuse of the scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler already running")]
    AlreadyRunning,

    #[error("scheduler was stopped and cannot be restarted")]
    AlreadyStopped,
}
