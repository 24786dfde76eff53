use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no depot location present in the problem input")]
    MissingDepot,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuardError {
    /// The worker ignored cooperative cancellation past the grace period.
    /// Whatever it computed is unrecoverable.
    #[error("worker did not stop within the grace period after cancellation")]
    WorkerUnresponsive,
    #[error("worker terminated without producing a result")]
    WorkerFailed,
}
