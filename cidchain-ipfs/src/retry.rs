use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::IpfsError;

pub const DEFAULT_MAX_RETRIES: usize = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// The node API calls this crate makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    CheckDaemon,
    DagGet,
    Cat,
    Add,
}

impl Operation {
    /// Path suffix under `/api/v0`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Operation::CheckDaemon => "version",
            Operation::DagGet => "dag/get",
            Operation::Cat => "cat",
            Operation::Add => "add",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CheckDaemon => "check daemon",
            Operation::DagGet => "get DAG",
            Operation::Cat => "cat",
            Operation::Add => "add",
        };
        f.write_str(name)
    }
}

/// Outcome of a single failed attempt.
#[derive(Debug)]
pub enum AttemptError {
    /// The node could not be reached; worth retrying.
    Connect(String),
    /// Anything else; returned to the caller as is.
    Fatal(IpfsError),
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            AttemptError::Connect(err.to_string())
        } else {
            AttemptError::Fatal(IpfsError::Transport(err.to_string()))
        }
    }
}

/// Fixed-delay retry for connection failures.
///
/// Only [`AttemptError::Connect`] is retried. Non-success statuses and every other
/// failure end the loop on the first occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Runs `attempt` up to `max_retries` times, sleeping `retry_delay` between
    /// connection failures.
    pub async fn run<T, F, Fut>(
        &self,
        operation: Operation,
        target: &str,
        mut attempt: F,
    ) -> Result<T, IpfsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        for n in 1..=self.max_retries {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Connect(reason)) => {
                    tracing::warn!(
                        %operation,
                        target,
                        attempt = n,
                        max_retries = self.max_retries,
                        error = %reason,
                        "ipfs node unreachable"
                    );
                    if n < self.max_retries {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(IpfsError::Unreachable {
            operation,
            target: target.to_string(),
            attempts: self.max_retries,
        })
    }
}
