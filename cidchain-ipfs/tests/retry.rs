use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use cidchain_ipfs::{AttemptError, IpfsError, Operation, RetryPolicy};

#[tokio::test(start_paused = true)]
async fn connection_failures_stop_after_exactly_max_retries() {
    let policy = RetryPolicy::new(4, Duration::from_secs(1));
    let attempts = Mutex::new(Vec::new());

    let result: Result<(), IpfsError> = policy
        .run(Operation::Cat, "QmMissing", || {
            attempts.lock().unwrap().push(Instant::now());
            async { Err(AttemptError::Connect("connection refused".to_string())) }
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        IpfsError::Unreachable {
            operation: Operation::Cat,
            ref target,
            attempts: 4,
        } if target == "QmMissing"
    ));
    assert!(err.to_string().contains("failed to cat for QmMissing after 4 attempts"));

    let attempts = attempts.lock().unwrap();
    assert_eq!(attempts.len(), 4);
    for pair in attempts.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_secs(1));
    }
}

#[tokio::test(start_paused = true)]
async fn total_wait_is_delay_between_attempts_only() {
    let policy = RetryPolicy::new(3, Duration::from_millis(250));
    let started = Instant::now();

    let result: Result<(), IpfsError> = policy
        .run(Operation::DagGet, "QmDir", || async {
            Err(AttemptError::Connect("refused".to_string()))
        })
        .await;

    assert!(result.is_err());
    assert_eq!(started.elapsed(), Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn recovers_after_transient_connection_failures() {
    let policy = RetryPolicy::default();
    let calls = AtomicUsize::new(0);

    let value = policy
        .run(Operation::CheckDaemon, "http://127.0.0.1:5001", || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(AttemptError::Connect("refused".to_string()))
                } else {
                    Ok(call)
                }
            }
        })
        .await
        .unwrap();

    assert_eq!(value, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn fatal_errors_are_not_retried() {
    let policy = RetryPolicy::new(5, Duration::from_secs(1));
    let calls = AtomicUsize::new(0);
    let started = Instant::now();

    let result: Result<(), IpfsError> = policy
        .run(Operation::Cat, "QmBad", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(AttemptError::Fatal(IpfsError::Api {
                    operation: Operation::Cat,
                    target: "QmBad".to_string(),
                    status: 500,
                    message: "merkledag: not found".to_string(),
                }))
            }
        })
        .await;

    assert!(matches!(result, Err(IpfsError::Api { status: 500, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn zero_retries_never_calls() {
    let policy = RetryPolicy::new(0, Duration::from_secs(1));
    let calls = AtomicUsize::new(0);

    let result: Result<(), IpfsError> = policy
        .run(Operation::Add, "upload", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

    assert!(matches!(result, Err(IpfsError::Unreachable { attempts: 0, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
