//! Bounded retry for serialization failures and deadlocks.
//!
//! Concurrent ledger writes on the same product or register can lose the
//! race at the storage layer (SQLSTATE 40001 serialization_failure, 40P01
//! deadlock_detected). These conflicts are retried transparently a bounded
//! number of times; once exhausted they surface as a transient failure so the
//! caller knows the same request is safe to resend.

use std::future::Future;

use sea_orm::{DbErr, RuntimeErr};

/// Default number of attempts for a conflicting transaction.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// PostgreSQL `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// PostgreSQL `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";

/// Errors that can classify themselves as transient storage conflicts.
pub trait TransientError {
    /// Returns true if retrying the same operation may succeed.
    fn is_transient(&self) -> bool;
}

/// Returns true if the database error is a serialization failure or deadlock.
#[must_use]
pub fn is_transient_db_err(err: &DbErr) -> bool {
    let sqlx_err = match err {
        DbErr::Query(RuntimeErr::SqlxError(e))
        | DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Conn(RuntimeErr::SqlxError(e)) => e,
        _ => return false,
    };
    match sqlx_err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED),
        _ => false,
    }
}

impl TransientError for DbErr {
    fn is_transient(&self) -> bool {
        is_transient_db_err(self)
    }
}

/// Runs `op` up to `attempts` times, retrying transient conflicts.
///
/// Each attempt must be a fresh transaction: `op` is re-invoked from scratch,
/// never resumed. Non-transient errors are returned immediately.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted.
pub async fn with_retry<T, E, F, Fut>(attempts: u32, mut op: F) -> Result<T, E>
where
    E: TransientError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Err(err) if err.is_transient() && attempt < attempts => {
                tracing::warn!(attempt, max = attempts, "storage conflict, retrying");
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct FakeError {
        transient: bool,
    }

    impl TransientError for FakeError {
        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = Cell::new(0u32);
        let result: Result<u32, FakeError> = with_retry(3, || {
            calls.set(calls.get() + 1);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let calls = Cell::new(0u32);
        let result: Result<u32, FakeError> = with_retry(3, || {
            calls.set(calls.get() + 1);
            let succeed = calls.get() == 3;
            async move {
                if succeed {
                    Ok(42)
                } else {
                    Err(FakeError { transient: true })
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_attempts_are_bounded() {
        let calls = Cell::new(0u32);
        let result: Result<u32, FakeError> = with_retry(3, || {
            calls.set(calls.get() + 1);
            async { Err(FakeError { transient: true }) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_business_errors_are_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<u32, FakeError> = with_retry(3, || {
            calls.set(calls.get() + 1);
            async { Err(FakeError { transient: false }) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
