//! Deadline enforcement for storage futures.

use crate::domain::errors::StoreError;
use shared_types::Deadline;
use std::future::Future;
use tokio::time::timeout;

/// Run `fut` within the time left on `deadline`.
///
/// An already expired deadline fails without polling `fut`.
pub async fn with_deadline<T, F>(deadline: Deadline, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match deadline.remaining() {
        None => fut.await,
        Some(left) if left.is_zero() => Err(StoreError::DeadlineExceeded),
        Some(left) => timeout(left, fut)
            .await
            .map_err(|_| StoreError::DeadlineExceeded)?,
    }
}
