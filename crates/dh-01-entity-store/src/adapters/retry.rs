//! Retry-with-backoff decorator for transient storage failures.
//!
//! Wraps any [`EntityStore`]. Only [`StoreError::Unavailable`] is retried;
//! every other error is returned to the caller unchanged. Retries never run
//! past the caller's deadline.

use crate::config::RetryPolicy;
use crate::deadline::with_deadline;
use crate::domain::batch::WriteBatch;
use crate::domain::errors::StoreError;
use crate::domain::query::{DonationQuery, NearbyDonation, RequestQuery};
use crate::ports::inbound::EntityStore;
use async_trait::async_trait;
use shared_types::{
    Deadline, Donation, DonationId, DonationStatus, GeoPoint, RequestId, User, UserId,
    VolunteerRequest,
};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Called once per scheduled retry with the operation name and the attempt
/// about to run.
pub type RetryObserver = Arc<dyn Fn(&'static str, u32) + Send + Sync>;

/// Decorator adding exponential backoff to an inner store.
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
    observer: Option<RetryObserver>,
}

impl<S: EntityStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            observer: None,
        }
    }

    /// Report every retry, e.g. to a metrics counter.
    pub fn with_observer(mut self, observer: RetryObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn run<T, F, Fut>(
        &self,
        operation: &'static str,
        deadline: Deadline,
        mut call: F,
    ) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, StoreError>> + Send,
        T: Send,
    {
        let mut attempt = 1;
        let mut backoff = self.policy.initial_backoff;
        loop {
            match with_deadline(deadline, call()).await {
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    if matches!(deadline.remaining(), Some(left) if left <= backoff) {
                        return Err(err);
                    }
                    warn!(
                        operation,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "transient storage failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    if let Some(observer) = &self.observer {
                        observer(operation, attempt);
                    }
                    backoff = self.policy.next_backoff(backoff);
                }
                outcome => return outcome,
            }
        }
    }
}

#[async_trait]
impl<S: EntityStore> EntityStore for RetryingStore<S> {
    async fn insert_user(&self, user: User, deadline: Deadline) -> Result<(), StoreError> {
        self.run("insert_user", deadline, || {
            self.inner.insert_user(user.clone(), deadline)
        })
        .await
    }

    async fn get_user(&self, id: UserId, deadline: Deadline) -> Result<Option<User>, StoreError> {
        self.run("get_user", deadline, || self.inner.get_user(id, deadline))
            .await
    }

    async fn find_user_by_email(
        &self,
        email: &str,
        deadline: Deadline,
    ) -> Result<Option<User>, StoreError> {
        self.run("find_user_by_email", deadline, || {
            self.inner.find_user_by_email(email, deadline)
        })
        .await
    }

    async fn insert_donation(
        &self,
        donation: Donation,
        deadline: Deadline,
    ) -> Result<(), StoreError> {
        self.run("insert_donation", deadline, || {
            self.inner.insert_donation(donation.clone(), deadline)
        })
        .await
    }

    async fn get_donation(
        &self,
        id: DonationId,
        deadline: Deadline,
    ) -> Result<Option<Donation>, StoreError> {
        self.run("get_donation", deadline, || {
            self.inner.get_donation(id, deadline)
        })
        .await
    }

    async fn query_donations(
        &self,
        query: &DonationQuery,
        deadline: Deadline,
    ) -> Result<Vec<Donation>, StoreError> {
        self.run("query_donations", deadline, || {
            self.inner.query_donations(query, deadline)
        })
        .await
    }

    async fn donations_within(
        &self,
        center: GeoPoint,
        radius_meters: f64,
        status: Option<DonationStatus>,
        deadline: Deadline,
    ) -> Result<Vec<NearbyDonation>, StoreError> {
        self.run("donations_within", deadline, || {
            self.inner
                .donations_within(center, radius_meters, status, deadline)
        })
        .await
    }

    async fn insert_request(
        &self,
        request: VolunteerRequest,
        deadline: Deadline,
    ) -> Result<(), StoreError> {
        self.run("insert_request", deadline, || {
            self.inner.insert_request(request.clone(), deadline)
        })
        .await
    }

    async fn get_request(
        &self,
        id: RequestId,
        deadline: Deadline,
    ) -> Result<Option<VolunteerRequest>, StoreError> {
        self.run("get_request", deadline, || {
            self.inner.get_request(id, deadline)
        })
        .await
    }

    async fn query_requests(
        &self,
        query: &RequestQuery,
        deadline: Deadline,
    ) -> Result<Vec<VolunteerRequest>, StoreError> {
        self.run("query_requests", deadline, || {
            self.inner.query_requests(query, deadline)
        })
        .await
    }

    async fn commit(&self, batch: WriteBatch, deadline: Deadline) -> Result<(), StoreError> {
        self.run("commit", deadline, || self.inner.commit(batch.clone(), deadline))
            .await
    }
}
