//! Retry decorator and deadlines seen from the core services.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use dh_01_entity_store::RetryPolicy;
    use dh_03_donation_lifecycle::{DonationLifecycleApi, LifecycleError, NewDonation};
    use dh_04_matching_query::MatchingQueryApi;
    use shared_types::{Category, Deadline, DonationStatus, ErrorKind, RequestStatus, Role};
    use std::time::Duration;

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
            multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn test_transient_failures_below_limit_are_absorbed() {
        let hub = Harness::builder().retry(quick(4)).build();
        let donor = hub.user("dana", Role::Donor).await;

        hub.memory.faults().fail_next(3);
        let donation = hub
            .lifecycle
            .create(
                &donor,
                NewDonation::new("Soap", Category::Essentials),
                Deadline::none(),
            )
            .await
            .unwrap();
        assert_eq!(donation.status, DonationStatus::Available);
    }

    #[tokio::test]
    async fn test_failures_past_limit_surface_as_storage_error() {
        let hub = Harness::builder().retry(quick(2)).build();
        let donor = hub.user("dana", Role::Donor).await;

        hub.memory.faults().fail_next(2);
        let err = hub
            .lifecycle
            .create(
                &donor,
                NewDonation::new("Soap", Category::Essentials),
                Deadline::none(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Storage(_)));
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(hub.memory.stats().donations, 0);
    }

    #[tokio::test]
    async fn test_accept_survives_transient_commit_failure_with_retry() {
        let hub = Harness::builder().retry(quick(3)).build();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Rice", 77.59, 12.97).await;
        let request = hub.request(&donation, &volunteer).await;

        hub.memory.faults().abort_next_commit_at(1);
        let accepted = hub
            .set(&request, RequestStatus::Accepted, &donor)
            .await
            .unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert_eq!(
            hub.donation(donation.id).await.status,
            DonationStatus::Requested
        );
    }

    #[tokio::test]
    async fn test_elapsed_deadline_is_storage_error() {
        let hub = Harness::new();
        hub.memory.faults().set_latency(Duration::from_millis(100));

        let err = hub
            .matching
            .find_nearby(77.59, 12.97, Some(5.0), Deadline::after(Duration::from_millis(10)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[tokio::test]
    async fn test_deadline_caps_retries() {
        let policy = RetryPolicy {
            max_attempts: 50,
            initial_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(20),
            multiplier: 1.0,
        };
        let hub = Harness::builder().retry(policy).build();
        let donor = hub.user("dana", Role::Donor).await;

        hub.memory.faults().fail_next(50);
        let started = std::time::Instant::now();
        let err = hub
            .lifecycle
            .list_for_donor(donor.id, Deadline::after(Duration::from_millis(60)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
