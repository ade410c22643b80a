//! Racing writers. The store's unique index and version checks must decide
//! every race the same way a serial run would.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use dh_05_volunteer_workflow::{RequestDetails, VolunteerWorkflowApi, WorkflowError};
    use shared_types::{Deadline, DonationStatus, RequestStatus, Role};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicates_exactly_one_wins() {
        let hub = Arc::new(Harness::new());
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Blankets", 77.59, 12.97).await;

        // Slow the store so every pre-check runs before any insert lands.
        hub.memory.faults().set_latency(Duration::from_millis(5));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let hub = Arc::clone(&hub);
            let volunteer = volunteer.clone();
            let id = donation.id;
            handles.push(tokio::spawn(async move {
                hub.workflow
                    .create(id, &volunteer, RequestDetails::default(), Deadline::none())
                    .await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(WorkflowError::DuplicateRequest { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(hub.memory.stats().active_requests, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_volunteers_do_not_collide() {
        let hub = Arc::new(Harness::new());
        let donor = hub.user("dana", Role::Donor).await;
        let donation = hub.donation_at(&donor, "Blankets", 77.59, 12.97).await;

        let mut volunteers = Vec::new();
        for i in 0..5 {
            volunteers.push(hub.user(&format!("vol{i}"), Role::Volunteer).await);
        }

        let mut handles = Vec::new();
        for volunteer in volunteers {
            let hub = Arc::clone(&hub);
            let id = donation.id;
            handles.push(tokio::spawn(async move {
                hub.workflow
                    .create(id, &volunteer, RequestDetails::default(), Deadline::none())
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(hub.memory.stats().active_requests, 5);
    }

    #[tokio::test]
    async fn test_competing_accepts_only_one_lands() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let first = hub.user("vol1", Role::Volunteer).await;
        let second = hub.user("vol2", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Blankets", 77.59, 12.97).await;
        let a = hub.request(&donation, &first).await;
        let b = hub.request(&donation, &second).await;

        hub.memory.faults().set_latency(Duration::from_millis(2));
        let (ra, rb) = tokio::join!(
            hub.set(&a, RequestStatus::Accepted, &donor),
            hub.set(&b, RequestStatus::Accepted, &donor),
        );
        hub.memory.faults().clear();

        let outcomes = [ra, rb];
        let accepted = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(accepted, 1);
        let loser = outcomes.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert!(matches!(
            loser,
            WorkflowError::DonationTransition {
                from: DonationStatus::Requested,
                to: DonationStatus::Requested,
            }
        ));
        assert_eq!(
            hub.donation(donation.id).await.status,
            DonationStatus::Requested
        );
    }

    #[tokio::test]
    async fn test_cancel_then_request_again_is_allowed() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Blankets", 77.59, 12.97).await;

        let first = hub.request(&donation, &volunteer).await;
        hub.set(&first, RequestStatus::Cancelled, &volunteer)
            .await
            .unwrap();
        let second = hub.request(&donation, &volunteer).await;
        assert_ne!(first.id, second.id);
        assert_eq!(second.status, RequestStatus::Pending);
    }
}
