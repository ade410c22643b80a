//! Completion awards.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use dh_05_volunteer_workflow::WorkflowError;
    use shared_types::{ErrorKind, RequestStatus, Role, User, VolunteerRequest};

    async fn walk_to_distributed(
        hub: &Harness,
        donor: &User,
        volunteer: &User,
        title: &str,
    ) -> VolunteerRequest {
        let donation = hub.donation_at(donor, title, 77.59, 12.97).await;
        let request = hub.request(&donation, volunteer).await;
        hub.set(&request, RequestStatus::Accepted, donor).await.unwrap();
        hub.set(&request, RequestStatus::Collected, volunteer)
            .await
            .unwrap();
        hub.set(&request, RequestStatus::Distributed, volunteer)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_completion_awards_configured_points_once() {
        let hub = Harness::builder().points_per_completion(15).build();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let request = walk_to_distributed(&hub, &donor, &volunteer, "Rice").await;
        assert_eq!(hub.reload_user(volunteer.id).await.points, 0);

        hub.set(&request, RequestStatus::Completed, &volunteer)
            .await
            .unwrap();
        assert_eq!(hub.reload_user(volunteer.id).await.points, 15);

        let again = hub
            .set(&request, RequestStatus::Completed, &donor)
            .await
            .unwrap_err();
        assert!(matches!(again, WorkflowError::InvalidTransition { .. }));
        assert_eq!(hub.reload_user(volunteer.id).await.points, 15);
        // The donor earns nothing.
        assert_eq!(hub.reload_user(donor.id).await.points, 0);
    }

    #[tokio::test]
    async fn test_points_accumulate_across_requests() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;

        for title in ["Rice", "Lentils", "Oil"] {
            let request = walk_to_distributed(&hub, &donor, &volunteer, title).await;
            hub.set(&request, RequestStatus::Completed, &donor)
                .await
                .unwrap();
        }
        assert_eq!(hub.reload_user(volunteer.id).await.points, 30);
    }

    #[tokio::test]
    async fn test_cancelled_and_rejected_award_nothing() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;

        let rejected = hub
            .request(&hub.donation_at(&donor, "Rice", 77.59, 12.97).await, &volunteer)
            .await;
        hub.set(&rejected, RequestStatus::Rejected, &donor)
            .await
            .unwrap();

        let cancelled = walk_to_distributed(&hub, &donor, &volunteer, "Oil").await;
        hub.set(&cancelled, RequestStatus::Cancelled, &volunteer)
            .await
            .unwrap();

        assert_eq!(hub.reload_user(volunteer.id).await.points, 0);
    }

    #[tokio::test]
    async fn test_completion_fails_whole_if_commit_aborts() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let request = walk_to_distributed(&hub, &donor, &volunteer, "Rice").await;

        hub.memory.faults().abort_next_commit_at(1);
        let err = hub
            .set(&request, RequestStatus::Completed, &donor)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(hub.reload_user(volunteer.id).await.points, 0);

        hub.set(&request, RequestStatus::Completed, &donor)
            .await
            .unwrap();
        assert_eq!(hub.reload_user(volunteer.id).await.points, 10);
    }
}
