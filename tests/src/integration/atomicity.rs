//! Accepting a request writes the request and its donation together. These
//! tests break the store half way through and check nothing mixed survives.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use dh_03_donation_lifecycle::DonationLifecycleApi;
    use dh_05_volunteer_workflow::{VolunteerWorkflowApi, WorkflowError};
    use shared_types::{Deadline, DonationStatus, ErrorKind, RequestStatus, Role};

    #[tokio::test]
    async fn test_commit_abort_leaves_both_unchanged() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Rice", 77.59, 12.97).await;
        let request = hub.request(&donation, &volunteer).await;

        // Die after the request op is staged, before the donation op.
        hub.memory.faults().abort_next_commit_at(1);
        let err = hub
            .set(&request, RequestStatus::Accepted, &donor)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        let stored_request = hub
            .workflow
            .get(request.id, &donor, Deadline::none())
            .await
            .unwrap();
        assert_eq!(stored_request.status, RequestStatus::Pending);
        assert_eq!(stored_request.version, request.version);
        let stored_donation = hub.donation(donation.id).await;
        assert_eq!(stored_donation.status, DonationStatus::Available);
        assert_eq!(stored_donation.version, donation.version);

        // The fault is consumed; a retry by the caller goes through whole.
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
    async fn test_transient_failure_without_retry_is_storage_error() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Rice", 77.59, 12.97).await;
        let request = hub.request(&donation, &volunteer).await;

        hub.memory.faults().fail_next(1);
        let err = hub
            .set(&request, RequestStatus::Accepted, &donor)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Storage(_)));
        assert_eq!(
            hub.donation(donation.id).await.status,
            DonationStatus::Available
        );
    }

    #[tokio::test]
    async fn test_accept_refused_when_donation_was_cancelled() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Rice", 77.59, 12.97).await;
        let request = hub.request(&donation, &volunteer).await;

        hub.lifecycle
            .transition(donation.id, DonationStatus::Cancelled, &donor, Deadline::none())
            .await
            .unwrap();

        let err = hub
            .set(&request, RequestStatus::Accepted, &donor)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::DonationTransition {
                from: DonationStatus::Cancelled,
                to: DonationStatus::Requested,
            }
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);

        let stored = hub
            .workflow
            .get(request.id, &volunteer, Deadline::none())
            .await
            .unwrap();
        assert_eq!(stored.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_rejected_request_does_not_touch_donation() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let donation = hub.donation_at(&donor, "Rice", 77.59, 12.97).await;
        let request = hub.request(&donation, &volunteer).await;

        hub.set(&request, RequestStatus::Rejected, &donor)
            .await
            .unwrap();
        let stored = hub.donation(donation.id).await;
        assert_eq!(stored.status, DonationStatus::Available);
        assert_eq!(stored.version, donation.version);
    }
}
