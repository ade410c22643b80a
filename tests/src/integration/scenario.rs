//! # Winter Coats
//!
//! The reference walk-through across all three core services:
//!
//! 1. Donor lists "Winter Coats" (clothes, 5, at 77.59,12.97): `available`
//! 2. Volunteer at 77.60,12.98 searches 5 km and finds it
//! 3. Volunteer requests it: `pending`
//! 4. Donor accepts: request `accepted`, donation `requested`
//! 5. A second request by the same volunteer is a duplicate

#[cfg(test)]
mod tests {
    use crate::fixtures::{point, Harness};
    use dh_03_donation_lifecycle::{DonationLifecycleApi, NewDonation};
    use dh_04_matching_query::MatchingQueryApi;
    use dh_05_volunteer_workflow::{RequestDetails, VolunteerWorkflowApi, WorkflowError};
    use shared_types::{Category, Deadline, DonationStatus, ErrorKind, RequestStatus, Role};

    #[tokio::test]
    async fn test_winter_coats_walkthrough() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;

        // 1. list
        let coats = hub
            .donate(
                &donor,
                NewDonation::new("Winter Coats", Category::Clothes)
                    .with_quantity(5)
                    .with_location(point(77.59, 12.97)),
            )
            .await;
        assert_eq!(coats.status, DonationStatus::Available);
        assert_eq!(coats.quantity, 5);
        assert_eq!(coats.donor, donor.id);

        // 2. search
        let nearby = hub
            .matching
            .find_nearby(77.60, 12.98, Some(5.0), Deadline::none())
            .await
            .unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].donation.id, coats.id);
        assert!(nearby[0].distance_meters < 2_000.0);

        // 3. request
        let request = hub.request(&coats, &volunteer).await;
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.donor, donor.id);

        // 4. accept
        let accepted = hub
            .set(&request, RequestStatus::Accepted, &donor)
            .await
            .unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert_eq!(
            hub.donation(coats.id).await.status,
            DonationStatus::Requested
        );

        // 5. duplicate
        let again = hub
            .workflow
            .create(coats.id, &volunteer, RequestDetails::default(), Deadline::none())
            .await
            .unwrap_err();
        assert!(matches!(again, WorkflowError::DuplicateRequest { .. }));
        assert_eq!(again.kind(), ErrorKind::DuplicateRequest);
    }

    #[tokio::test]
    async fn test_walkthrough_to_completion_keeps_listings_consistent() {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let coats = hub.donation_at(&donor, "Winter Coats", 77.59, 12.97).await;
        let request = hub.request(&coats, &volunteer).await;

        hub.set(&request, RequestStatus::Accepted, &donor).await.unwrap();
        hub.set(&request, RequestStatus::Collected, &volunteer)
            .await
            .unwrap();
        hub.set(&request, RequestStatus::Distributed, &volunteer)
            .await
            .unwrap();
        hub.set(&request, RequestStatus::Completed, &donor)
            .await
            .unwrap();

        // Requested donations drop out of the public listing and search.
        let listed = hub
            .lifecycle
            .list(Default::default(), Deadline::none())
            .await
            .unwrap();
        assert!(listed.is_empty());
        let nearby = hub
            .matching
            .find_nearby(77.59, 12.97, Some(1.0), Deadline::none())
            .await
            .unwrap();
        assert!(nearby.is_empty());

        // Both parties still see the request.
        let mine = hub
            .workflow
            .list_for_volunteer(volunteer.id, Deadline::none())
            .await
            .unwrap();
        let incoming = hub
            .workflow
            .list_for_donor(donor.id, Deadline::none())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(incoming.len(), 1);
        assert_eq!(mine[0].status, RequestStatus::Completed);
    }
}
