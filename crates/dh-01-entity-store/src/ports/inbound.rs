//! Driving port for the Entity Store.

use crate::domain::batch::WriteBatch;
use crate::domain::errors::StoreError;
use crate::domain::query::{DonationQuery, NearbyDonation, RequestQuery};
use async_trait::async_trait;
use shared_types::{
    Deadline, Donation, DonationId, DonationStatus, GeoPoint, RequestId, User, UserId,
    VolunteerRequest,
};
use std::sync::Arc;

/// Storage collaborator consumed by every core service.
///
/// Every call carries the caller's [`Deadline`]; implementations must give
/// up with [`StoreError::DeadlineExceeded`] once it elapses.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Fails with `UniqueViolation{users.email}` if the email is taken.
    async fn insert_user(&self, user: User, deadline: Deadline) -> Result<(), StoreError>;

    async fn get_user(&self, id: UserId, deadline: Deadline) -> Result<Option<User>, StoreError>;

    /// Case-insensitive lookup.
    async fn find_user_by_email(
        &self,
        email: &str,
        deadline: Deadline,
    ) -> Result<Option<User>, StoreError>;

    // -------------------------------------------------------------------------
    // Donations
    // -------------------------------------------------------------------------

    async fn insert_donation(&self, donation: Donation, deadline: Deadline)
        -> Result<(), StoreError>;

    async fn get_donation(
        &self,
        id: DonationId,
        deadline: Deadline,
    ) -> Result<Option<Donation>, StoreError>;

    /// Matching donations ordered by `created_at` descending.
    async fn query_donations(
        &self,
        query: &DonationQuery,
        deadline: Deadline,
    ) -> Result<Vec<Donation>, StoreError>;

    /// Donations whose location lies within `radius_meters` of `center`,
    /// nearest first, optionally restricted to one status.
    async fn donations_within(
        &self,
        center: GeoPoint,
        radius_meters: f64,
        status: Option<DonationStatus>,
        deadline: Deadline,
    ) -> Result<Vec<NearbyDonation>, StoreError>;

    // -------------------------------------------------------------------------
    // Volunteer requests
    // -------------------------------------------------------------------------

    /// Serializable check-then-insert: fails with
    /// `UniqueViolation{requests.active_pair}` if an active request already
    /// exists for the same (donation, volunteer) pair.
    async fn insert_request(
        &self,
        request: VolunteerRequest,
        deadline: Deadline,
    ) -> Result<(), StoreError>;

    async fn get_request(
        &self,
        id: RequestId,
        deadline: Deadline,
    ) -> Result<Option<VolunteerRequest>, StoreError>;

    /// Matching requests ordered by `created_at` descending.
    async fn query_requests(
        &self,
        query: &RequestQuery,
        deadline: Deadline,
    ) -> Result<Vec<VolunteerRequest>, StoreError>;

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Apply every op or none of them.
    async fn commit(&self, batch: WriteBatch, deadline: Deadline) -> Result<(), StoreError>;
}

/// Shared handles are stores too, so decorators can wrap `Arc<dyn EntityStore>`.
#[async_trait]
impl<S: EntityStore + ?Sized> EntityStore for Arc<S> {
    async fn insert_user(&self, user: User, deadline: Deadline) -> Result<(), StoreError> {
        (**self).insert_user(user, deadline).await
    }

    async fn get_user(&self, id: UserId, deadline: Deadline) -> Result<Option<User>, StoreError> {
        (**self).get_user(id, deadline).await
    }

    async fn find_user_by_email(
        &self,
        email: &str,
        deadline: Deadline,
    ) -> Result<Option<User>, StoreError> {
        (**self).find_user_by_email(email, deadline).await
    }

    async fn insert_donation(
        &self,
        donation: Donation,
        deadline: Deadline,
    ) -> Result<(), StoreError> {
        (**self).insert_donation(donation, deadline).await
    }

    async fn get_donation(
        &self,
        id: DonationId,
        deadline: Deadline,
    ) -> Result<Option<Donation>, StoreError> {
        (**self).get_donation(id, deadline).await
    }

    async fn query_donations(
        &self,
        query: &DonationQuery,
        deadline: Deadline,
    ) -> Result<Vec<Donation>, StoreError> {
        (**self).query_donations(query, deadline).await
    }

    async fn donations_within(
        &self,
        center: GeoPoint,
        radius_meters: f64,
        status: Option<DonationStatus>,
        deadline: Deadline,
    ) -> Result<Vec<NearbyDonation>, StoreError> {
        (**self)
            .donations_within(center, radius_meters, status, deadline)
            .await
    }

    async fn insert_request(
        &self,
        request: VolunteerRequest,
        deadline: Deadline,
    ) -> Result<(), StoreError> {
        (**self).insert_request(request, deadline).await
    }

    async fn get_request(
        &self,
        id: RequestId,
        deadline: Deadline,
    ) -> Result<Option<VolunteerRequest>, StoreError> {
        (**self).get_request(id, deadline).await
    }

    async fn query_requests(
        &self,
        query: &RequestQuery,
        deadline: Deadline,
    ) -> Result<Vec<VolunteerRequest>, StoreError> {
        (**self).query_requests(query, deadline).await
    }

    async fn commit(&self, batch: WriteBatch, deadline: Deadline) -> Result<(), StoreError> {
        (**self).commit(batch, deadline).await
    }
}
