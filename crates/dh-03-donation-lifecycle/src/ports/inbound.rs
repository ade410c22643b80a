//! Driving port for the Donation Lifecycle Manager.

use crate::domain::errors::LifecycleResult;
use crate::domain::filter::DonationFilter;
use crate::domain::new_donation::NewDonation;
use async_trait::async_trait;
use shared_types::{Deadline, Donation, DonationId, DonationStatus, User, UserId};

#[async_trait]
pub trait DonationLifecycleApi: Send + Sync {
    /// Validate `fields` and store a new `available` donation owned by `donor`.
    async fn create(
        &self,
        donor: &User,
        fields: NewDonation,
        deadline: Deadline,
    ) -> LifecycleResult<Donation>;

    /// Move a donation along one edge of the status table.
    ///
    /// Checks run NotFound, then Unauthorized, then InvalidTransition.
    /// `requested` is refused: only an accepted volunteer request sets it.
    async fn transition(
        &self,
        id: DonationId,
        to: DonationStatus,
        actor: &User,
        deadline: Deadline,
    ) -> LifecycleResult<Donation>;

    async fn get(&self, id: DonationId, deadline: Deadline) -> LifecycleResult<Donation>;

    /// Newest first. Lists `available` donations unless the filter says otherwise.
    async fn list(&self, filter: DonationFilter, deadline: Deadline)
        -> LifecycleResult<Vec<Donation>>;

    /// A donor's own donations in every status, newest first.
    async fn list_for_donor(
        &self,
        donor: UserId,
        deadline: Deadline,
    ) -> LifecycleResult<Vec<Donation>>;
}
