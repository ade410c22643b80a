//! Driving port for the Volunteer Request Workflow.

use crate::domain::details::{RequestDetails, StatusChange};
use crate::domain::errors::WorkflowResult;
use async_trait::async_trait;
use shared_types::{Deadline, DonationId, RequestId, User, UserId, VolunteerRequest};

#[async_trait]
pub trait VolunteerWorkflowApi: Send + Sync {
    /// Claim a donation. The request starts `pending` and records the
    /// donation's donor.
    async fn create(
        &self,
        donation: DonationId,
        volunteer: &User,
        details: RequestDetails,
        deadline: Deadline,
    ) -> WorkflowResult<VolunteerRequest>;

    /// Checks run NotFound, then Unauthorized, then InvalidTransition.
    async fn update_status(
        &self,
        id: RequestId,
        change: StatusChange,
        actor: &User,
        deadline: Deadline,
    ) -> WorkflowResult<VolunteerRequest>;

    /// Visible to the donor, the volunteer and admins.
    async fn get(
        &self,
        id: RequestId,
        actor: &User,
        deadline: Deadline,
    ) -> WorkflowResult<VolunteerRequest>;

    async fn list_for_volunteer(
        &self,
        volunteer: UserId,
        deadline: Deadline,
    ) -> WorkflowResult<Vec<VolunteerRequest>>;

    async fn list_for_donor(
        &self,
        donor: UserId,
        deadline: Deadline,
    ) -> WorkflowResult<Vec<VolunteerRequest>>;
}
