//! Volunteer Workflow Service.

use crate::config::WorkflowConfig;
use crate::domain::authorization::may_set;
use crate::domain::details::{beneficiary_count, RequestDetails, StatusChange};
use crate::domain::errors::{WorkflowError, WorkflowResult};
use crate::domain::state_machine::apply_transition;
use crate::ports::inbound::VolunteerWorkflowApi;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dh_01_entity_store::{
    EntityKind, EntityStore, RequestQuery, StoreError, WriteBatch, ACTIVE_REQUEST_INDEX,
};
use dh_03_donation_lifecycle::{apply_transition as move_donation, LifecycleError};
use shared_types::{
    Clock, Deadline, DonationId, DonationStatus, RequestId, RequestStatus, User, UserId,
    VolunteerRequest,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct VolunteerWorkflowService {
    store: Arc<dyn EntityStore>,
    clock: Arc<dyn Clock>,
    config: WorkflowConfig,
}

impl VolunteerWorkflowService {
    pub fn new(store: Arc<dyn EntityStore>, clock: Arc<dyn Clock>, config: WorkflowConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    async fn load(&self, id: RequestId, deadline: Deadline) -> WorkflowResult<VolunteerRequest> {
        self.store
            .get_request(id, deadline)
            .await?
            .ok_or(WorkflowError::RequestNotFound(id))
    }

    async fn has_active_request(
        &self,
        donation: DonationId,
        volunteer: UserId,
        deadline: Deadline,
    ) -> WorkflowResult<bool> {
        let query = RequestQuery {
            donation: Some(donation),
            volunteer: Some(volunteer),
            ..RequestQuery::default()
        };
        let existing = self.store.query_requests(&query, deadline).await?;
        Ok(existing.iter().any(|r| r.status.is_active()))
    }

    /// Build the batch for one attempt at `update_status`. The request is
    /// updated in place so the caller can return it after a commit.
    async fn plan(
        &self,
        request: &mut VolunteerRequest,
        change: &StatusChange,
        count: Option<u32>,
        now: DateTime<Utc>,
        deadline: Deadline,
    ) -> WorkflowResult<WriteBatch> {
        apply_transition(request, change.status, now)?;
        if let Some(date) = change.collection_date {
            request.collection_date = Some(date);
        }
        if let Some(count) = count {
            request.beneficiary_count = count;
        }

        let mut batch = WriteBatch::new();
        batch.update_request(request);

        match change.status {
            RequestStatus::Accepted => {
                let mut donation = self
                    .store
                    .get_donation(request.donation, deadline)
                    .await?
                    .ok_or(WorkflowError::DonationNotFound(request.donation))?;
                move_donation(&mut donation, DonationStatus::Requested, now).map_err(
                    |err| match err {
                        LifecycleError::InvalidTransition { from, to } => {
                            WorkflowError::DonationTransition { from, to }
                        }
                        other => WorkflowError::validation(other.to_string()),
                    },
                )?;
                batch.update_donation(&mut donation);
            }
            RequestStatus::Completed => {
                let mut volunteer = self
                    .store
                    .get_user(request.volunteer, deadline)
                    .await?
                    .ok_or_else(|| StoreError::NotFound {
                        entity: EntityKind::User,
                        id: request.volunteer.to_string(),
                    })?;
                volunteer.points = volunteer
                    .points
                    .saturating_add(self.config.points_per_completion);
                volunteer.updated_at = now;
                batch.update_user(&mut volunteer);
            }
            _ => {}
        }
        Ok(batch)
    }
}

#[async_trait]
impl VolunteerWorkflowApi for VolunteerWorkflowService {
    async fn create(
        &self,
        donation_id: DonationId,
        volunteer: &User,
        details: RequestDetails,
        deadline: Deadline,
    ) -> WorkflowResult<VolunteerRequest> {
        let count = beneficiary_count(details.beneficiary_count)?.unwrap_or(0);

        let donation = self
            .store
            .get_donation(donation_id, deadline)
            .await?
            .ok_or(WorkflowError::DonationNotFound(donation_id))?;

        if donation.donor == volunteer.id {
            return Err(WorkflowError::validation(
                "you cannot request your own donation",
            ));
        }
        let duplicate = WorkflowError::DuplicateRequest {
            donation: donation_id,
            volunteer: volunteer.id,
        };
        if self
            .has_active_request(donation_id, volunteer.id, deadline)
            .await?
        {
            return Err(duplicate);
        }
        if donation.status != DonationStatus::Available {
            return Err(WorkflowError::validation(format!(
                "donation is {}; only available donations can be requested",
                donation.status
            )));
        }

        let now = self.clock.now();
        let request = VolunteerRequest {
            id: RequestId::new(),
            donation: donation_id,
            volunteer: volunteer.id,
            donor: donation.donor,
            status: RequestStatus::Pending,
            message: details.message.filter(|m| !m.trim().is_empty()),
            collection_date: details.collection_date,
            beneficiary_count: count,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        match self.store.insert_request(request.clone(), deadline).await {
            Ok(()) => {
                info!(
                    request_id = %request.id,
                    donation_id = %donation_id,
                    volunteer = %volunteer.id,
                    "volunteer request created"
                );
                Ok(request)
            }
            Err(err) if err.is_unique_violation(ACTIVE_REQUEST_INDEX) => {
                debug!(donation_id = %donation_id, volunteer = %volunteer.id, "lost duplicate race");
                Err(duplicate)
            }
            Err(StoreError::NotFound { .. }) => Err(WorkflowError::DonationNotFound(donation_id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_status(
        &self,
        id: RequestId,
        change: StatusChange,
        actor: &User,
        deadline: Deadline,
    ) -> WorkflowResult<VolunteerRequest> {
        let count = beneficiary_count(change.beneficiary_count)?;
        let mut attempt = 1;
        loop {
            let mut request = self.load(id, deadline).await?;
            if !may_set(&request, actor, change.status) {
                return Err(WorkflowError::Unauthorized {
                    actor: actor.id,
                    request: id,
                    action: "update",
                });
            }

            let from = request.status;
            let now = self.clock.now();
            let batch = self
                .plan(&mut request, &change, count, now, deadline)
                .await?;

            match self.store.commit(batch, deadline).await {
                Ok(()) => {
                    info!(
                        request_id = %id,
                        %from,
                        to = %change.status,
                        actor = %actor.id,
                        "volunteer request transitioned"
                    );
                    return Ok(request);
                }
                Err(StoreError::VersionConflict { .. })
                    if attempt < self.config.max_conflict_retries =>
                {
                    debug!(request_id = %id, attempt, "request changed underneath, re-reading");
                    attempt += 1;
                }
                Err(err) => {
                    warn!(request_id = %id, to = %change.status, error = %err, "request update not committed");
                    return Err(err.into());
                }
            }
        }
    }

    async fn get(
        &self,
        id: RequestId,
        actor: &User,
        deadline: Deadline,
    ) -> WorkflowResult<VolunteerRequest> {
        let request = self.load(id, deadline).await?;
        if !request.involves(actor.id) && !actor.is_admin() {
            return Err(WorkflowError::Unauthorized {
                actor: actor.id,
                request: id,
                action: "view",
            });
        }
        Ok(request)
    }

    async fn list_for_volunteer(
        &self,
        volunteer: UserId,
        deadline: Deadline,
    ) -> WorkflowResult<Vec<VolunteerRequest>> {
        Ok(self
            .store
            .query_requests(&RequestQuery::for_volunteer(volunteer), deadline)
            .await?)
    }

    async fn list_for_donor(
        &self,
        donor: UserId,
        deadline: Deadline,
    ) -> WorkflowResult<Vec<VolunteerRequest>> {
        Ok(self
            .store
            .query_requests(&RequestQuery::for_donor(donor), deadline)
            .await?)
    }
}
