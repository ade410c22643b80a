//! Donation Lifecycle Service.

use crate::config::LifecycleConfig;
use crate::domain::errors::{LifecycleError, LifecycleResult};
use crate::domain::filter::DonationFilter;
use crate::domain::new_donation::NewDonation;
use crate::domain::state_machine::apply_transition;
use crate::ports::inbound::DonationLifecycleApi;
use async_trait::async_trait;
use dh_01_entity_store::{DonationQuery, EntityStore, StoreError, WriteBatch};
use shared_types::{Clock, Deadline, Donation, DonationId, DonationStatus, User, UserId};
use std::sync::Arc;
use tracing::{debug, info};

pub struct DonationLifecycleService {
    store: Arc<dyn EntityStore>,
    clock: Arc<dyn Clock>,
    config: LifecycleConfig,
}

impl DonationLifecycleService {
    pub fn new(store: Arc<dyn EntityStore>, clock: Arc<dyn Clock>, config: LifecycleConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }
}

#[async_trait]
impl DonationLifecycleApi for DonationLifecycleService {
    async fn create(
        &self,
        donor: &User,
        fields: NewDonation,
        deadline: Deadline,
    ) -> LifecycleResult<Donation> {
        let donation = fields.into_donation(donor.id, self.clock.now())?;
        self.store.insert_donation(donation.clone(), deadline).await?;

        info!(
            donation_id = %donation.id,
            donor = %donor.id,
            category = %donation.category,
            quantity = donation.quantity,
            "donation created"
        );
        Ok(donation)
    }

    async fn transition(
        &self,
        id: DonationId,
        to: DonationStatus,
        actor: &User,
        deadline: Deadline,
    ) -> LifecycleResult<Donation> {
        let mut attempt = 1;
        loop {
            let mut donation = self
                .store
                .get_donation(id, deadline)
                .await?
                .ok_or(LifecycleError::NotFound(id))?;

            if donation.donor != actor.id && !actor.is_admin() {
                return Err(LifecycleError::Unauthorized {
                    actor: actor.id,
                    donation: id,
                });
            }

            let from = donation.status;
            // `requested` is entered only by accepting a volunteer request.
            if to == DonationStatus::Requested {
                return Err(LifecycleError::InvalidTransition { from, to });
            }
            apply_transition(&mut donation, to, self.clock.now())?;

            let mut batch = WriteBatch::new();
            batch.update_donation(&mut donation);
            match self.store.commit(batch, deadline).await {
                Ok(()) => {
                    info!(donation_id = %id, %from, %to, actor = %actor.id, "donation transitioned");
                    return Ok(donation);
                }
                Err(StoreError::VersionConflict { .. })
                    if attempt < self.config.max_conflict_retries =>
                {
                    debug!(donation_id = %id, attempt, "donation changed underneath, re-reading");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn get(&self, id: DonationId, deadline: Deadline) -> LifecycleResult<Donation> {
        self.store
            .get_donation(id, deadline)
            .await?
            .ok_or(LifecycleError::NotFound(id))
    }

    async fn list(
        &self,
        filter: DonationFilter,
        deadline: Deadline,
    ) -> LifecycleResult<Vec<Donation>> {
        Ok(self.store.query_donations(&filter.to_query(), deadline).await?)
    }

    async fn list_for_donor(
        &self,
        donor: UserId,
        deadline: Deadline,
    ) -> LifecycleResult<Vec<Donation>> {
        let query = DonationQuery {
            donor: Some(donor),
            ..DonationQuery::default()
        };
        Ok(self.store.query_donations(&query, deadline).await?)
    }
}
