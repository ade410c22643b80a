//! Test harness shared by the integration modules.
//!
//! Every harness owns a fresh in-memory store, a [`ManualClock`] pinned to a
//! fixed instant, and the three core services wired the way `hub-runtime`
//! wires them.

use axum::Router;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use dh_01_entity_store::{EntityStore, InMemoryEntityStore, RetryPolicy, RetryingStore};
use dh_03_donation_lifecycle::{
    DonationLifecycleApi, DonationLifecycleService, LifecycleConfig, NewDonation,
};
use dh_04_matching_query::{MatchingConfig, MatchingQueryService};
use dh_05_volunteer_workflow::{
    RequestDetails, StatusChange, VolunteerWorkflowApi, VolunteerWorkflowService, WorkflowConfig,
    WorkflowResult,
};
use dh_06_api_gateway::{ApiGatewayService, GatewayConfig, HubServices, StaticTokenAuthenticator};
use shared_types::{
    Category, Clock, Deadline, Donation, DonationId, GeoPoint, ManualClock, RequestStatus, Role,
    User, UserId, VolunteerRequest,
};
use std::sync::Arc;

/// Fixed start of every harness clock.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn point(lon: f64, lat: f64) -> GeoPoint {
    GeoPoint::new(lon, lat).expect("coordinates in range")
}

pub struct Harness {
    pub clock: Arc<ManualClock>,
    /// The concrete store, for fault injection and stats.
    pub memory: Arc<InMemoryEntityStore>,
    /// What the services see; a `RetryingStore` when built with a policy.
    pub store: Arc<dyn EntityStore>,
    pub lifecycle: Arc<DonationLifecycleService>,
    pub matching: Arc<MatchingQueryService>,
    pub workflow: Arc<VolunteerWorkflowService>,
}

#[derive(Default)]
pub struct HarnessBuilder {
    lifecycle: LifecycleConfig,
    matching: MatchingConfig,
    workflow: WorkflowConfig,
    retry: Option<RetryPolicy>,
}

impl HarnessBuilder {
    pub fn points_per_completion(mut self, points: u64) -> Self {
        self.workflow.points_per_completion = points;
        self
    }

    pub fn conflict_retries(mut self, retries: u32) -> Self {
        self.lifecycle.max_conflict_retries = retries;
        self.workflow.max_conflict_retries = retries;
        self
    }

    /// Put a `RetryingStore` between the services and the memory store.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn build(self) -> Harness {
        let clock = Arc::new(ManualClock::new(epoch()));
        let memory = Arc::new(InMemoryEntityStore::new());
        let store: Arc<dyn EntityStore> = match self.retry {
            Some(policy) => Arc::new(RetryingStore::new(memory.clone(), policy)),
            None => memory.clone(),
        };
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        Harness {
            lifecycle: Arc::new(DonationLifecycleService::new(
                store.clone(),
                dyn_clock.clone(),
                self.lifecycle,
            )),
            matching: Arc::new(MatchingQueryService::new(store.clone(), self.matching)),
            workflow: Arc::new(VolunteerWorkflowService::new(
                store.clone(),
                dyn_clock,
                self.workflow,
            )),
            clock,
            memory,
            store,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        HarnessBuilder::default().build()
    }

    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// Move the clock forward one second so creation order is unambiguous.
    pub fn tick(&self) {
        self.clock.advance(ChronoDuration::seconds(1));
    }

    pub async fn user(&self, name: &str, role: Role) -> User {
        let user = User::new(
            &format!("{name}@example.org"),
            name,
            role,
            self.clock.now(),
        );
        self.memory
            .insert_user(user.clone(), Deadline::none())
            .await
            .expect("insert user");
        user
    }

    pub async fn reload_user(&self, id: UserId) -> User {
        self.memory
            .get_user(id, Deadline::none())
            .await
            .expect("get user")
            .expect("user exists")
    }

    pub async fn donate(&self, donor: &User, fields: NewDonation) -> Donation {
        let donation = self
            .lifecycle
            .create(donor, fields, Deadline::none())
            .await
            .expect("create donation");
        self.tick();
        donation
    }

    /// A single food lot at `(lon, lat)`.
    pub async fn donation_at(&self, donor: &User, title: &str, lon: f64, lat: f64) -> Donation {
        self.donate(
            donor,
            NewDonation::new(title, Category::Food).with_location(point(lon, lat)),
        )
        .await
    }

    pub async fn donation(&self, id: DonationId) -> Donation {
        self.lifecycle
            .get(id, Deadline::none())
            .await
            .expect("get donation")
    }

    pub async fn request(&self, donation: &Donation, volunteer: &User) -> VolunteerRequest {
        let request = self
            .workflow
            .create(
                donation.id,
                volunteer,
                RequestDetails::with_message("I can pick this up"),
                Deadline::none(),
            )
            .await
            .expect("create request");
        self.tick();
        request
    }

    pub async fn set(
        &self,
        request: &VolunteerRequest,
        status: RequestStatus,
        actor: &User,
    ) -> WorkflowResult<VolunteerRequest> {
        self.workflow
            .update_status(request.id, StatusChange::to(status), actor, Deadline::none())
            .await
    }

    /// Services as the gateway sees them, with `tokens` bound to users.
    pub fn services(&self, tokens: &[(&str, &User)]) -> HubServices {
        let authenticator = tokens.iter().fold(
            StaticTokenAuthenticator::new(self.store.clone()),
            |auth, (token, user)| auth.with_token(*token, user.id),
        );
        HubServices {
            lifecycle: self.lifecycle.clone(),
            matching: self.matching.clone(),
            workflow: self.workflow.clone(),
            authenticator: Arc::new(authenticator),
        }
    }

    pub fn router(&self, tokens: &[(&str, &User)]) -> Router {
        self.router_with(GatewayConfig::for_testing(), tokens)
    }

    pub fn router_with(&self, config: GatewayConfig, tokens: &[(&str, &User)]) -> Router {
        ApiGatewayService::new(config, self.services(tokens))
            .expect("valid gateway config")
            .router()
    }
}
