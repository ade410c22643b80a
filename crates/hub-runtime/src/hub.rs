//! Subsystem assembly.

use crate::config::{HubConfig, RuntimeConfigError};
use crate::seed::seed_users;
use dh_01_entity_store::{
    EntityStore, InMemoryEntityStore, RetryingStore, StoreConfigError, StoreError,
};
use dh_03_donation_lifecycle::DonationLifecycleService;
use dh_04_matching_query::MatchingQueryService;
use dh_05_volunteer_workflow::VolunteerWorkflowService;
use dh_06_api_gateway::{ApiGatewayService, GatewayError, HubServices, StaticTokenAuthenticator};
use hub_telemetry::STORE_RETRIES;
use shared_types::{Clock, Deadline};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("configuration: {0}")]
    Config(#[from] RuntimeConfigError),

    #[error("entity store: {0}")]
    Store(#[from] StoreConfigError),

    #[error("seeding users: {0}")]
    Seed(#[from] StoreError),

    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),
}

/// A fully wired Donation Hub.
pub struct Hub {
    pub store: Arc<dyn EntityStore>,
    pub services: HubServices,
    pub gateway: ApiGatewayService,
}

/// Wire every subsystem from `config`.
///
/// The store is wrapped in `RetryingStore`, whose retries are counted in
/// `hub_store_retries_total`.
pub async fn build_hub(config: &HubConfig, clock: Arc<dyn Clock>) -> Result<Hub, RuntimeError> {
    config.validate()?;

    let memory = InMemoryEntityStore::with_config(&config.store)?;
    let store: Arc<dyn EntityStore> = Arc::new(
        RetryingStore::new(memory, config.store.retry.clone()).with_observer(Arc::new(
            |operation: &'static str, _attempt: u32| {
                STORE_RETRIES.with_label_values(&[operation]).inc();
            },
        )),
    );

    let seed_deadline = Deadline::after(config.gateway.timeouts.request);
    let bindings = seed_users(store.as_ref(), &config.seed, clock.as_ref(), seed_deadline).await?;
    let authenticator = bindings.into_iter().fold(
        StaticTokenAuthenticator::new(store.clone()),
        |auth, (token, user)| auth.with_token(token, user),
    );

    let services = HubServices {
        lifecycle: Arc::new(DonationLifecycleService::new(
            store.clone(),
            clock.clone(),
            config.lifecycle.clone(),
        )),
        matching: Arc::new(MatchingQueryService::new(
            store.clone(),
            config.matching.clone(),
        )),
        workflow: Arc::new(VolunteerWorkflowService::new(
            store.clone(),
            clock,
            config.workflow.clone(),
        )),
        authenticator: Arc::new(authenticator),
    };

    let gateway = ApiGatewayService::new(config.gateway.clone(), services.clone())?;
    info!(addr = %config.gateway.http_addr(), "hub assembled");

    Ok(Hub {
        store,
        services,
        gateway,
    })
}
