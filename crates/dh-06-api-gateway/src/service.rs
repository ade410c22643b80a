//! Gateway assembly: shared state, router and server loop.

use crate::domain::config::GatewayConfig;
use crate::domain::error::{ApiError, GatewayError};
use crate::handlers::{donations, system, users, volunteers};
use crate::middleware::{create_cors_layer, TimeoutLayer, TracingLayer};
use crate::ports::outbound::Authenticator;
use axum::http::Uri;
use axum::routing::{get, post, put};
use axum::Router;
use dh_03_donation_lifecycle::DonationLifecycleApi;
use dh_04_matching_query::MatchingQueryApi;
use dh_05_volunteer_workflow::VolunteerWorkflowApi;
use shared_types::{Deadline, ErrorKind};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{info, warn};

/// The core services a gateway fronts.
#[derive(Clone)]
pub struct HubServices {
    pub lifecycle: Arc<dyn DonationLifecycleApi>,
    pub matching: Arc<dyn MatchingQueryApi>,
    pub workflow: Arc<dyn VolunteerWorkflowApi>,
    pub authenticator: Arc<dyn Authenticator>,
}

/// Handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<dyn DonationLifecycleApi>,
    pub matching: Arc<dyn MatchingQueryApi>,
    pub workflow: Arc<dyn VolunteerWorkflowApi>,
    pub authenticator: Arc<dyn Authenticator>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(services: HubServices, config: GatewayConfig) -> Self {
        Self {
            lifecycle: services.lifecycle,
            matching: services.matching,
            workflow: services.workflow,
            authenticator: services.authenticator,
            config: Arc::new(config),
        }
    }

    /// Deadline for the core operation serving the current request.
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.config.timeouts.storage)
    }
}

/// Build the HTTP router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TracingLayer::new())
        .layer(TimeoutLayer::new(state.config.timeouts.request))
        .layer(create_cors_layer(&state.config.cors));

    Router::new()
        .route("/health", get(system::health_check))
        .route("/metrics", get(system::metrics))
        // Donations
        .route(
            "/api/donations",
            get(donations::list).post(donations::create),
        )
        .route("/api/donations/nearby", get(donations::nearby))
        .route("/api/donations/mine", get(donations::mine))
        .route("/api/donations/:id", get(donations::get_one))
        .route("/api/donations/:id/status", put(donations::update_status))
        // Volunteer requests
        .route("/api/volunteers/request", post(volunteers::create))
        .route("/api/volunteers/my-requests", get(volunteers::my_requests))
        .route(
            "/api/volunteers/incoming-requests",
            get(volunteers::incoming_requests),
        )
        .route("/api/volunteers/requests/:id", get(volunteers::get_one))
        .route(
            "/api/volunteers/requests/:id/status",
            put(volunteers::update_status),
        )
        // Users
        .route("/api/users/me", get(users::me))
        .fallback(route_not_found)
        .layer(middleware)
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::new(ErrorKind::NotFound, format!("no route for {}", uri.path()))
}

/// Owns the configuration and state for one HTTP listener.
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl ApiGatewayService {
    pub fn new(config: GatewayConfig, services: HubServices) -> Result<Self, GatewayError> {
        config.validate()?;
        if let Err(err) = hub_telemetry::register_metrics() {
            warn!(error = %err, "metrics registration failed, /metrics will be incomplete");
        }
        let state = AppState::new(services, config.clone());
        Ok(Self { config, state })
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local: Option<SocketAddr> = listener.local_addr().ok();
        info!(addr = ?local, "API gateway listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(GatewayError::Serve)?;

        info!("API gateway stopped");
        Ok(())
    }

    /// [`bind`](Self::bind) then [`serve`](Self::serve).
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
