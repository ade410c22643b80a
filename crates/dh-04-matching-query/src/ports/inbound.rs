//! Driving port for the Matching Query Service.

use crate::domain::errors::MatchingResult;
use crate::domain::params::NearbyParams;
use async_trait::async_trait;
use dh_01_entity_store::NearbyDonation;
use shared_types::Deadline;

#[async_trait]
pub trait MatchingQueryApi: Send + Sync {
    /// `available` donations within `radius_km` of `(longitude, latitude)`,
    /// nearest first.
    async fn find_nearby(
        &self,
        longitude: f64,
        latitude: f64,
        radius_km: Option<f64>,
        deadline: Deadline,
    ) -> MatchingResult<Vec<NearbyDonation>>;

    async fn find_nearby_params(
        &self,
        params: NearbyParams,
        deadline: Deadline,
    ) -> MatchingResult<Vec<NearbyDonation>> {
        self.find_nearby(params.longitude, params.latitude, params.radius_km, deadline)
            .await
    }
}
