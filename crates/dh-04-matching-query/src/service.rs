//! Matching Query Service.

use crate::config::MatchingConfig;
use crate::domain::errors::{MatchingError, MatchingResult};
use crate::ports::inbound::MatchingQueryApi;
use async_trait::async_trait;
use dh_01_entity_store::{EntityStore, NearbyDonation};
use dh_02_geo_index::km_to_meters;
use shared_types::{Deadline, DonationStatus, GeoPoint};
use std::sync::Arc;
use tracing::debug;

pub struct MatchingQueryService {
    store: Arc<dyn EntityStore>,
    config: MatchingConfig,
}

impl MatchingQueryService {
    pub fn new(store: Arc<dyn EntityStore>, config: MatchingConfig) -> Self {
        Self { store, config }
    }

    /// Effective search radius in km, or `None` when nothing can match.
    fn effective_radius(&self, radius_km: Option<f64>) -> MatchingResult<Option<f64>> {
        let radius = radius_km.unwrap_or(self.config.default_radius_km);
        if !radius.is_finite() {
            return Err(MatchingError::Validation(
                "radius must be a finite number".into(),
            ));
        }
        if radius <= 0.0 {
            return Ok(None);
        }
        Ok(Some(radius.min(self.config.max_radius_km)))
    }
}

#[async_trait]
impl MatchingQueryApi for MatchingQueryService {
    async fn find_nearby(
        &self,
        longitude: f64,
        latitude: f64,
        radius_km: Option<f64>,
        deadline: Deadline,
    ) -> MatchingResult<Vec<NearbyDonation>> {
        let center = GeoPoint::new(longitude, latitude)?;
        let Some(radius_km) = self.effective_radius(radius_km)? else {
            return Ok(Vec::new());
        };

        let found = self
            .store
            .donations_within(
                center,
                km_to_meters(radius_km),
                Some(DonationStatus::Available),
                deadline,
            )
            .await?;

        debug!(longitude, latitude, radius_km, found = found.len(), "nearby query");
        Ok(found)
    }
}
