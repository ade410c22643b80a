//! Creation input for a donation and the rules it must pass.

use crate::domain::errors::{LifecycleError, LifecycleResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared_types::{Category, Donation, DonationId, DonationStatus, GeoPoint, Priority, UserId};

/// Fields a donor submits. Enumerations arrive as raw text so an unknown
/// value is reported as a validation failure naming the accepted set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDonation {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Defaults to 1.
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    /// Defaults to `medium`.
    pub priority: Option<String>,
}

impl NewDonation {
    /// Minimal valid input, mostly for tests and seeding.
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            category: Some(category.to_string()),
            ..Self::default()
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    /// Validate and build an `available` donation owned by `donor`.
    pub fn into_donation(self, donor: UserId, now: DateTime<Utc>) -> LifecycleResult<Donation> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(LifecycleError::validation("title is required"));
        }

        let category: Category = match self.category.as_deref().map(str::trim) {
            None | Some("") => return Err(LifecycleError::validation("category is required")),
            Some(raw) => raw.parse()?,
        };

        let quantity = match self.quantity {
            None => 1,
            Some(q) if q < 1 => {
                return Err(LifecycleError::validation("quantity must be at least 1"))
            }
            Some(q) => u32::try_from(q)
                .map_err(|_| LifecycleError::validation("quantity is too large"))?,
        };

        let priority = match self.priority.as_deref() {
            None => Priority::default(),
            Some(raw) => raw.parse()?,
        };

        if self.images.iter().any(|url| url.trim().is_empty()) {
            return Err(LifecycleError::validation("image URLs must not be blank"));
        }

        Ok(Donation {
            id: DonationId::new(),
            donor,
            title: title.to_string(),
            description: non_blank(self.description),
            category,
            quantity,
            unit: non_blank(self.unit),
            expiry_date: self.expiry_date,
            images: self.images,
            location: self.location,
            address: non_blank(self.address),
            status: DonationStatus::Available,
            priority,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
