//! Listing filter.

use crate::domain::errors::LifecycleResult;
use dh_01_entity_store::DonationQuery;
use shared_types::{Category, DonationStatus, UserId};

/// Public listing filter. A missing status means `available`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationFilter {
    pub status: Option<DonationStatus>,
    pub category: Option<Category>,
    pub donor: Option<UserId>,
}

impl DonationFilter {
    /// Parse raw query-string values. Blank values count as absent.
    pub fn parse(status: Option<&str>, category: Option<&str>) -> LifecycleResult<Self> {
        Ok(Self {
            status: present(status)
                .map(str::parse::<DonationStatus>)
                .transpose()?,
            category: present(category).map(str::parse::<Category>).transpose()?,
            donor: None,
        })
    }

    pub(crate) fn to_query(&self) -> DonationQuery {
        DonationQuery {
            status: Some(self.status.unwrap_or(DonationStatus::Available)),
            category: self.category,
            donor: self.donor,
        }
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
