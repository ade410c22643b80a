//! Query filters and result shapes.

use serde::Serialize;
use shared_types::{
    Category, Donation, DonationId, DonationStatus, RequestStatus, UserId, VolunteerRequest,
};

/// Filter for [`EntityStore::query_donations`](crate::EntityStore::query_donations).
///
/// `None` fields match everything. Results come back newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationQuery {
    pub status: Option<DonationStatus>,
    pub category: Option<Category>,
    pub donor: Option<UserId>,
}

impl DonationQuery {
    pub fn matches(&self, donation: &Donation) -> bool {
        self.status.map_or(true, |s| donation.status == s)
            && self.category.map_or(true, |c| donation.category == c)
            && self.donor.map_or(true, |d| donation.donor == d)
    }
}

/// Filter for [`EntityStore::query_requests`](crate::EntityStore::query_requests).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    pub volunteer: Option<UserId>,
    pub donor: Option<UserId>,
    pub donation: Option<DonationId>,
    pub status: Option<RequestStatus>,
}

impl RequestQuery {
    pub fn for_volunteer(volunteer: UserId) -> Self {
        Self {
            volunteer: Some(volunteer),
            ..Self::default()
        }
    }

    pub fn for_donor(donor: UserId) -> Self {
        Self {
            donor: Some(donor),
            ..Self::default()
        }
    }

    pub fn matches(&self, request: &VolunteerRequest) -> bool {
        self.volunteer.map_or(true, |v| request.volunteer == v)
            && self.donor.map_or(true, |d| request.donor == d)
            && self.donation.map_or(true, |d| request.donation == d)
            && self.status.map_or(true, |s| request.status == s)
    }
}

/// A donation found by a radius query with its great-circle distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyDonation {
    #[serde(flatten)]
    pub donation: Donation,
    pub distance_meters: f64,
}
