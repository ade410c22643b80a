//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `User`, `Role`, `PostalAddress`
//! - **Listings**: `Donation`, `Category`, `Priority`, `DonationStatus`
//! - **Claims**: `VolunteerRequest`, `RequestStatus`
//!
//! Every entity carries a `version` bumped by the store on each committed
//! update; writers hand back the version they read so concurrent updates
//! are detected instead of silently overwritten.

use crate::geo::GeoPoint;
use crate::ids::{DonationId, RequestId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// VOCABULARIES
// =============================================================================

string_enum! {
    /// Account role.
    #[derive(Default)]
    pub enum Role ("role") {
        #[default]
        Donor => "donor",
        Volunteer => "volunteer",
        Beneficiary => "beneficiary",
        Admin => "admin",
    }
}

string_enum! {
    /// What kind of goods a donation holds.
    pub enum Category ("category") {
        Food => "food",
        Clothes => "clothes",
        Toys => "toys",
        Essentials => "essentials",
        Books => "books",
        Medical => "medical",
    }
}

string_enum! {
    /// Donor-assigned urgency.
    #[derive(Default)]
    pub enum Priority ("priority") {
        Low => "low",
        #[default]
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

string_enum! {
    /// Donation lifecycle state.
    ///
    /// `available → requested → collected → distributed → completed`, with
    /// `cancelled` reachable from any non-terminal state.
    pub enum DonationStatus ("donation status") {
        Available => "available",
        Requested => "requested",
        Collected => "collected",
        Distributed => "distributed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl DonationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Completed | DonationStatus::Cancelled)
    }
}

string_enum! {
    /// Volunteer request workflow state.
    ///
    /// `pending → accepted → collected → distributed → completed`; `rejected`
    /// only from `pending`; `cancelled` from any non-terminal state.
    pub enum RequestStatus ("request status") {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
        Collected => "collected",
        Distributed => "distributed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Completed | RequestStatus::Rejected | RequestStatus::Cancelled
        )
    }

    /// Active requests occupy the (donation, volunteer) uniqueness slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, RequestStatus::Rejected | RequestStatus::Cancelled)
    }
}

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Embedded postal address on a user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Unique, stored lowercase.
    pub email: String,
    /// Opaque hash owned by the auth collaborator. Never sent to clients.
    #[serde(skip_serializing, default)]
    pub credential_hash: String,
    pub display_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<PostalAddress>,
    pub profile_image: Option<String>,
    pub location: Option<GeoPoint>,
    pub points: u64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl User {
    /// New unverified account with zero points.
    pub fn new(
        email: &str,
        display_name: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email: normalize_email(email),
            credential_hash: String::new(),
            display_name: display_name.into(),
            role,
            phone: None,
            address: None,
            profile_image: None,
            location: None,
            points: 0,
            verified: false,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Canonical form used by the email unique index.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

// =============================================================================
// CLUSTER B: LISTINGS
// =============================================================================

/// An offered lot of goods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: DonationId,
    /// Owning donor. Immutable after creation.
    pub donor: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    /// Always ≥ 1.
    pub quantity: u32,
    pub unit: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    pub status: DonationStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

// =============================================================================
// CLUSTER C: CLAIMS
// =============================================================================

/// A volunteer's claim on a donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRequest {
    pub id: RequestId,
    /// Immutable.
    pub donation: DonationId,
    /// Immutable.
    pub volunteer: UserId,
    /// Snapshot of `donation.donor` taken at creation. Immutable.
    pub donor: UserId,
    pub status: RequestStatus,
    pub message: Option<String>,
    pub collection_date: Option<DateTime<Utc>>,
    pub beneficiary_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl VolunteerRequest {
    /// Whether `user` is the donor or the volunteer on this request.
    pub fn involves(&self, user: UserId) -> bool {
        self.donor == user || self.volunteer == user
    }
}
