//! Donation status edges.

use crate::domain::errors::{LifecycleError, LifecycleResult};
use chrono::{DateTime, Utc};
use shared_types::{Donation, DonationStatus};

use DonationStatus::{Available, Cancelled, Collected, Completed, Distributed, Requested};

/// Every legal `(from, to)` pair. Anything absent is rejected.
pub const DONATION_EDGES: &[(DonationStatus, DonationStatus)] = &[
    (Available, Requested),
    (Requested, Collected),
    (Collected, Distributed),
    (Distributed, Completed),
    (Available, Cancelled),
    (Requested, Cancelled),
    (Collected, Cancelled),
    (Distributed, Cancelled),
];

pub fn can_transition(from: DonationStatus, to: DonationStatus) -> bool {
    DONATION_EDGES.contains(&(from, to))
}

/// Targets reachable in one step from `from`.
pub fn allowed_from(from: DonationStatus) -> Vec<DonationStatus> {
    DONATION_EDGES
        .iter()
        .filter(|(source, _)| *source == from)
        .map(|(_, target)| *target)
        .collect()
}

/// A status with no outgoing edge.
pub fn is_terminal(status: DonationStatus) -> bool {
    !DONATION_EDGES.iter().any(|(source, _)| *source == status)
}

/// Move `donation` to `to` if the edge exists, stamping `updated_at`.
///
/// Leaves the donation untouched on error.
pub fn apply_transition(
    donation: &mut Donation,
    to: DonationStatus,
    now: DateTime<Utc>,
) -> LifecycleResult<()> {
    let from = donation.status;
    if !can_transition(from, to) {
        return Err(LifecycleError::InvalidTransition { from, to });
    }
    donation.status = to;
    donation.updated_at = now;
    Ok(())
}
