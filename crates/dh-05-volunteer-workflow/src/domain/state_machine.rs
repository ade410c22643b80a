//! Volunteer request status edges.

use crate::domain::errors::{WorkflowError, WorkflowResult};
use chrono::{DateTime, Utc};
use shared_types::{RequestStatus, VolunteerRequest};

use RequestStatus::{Accepted, Cancelled, Collected, Completed, Distributed, Pending, Rejected};

/// Every legal `(from, to)` pair.
pub const REQUEST_EDGES: &[(RequestStatus, RequestStatus)] = &[
    (Pending, Accepted),
    (Accepted, Collected),
    (Collected, Distributed),
    (Distributed, Completed),
    (Pending, Rejected),
    (Pending, Cancelled),
    (Accepted, Cancelled),
    (Collected, Cancelled),
    (Distributed, Cancelled),
];

pub fn can_transition(from: RequestStatus, to: RequestStatus) -> bool {
    REQUEST_EDGES.contains(&(from, to))
}

pub fn allowed_from(from: RequestStatus) -> Vec<RequestStatus> {
    REQUEST_EDGES
        .iter()
        .filter(|(source, _)| *source == from)
        .map(|(_, target)| *target)
        .collect()
}

pub fn is_terminal(status: RequestStatus) -> bool {
    !REQUEST_EDGES.iter().any(|(source, _)| *source == status)
}

/// Move `request` to `to` if the edge exists, stamping `updated_at`.
pub fn apply_transition(
    request: &mut VolunteerRequest,
    to: RequestStatus,
    now: DateTime<Utc>,
) -> WorkflowResult<()> {
    let from = request.status;
    if !can_transition(from, to) {
        return Err(WorkflowError::InvalidTransition { from, to });
    }
    request.status = to;
    request.updated_at = now;
    Ok(())
}
