//! Which party to a request may set which status.

use shared_types::{RequestStatus, User, VolunteerRequest};

/// A user's role on one specific request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Donor,
    Volunteer,
}

/// The parties allowed to move a request into `to`.
///
/// `pending` has no inbound edge; both parties pass here so the caller sees
/// the transition error instead.
fn permitted(to: RequestStatus) -> &'static [Party] {
    match to {
        RequestStatus::Accepted | RequestStatus::Rejected => &[Party::Donor],
        RequestStatus::Collected | RequestStatus::Distributed => &[Party::Volunteer],
        RequestStatus::Cancelled | RequestStatus::Completed | RequestStatus::Pending => {
            &[Party::Donor, Party::Volunteer]
        }
    }
}

pub fn party_of(request: &VolunteerRequest, user: &User) -> Option<Party> {
    if user.id == request.donor {
        Some(Party::Donor)
    } else if user.id == request.volunteer {
        Some(Party::Volunteer)
    } else {
        None
    }
}

/// Whether `actor` may move `request` into `to`. Admins get no override.
pub fn may_set(request: &VolunteerRequest, actor: &User, to: RequestStatus) -> bool {
    party_of(request, actor).is_some_and(|party| permitted(to).contains(&party))
}
