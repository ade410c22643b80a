//! Atomic multi-document writes.

use shared_types::{Donation, User, VolunteerRequest};

/// A single version-checked update inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    User {
        entity: User,
        expected_version: u64,
    },
    Donation {
        entity: Donation,
        expected_version: u64,
    },
    Request {
        entity: VolunteerRequest,
        expected_version: u64,
    },
}

impl WriteOp {
    pub fn expected_version(&self) -> u64 {
        match self {
            WriteOp::User {
                expected_version, ..
            }
            | WriteOp::Donation {
                expected_version, ..
            }
            | WriteOp::Request {
                expected_version, ..
            } => *expected_version,
        }
    }
}

/// Ordered updates applied all-or-nothing by
/// [`EntityStore::commit`](crate::EntityStore::commit).
///
/// The `update_*` methods take the entity as read from the store (already
/// modified by the caller), record its current version as the expected one
/// and bump the caller's copy, so after a successful commit the caller holds
/// exactly what is stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_user(&mut self, user: &mut User) -> &mut Self {
        let expected_version = user.version;
        user.version += 1;
        self.ops.push(WriteOp::User {
            entity: user.clone(),
            expected_version,
        });
        self
    }

    pub fn update_donation(&mut self, donation: &mut Donation) -> &mut Self {
        let expected_version = donation.version;
        donation.version += 1;
        self.ops.push(WriteOp::Donation {
            entity: donation.clone(),
            expected_version,
        });
        self
    }

    pub fn update_request(&mut self, request: &mut VolunteerRequest) -> &mut Self {
        let expected_version = request.version;
        request.version += 1;
        self.ops.push(WriteOp::Request {
            entity: request.clone(),
            expected_version,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
