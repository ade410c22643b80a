//! In-memory implementation of [`EntityStore`].
//!
//! Tables live behind one `parking_lot::RwLock`. Uniqueness checks and
//! commits run entirely under the write lock, which makes check-then-insert
//! serializable. The lock is never held across an `.await`.

use crate::adapters::faults::FaultPlan;
use crate::config::{StoreConfig, StoreConfigError};
use crate::deadline::with_deadline;
use crate::domain::batch::{WriteBatch, WriteOp};
use crate::domain::errors::{EntityKind, StoreError, ACTIVE_REQUEST_INDEX, EMAIL_INDEX};
use crate::domain::query::{DonationQuery, NearbyDonation, RequestQuery};
use crate::ports::inbound::EntityStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dh_02_geo_index::GeoIndex;
use parking_lot::RwLock;
use shared_types::{
    normalize_email, Deadline, Donation, DonationId, DonationStatus, GeoPoint, RequestId, User,
    UserId, VolunteerRequest,
};
use std::collections::HashMap;
use tracing::debug;

type ActivePair = (DonationId, UserId);

/// A stored record with its insertion sequence, used to break
/// `created_at` ties so listings stay deterministic.
#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    entity: T,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, Row<User>>,
    emails: HashMap<String, UserId>,
    donations: HashMap<DonationId, Row<Donation>>,
    donation_geo: GeoIndex<DonationId>,
    requests: HashMap<RequestId, Row<VolunteerRequest>>,
    active_pairs: HashMap<ActivePair, RequestId>,
    next_seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Record counts, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub users: usize,
    pub donations: usize,
    pub requests: usize,
    pub active_requests: usize,
}

/// Reference store adapter.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    tables: RwLock<Tables>,
    faults: FaultPlan,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &StoreConfig) -> Result<Self, StoreConfigError> {
        config.validate()?;
        let donation_geo =
            GeoIndex::new(config.geo).map_err(|e| StoreConfigError::Geo(e.to_string()))?;
        Ok(Self {
            tables: RwLock::new(Tables {
                donation_geo,
                ..Tables::default()
            }),
            faults: FaultPlan::default(),
        })
    }

    /// Failure injection hook.
    pub fn faults(&self) -> &FaultPlan {
        &self.faults
    }

    pub fn stats(&self) -> StoreStats {
        let tables = self.tables.read();
        StoreStats {
            users: tables.users.len(),
            donations: tables.donations.len(),
            requests: tables.requests.len(),
            active_requests: tables.active_pairs.len(),
        }
    }

    /// Common prologue: simulated latency and transient faults, bounded by
    /// the deadline.
    async fn enter(&self, deadline: Deadline) -> Result<(), StoreError> {
        with_deadline(deadline, async {
            if let Some(latency) = self.faults.latency() {
                tokio::time::sleep(latency).await;
            }
            self.faults.take_transient()
        })
        .await
    }
}

fn newest_first<T: Clone>(mut rows: Vec<&Row<T>>, created_at: fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.sort_by(|a, b| {
        created_at(&b.entity)
            .cmp(&created_at(&a.entity))
            .then_with(|| b.seq.cmp(&a.seq))
    });
    rows.into_iter().map(|row| row.entity.clone()).collect()
}

fn version_check(
    entity: EntityKind,
    id: impl ToString,
    expected: u64,
    found: u64,
) -> Result<(), StoreError> {
    if expected != found {
        return Err(StoreError::VersionConflict {
            entity,
            id: id.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn not_found(entity: EntityKind, id: impl ToString) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

// =============================================================================
// COMMIT STAGING
// =============================================================================

/// Writes accumulated by a commit before anything is published.
///
/// Later ops in the same batch see earlier staged versions, so a batch may
/// touch the same record twice.
#[derive(Default)]
struct Staging {
    users: HashMap<UserId, User>,
    donations: HashMap<DonationId, Donation>,
    requests: HashMap<RequestId, VolunteerRequest>,
    released: Vec<(ActivePair, RequestId)>,
    claimed: HashMap<ActivePair, RequestId>,
}

impl Staging {
    fn stage(&mut self, tables: &Tables, op: WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::User {
                mut entity,
                expected_version,
            } => {
                let current = match self.users.get(&entity.id) {
                    Some(staged) => staged,
                    None => tables
                        .users
                        .get(&entity.id)
                        .map(|row| &row.entity)
                        .ok_or_else(|| not_found(EntityKind::User, entity.id))?,
                };
                version_check(EntityKind::User, entity.id, expected_version, current.version)?;
                if normalize_email(&entity.email) != current.email {
                    return Err(StoreError::Constraint(
                        "user email cannot change through commit".into(),
                    ));
                }
                entity.email = current.email.clone();
                entity.version = expected_version + 1;
                self.users.insert(entity.id, entity);
            }
            WriteOp::Donation {
                mut entity,
                expected_version,
            } => {
                let current = match self.donations.get(&entity.id) {
                    Some(staged) => staged,
                    None => tables
                        .donations
                        .get(&entity.id)
                        .map(|row| &row.entity)
                        .ok_or_else(|| not_found(EntityKind::Donation, entity.id))?,
                };
                version_check(
                    EntityKind::Donation,
                    entity.id,
                    expected_version,
                    current.version,
                )?;
                if entity.donor != current.donor {
                    return Err(StoreError::Constraint("donation donor is immutable".into()));
                }
                if entity.quantity == 0 {
                    return Err(StoreError::Constraint("donation quantity must be >= 1".into()));
                }
                entity.version = expected_version + 1;
                self.donations.insert(entity.id, entity);
            }
            WriteOp::Request {
                mut entity,
                expected_version,
            } => {
                let current = match self.requests.get(&entity.id) {
                    Some(staged) => staged,
                    None => tables
                        .requests
                        .get(&entity.id)
                        .map(|row| &row.entity)
                        .ok_or_else(|| not_found(EntityKind::Request, entity.id))?,
                };
                version_check(
                    EntityKind::Request,
                    entity.id,
                    expected_version,
                    current.version,
                )?;
                if entity.donation != current.donation
                    || entity.volunteer != current.volunteer
                    || entity.donor != current.donor
                {
                    return Err(StoreError::Constraint(
                        "request donation, volunteer and donor are immutable".into(),
                    ));
                }

                let pair = (entity.donation, entity.volunteer);
                match (current.status.is_active(), entity.status.is_active()) {
                    (true, false) => {
                        self.claimed.remove(&pair);
                        self.released.push((pair, entity.id));
                    }
                    (false, true) => {
                        let holder = self
                            .claimed
                            .get(&pair)
                            .or_else(|| tables.active_pairs.get(&pair))
                            .copied();
                        let released = self.released.iter().any(|(p, _)| *p == pair);
                        if matches!(holder, Some(other) if other != entity.id) && !released {
                            return Err(StoreError::UniqueViolation {
                                index: ACTIVE_REQUEST_INDEX,
                            });
                        }
                        self.claimed.insert(pair, entity.id);
                    }
                    _ => {}
                }

                entity.version = expected_version + 1;
                self.requests.insert(entity.id, entity);
            }
        }
        Ok(())
    }

    /// Publish staged writes. Infallible: every check already ran.
    fn publish(self, tables: &mut Tables) {
        for (id, user) in self.users {
            if let Some(row) = tables.users.get_mut(&id) {
                row.entity = user;
            }
        }
        for (id, donation) in self.donations {
            match donation.location {
                Some(point) => tables.donation_geo.insert(id, point),
                None => {
                    tables.donation_geo.remove(&id);
                }
            }
            if let Some(row) = tables.donations.get_mut(&id) {
                row.entity = donation;
            }
        }
        for (id, request) in self.requests {
            if let Some(row) = tables.requests.get_mut(&id) {
                row.entity = request;
            }
        }
        for (pair, request_id) in self.released {
            if tables.active_pairs.get(&pair) == Some(&request_id) {
                tables.active_pairs.remove(&pair);
            }
        }
        for (pair, request_id) in self.claimed {
            tables.active_pairs.insert(pair, request_id);
        }
    }
}

// =============================================================================
// PORT IMPLEMENTATION
// =============================================================================

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn insert_user(&self, mut user: User, deadline: Deadline) -> Result<(), StoreError> {
        self.enter(deadline).await?;
        let mut tables = self.tables.write();

        user.email = normalize_email(&user.email);
        if tables.emails.contains_key(&user.email) {
            return Err(StoreError::UniqueViolation { index: EMAIL_INDEX });
        }
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::Constraint(format!("duplicate user id {}", user.id)));
        }

        let seq = tables.next_seq();
        tables.emails.insert(user.email.clone(), user.id);
        debug!(user_id = %user.id, role = %user.role, "user inserted");
        tables.users.insert(user.id, Row { seq, entity: user });
        Ok(())
    }

    async fn get_user(&self, id: UserId, deadline: Deadline) -> Result<Option<User>, StoreError> {
        self.enter(deadline).await?;
        Ok(self.tables.read().users.get(&id).map(|row| row.entity.clone()))
    }

    async fn find_user_by_email(
        &self,
        email: &str,
        deadline: Deadline,
    ) -> Result<Option<User>, StoreError> {
        self.enter(deadline).await?;
        let tables = self.tables.read();
        Ok(tables
            .emails
            .get(&normalize_email(email))
            .and_then(|id| tables.users.get(id))
            .map(|row| row.entity.clone()))
    }

    async fn insert_donation(
        &self,
        donation: Donation,
        deadline: Deadline,
    ) -> Result<(), StoreError> {
        self.enter(deadline).await?;
        let mut tables = self.tables.write();

        if tables.donations.contains_key(&donation.id) {
            return Err(StoreError::Constraint(format!(
                "duplicate donation id {}",
                donation.id
            )));
        }
        if donation.quantity == 0 {
            return Err(StoreError::Constraint("donation quantity must be >= 1".into()));
        }

        let seq = tables.next_seq();
        if let Some(point) = donation.location {
            tables.donation_geo.insert(donation.id, point);
        }
        tables.donations.insert(
            donation.id,
            Row {
                seq,
                entity: donation,
            },
        );
        Ok(())
    }

    async fn get_donation(
        &self,
        id: DonationId,
        deadline: Deadline,
    ) -> Result<Option<Donation>, StoreError> {
        self.enter(deadline).await?;
        Ok(self
            .tables
            .read()
            .donations
            .get(&id)
            .map(|row| row.entity.clone()))
    }

    async fn query_donations(
        &self,
        query: &DonationQuery,
        deadline: Deadline,
    ) -> Result<Vec<Donation>, StoreError> {
        self.enter(deadline).await?;
        let tables = self.tables.read();
        let rows: Vec<_> = tables
            .donations
            .values()
            .filter(|row| query.matches(&row.entity))
            .collect();
        Ok(newest_first(rows, |d| d.created_at))
    }

    async fn donations_within(
        &self,
        center: GeoPoint,
        radius_meters: f64,
        status: Option<DonationStatus>,
        deadline: Deadline,
    ) -> Result<Vec<NearbyDonation>, StoreError> {
        self.enter(deadline).await?;
        let tables = self.tables.read();
        Ok(tables
            .donation_geo
            .within(&center, radius_meters)
            .into_iter()
            .filter_map(|(id, distance_meters)| {
                let donation = &tables.donations.get(&id)?.entity;
                if status.map_or(true, |s| donation.status == s) {
                    Some(NearbyDonation {
                        donation: donation.clone(),
                        distance_meters,
                    })
                } else {
                    None
                }
            })
            .collect())
    }

    async fn insert_request(
        &self,
        request: VolunteerRequest,
        deadline: Deadline,
    ) -> Result<(), StoreError> {
        self.enter(deadline).await?;
        let mut tables = self.tables.write();

        if !tables.donations.contains_key(&request.donation) {
            return Err(not_found(EntityKind::Donation, request.donation));
        }
        if tables.requests.contains_key(&request.id) {
            return Err(StoreError::Constraint(format!(
                "duplicate request id {}",
                request.id
            )));
        }

        let pair = (request.donation, request.volunteer);
        if request.status.is_active() {
            if tables.active_pairs.contains_key(&pair) {
                return Err(StoreError::UniqueViolation {
                    index: ACTIVE_REQUEST_INDEX,
                });
            }
            tables.active_pairs.insert(pair, request.id);
        }

        let seq = tables.next_seq();
        tables.requests.insert(
            request.id,
            Row {
                seq,
                entity: request,
            },
        );
        Ok(())
    }

    async fn get_request(
        &self,
        id: RequestId,
        deadline: Deadline,
    ) -> Result<Option<VolunteerRequest>, StoreError> {
        self.enter(deadline).await?;
        Ok(self
            .tables
            .read()
            .requests
            .get(&id)
            .map(|row| row.entity.clone()))
    }

    async fn query_requests(
        &self,
        query: &RequestQuery,
        deadline: Deadline,
    ) -> Result<Vec<VolunteerRequest>, StoreError> {
        self.enter(deadline).await?;
        let tables = self.tables.read();
        let rows: Vec<_> = tables
            .requests
            .values()
            .filter(|row| query.matches(&row.entity))
            .collect();
        Ok(newest_first(rows, |r| r.created_at))
    }

    async fn commit(&self, batch: WriteBatch, deadline: Deadline) -> Result<(), StoreError> {
        self.enter(deadline).await?;
        if batch.is_empty() {
            return Ok(());
        }

        let total = batch.len();
        let abort_at = self.faults.take_commit_abort();
        let mut tables = self.tables.write();
        let mut staging = Staging::default();

        for (index, op) in batch.into_ops().into_iter().enumerate() {
            if abort_at == Some(index) {
                return Err(StoreError::Unavailable(format!(
                    "injected failure after {index} of {total} ops"
                )));
            }
            staging.stage(&tables, op)?;
        }
        if abort_at == Some(total) {
            return Err(StoreError::Unavailable(format!(
                "injected failure after {total} of {total} ops"
            )));
        }

        staging.publish(&mut tables);
        debug!(ops = total, "batch committed");
        Ok(())
    }
}
