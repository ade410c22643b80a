//! Startup identities.

use crate::config::SeedConfig;
use dh_01_entity_store::{EntityStore, StoreError};
use shared_types::{Clock, Deadline, User, UserId};
use tracing::{debug, info};

/// Insert configured users that do not exist yet and return the bearer
/// token bindings for every seeded user that has one.
///
/// Existing accounts are matched by email and left untouched, so restarts
/// against a persistent store keep user ids stable.
pub async fn seed_users(
    store: &dyn EntityStore,
    seed: &SeedConfig,
    clock: &dyn Clock,
    deadline: Deadline,
) -> Result<Vec<(String, UserId)>, StoreError> {
    let mut bindings = Vec::new();
    let mut created = 0usize;

    for entry in &seed.users {
        let id = match store.find_user_by_email(&entry.email, deadline).await? {
            Some(existing) => {
                debug!(email = %existing.email, user_id = %existing.id, "seed user exists");
                existing.id
            }
            None => {
                let user = User::new(&entry.email, entry.display_name.clone(), entry.role, clock.now());
                let id = user.id;
                store.insert_user(user, deadline).await?;
                created += 1;
                id
            }
        };
        if let Some(token) = &entry.token {
            bindings.push((token.clone(), id));
        }
    }

    info!(
        configured = seed.users.len(),
        created,
        tokens = bindings.len(),
        "seeded users"
    );
    Ok(bindings)
}
