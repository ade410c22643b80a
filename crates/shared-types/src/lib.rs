//! # Shared Types Crate
//!
//! Domain entities, identifiers and the error taxonomy used by every
//! Donation Hub subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `User`, `Donation` and `VolunteerRequest`
//!   are defined once here; subsystems own behavior, not shape.
//! - **Closed vocabularies**: categories, priorities, roles and statuses are
//!   enums with a canonical lowercase wire form. Unknown strings never parse.
//! - **One error taxonomy**: every subsystem error maps onto [`ErrorKind`],
//!   which the HTTP surface turns into a status code.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | `ids` | `UserId`, `DonationId`, `RequestId` (UUID v4 newtypes) |
//! | `entities` | `User`, `Donation`, `VolunteerRequest`, enums |
//! | `geo` | `GeoPoint` with GeoJSON wire form |
//! | `errors` | `ErrorKind`, `ParseEnumError`, `GeoError` |
//! | `time` | `Clock`, `SystemClock`, `ManualClock`, `Deadline` |

#[macro_use]
mod macros;

pub mod entities;
pub mod errors;
pub mod geo;
pub mod ids;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use geo::GeoPoint;
pub use ids::{DonationId, RequestId, UserId};
pub use time::{Clock, Deadline, ManualClock, SystemClock};
