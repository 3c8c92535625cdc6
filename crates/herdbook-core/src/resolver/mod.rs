//! Relationship resolver.
//!
//! Two flavours of lookup live here:
//! - [`resolve_sire`] runs at calf creation against the store and blocks the
//!   creation when the chain mother → location → bull is broken or passes
//!   through the trash;
//! - [`Relations`] joins records of an in-memory [`Snapshot`](crate::state::Snapshot)
//!   for display and never fails: dangling references come back as `None`.

mod relations;

pub use relations::*;

use crate::db::Database;
use crate::error::{fetch_active, HerdError, HerdResult};
use crate::models::{Bull, Cow, Location};

/// Resolve the father of a new calf: the bull assigned to the mother's
/// current location. Trashed records along the way count as missing.
pub fn resolve_sire(db: &Database, mother_id: &str) -> HerdResult<String> {
    let mother = fetch_active::<Cow>(db, mother_id)?;
    let location = fetch_active::<Location>(db, &mother.location_id)?;

    if location.assigned_bull_id.trim().is_empty() {
        return Err(HerdError::not_found::<Bull>(&location.assigned_bull_id));
    }
    let bull = fetch_active::<Bull>(db, &location.assigned_bull_id)?;

    Ok(bull.id)
}
