//! Infirmary and location views.

use serde::Serialize;

use crate::models::{AnimalRef, Treatment};
use crate::state::Snapshot;

/// Follow-up doses due on or before `today` (`YYYY-MM-DD`), earliest first.
pub fn due_treatments<'a>(snapshot: &'a Snapshot, today: &str) -> Vec<&'a Treatment> {
    let mut due: Vec<&Treatment> = snapshot
        .treatments
        .iter()
        .filter(|t| t.is_due(today))
        .collect();
    due.sort_by(|a, b| a.repeat_date.cmp(&b.repeat_date));
    due
}

/// Treatments whose animal is no longer on record, e.g. after a purge or a
/// calf promotion.
pub fn orphaned_treatments(snapshot: &Snapshot) -> Vec<&Treatment> {
    snapshot
        .treatments
        .iter()
        .filter(|t| !t.is_deleted)
        .filter(|t| match &t.animal {
            AnimalRef::Cow(id) => snapshot.cow(id).is_none(),
            AnimalRef::Calf(id) => snapshot.calf(id).is_none(),
            AnimalRef::Bull(id) => snapshot.bull(id).is_none(),
        })
        .collect()
}

/// One row of the locations screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub location_id: String,
    pub name: String,
    /// Name of the assigned bull, if that bull is still on record
    pub bull_name: Option<String>,
    /// Cows kept here that are not in the trash
    pub cow_count: usize,
}

pub fn location_overview(snapshot: &Snapshot) -> Vec<LocationSummary> {
    let relations = snapshot.relations();
    snapshot
        .locations
        .iter()
        .filter(|location| !location.is_deleted)
        .map(|location| LocationSummary {
            location_id: location.id.clone(),
            name: location.name.clone(),
            bull_name: relations.bull_of(location).map(|bull| bull.name.clone()),
            cow_count: snapshot
                .cows
                .iter()
                .filter(|cow| cow.location_id == location.id && !cow.is_deleted())
                .count(),
        })
        .collect()
}
