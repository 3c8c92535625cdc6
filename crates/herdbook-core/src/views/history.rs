//! Sales and death history.

use serde::Serialize;

use super::{group_by_year, YearGroup};
use crate::models::{AnimalRef, AnimalStatus, CalfStatus};
use crate::state::Snapshot;

/// A sold calf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub calf_id: String,
    pub dib: String,
    pub sale_date: String,
    pub destination: String,
    /// DIB of the mother, if she is still on record
    pub mother_dib: Option<String>,
}

/// A dead cow, calf or bull.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeathRecord {
    pub animal: AnimalRef,
    pub label: String,
    pub death_date: String,
}

/// Sold calves with sale info, grouped by year of sale.
pub fn sales_history(snapshot: &Snapshot) -> Vec<YearGroup<SaleRecord>> {
    let relations = snapshot.relations();
    let sales = snapshot
        .calves
        .iter()
        .filter(|calf| calf.status == CalfStatus::Sold)
        .filter_map(|calf| {
            let sale = calf.sale.as_ref()?;
            let record = SaleRecord {
                calf_id: calf.id.clone(),
                dib: calf.dib.clone(),
                sale_date: sale.date.clone(),
                destination: sale.destination.clone(),
                mother_dib: relations.mother_of(calf).map(|cow| cow.dib.clone()),
            };
            Some((sale.date.clone(), record))
        })
        .collect();
    group_by_year(sales)
}

/// Dead animals with a death date, grouped by year of death.
pub fn death_history(snapshot: &Snapshot) -> Vec<YearGroup<DeathRecord>> {
    let cows = snapshot
        .cows
        .iter()
        .filter(|cow| cow.status == AnimalStatus::Dead)
        .filter_map(|cow| death(AnimalRef::Cow(cow.id.clone()), cow.display_name(), &cow.death_date));
    let calves = snapshot
        .calves
        .iter()
        .filter(|calf| calf.status == CalfStatus::Dead)
        .filter_map(|calf| {
            death(AnimalRef::Calf(calf.id.clone()), calf.display_name(), &calf.death_date)
        });
    let bulls = snapshot
        .bulls
        .iter()
        .filter(|bull| bull.status == AnimalStatus::Dead)
        .filter_map(|bull| death(AnimalRef::Bull(bull.id.clone()), bull.display_name(), &bull.death_date));

    group_by_year(cows.chain(calves).chain(bulls).collect())
}

fn death(
    animal: AnimalRef,
    label: String,
    death_date: &Option<String>,
) -> Option<(String, DeathRecord)> {
    let death_date = death_date.clone()?;
    Some((
        death_date.clone(),
        DeathRecord {
            animal,
            label,
            death_date,
        },
    ))
}
