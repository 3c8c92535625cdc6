//! Demo herd loaded into an empty store on first open.

use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use super::{Database, DbResult};
use crate::models::{AnimalRef, Bull, Calf, CalfStatus, Cow, Location, SaleInfo, Sex, Treatment};

/// Seed the demo herd if the cow collection is empty.
///
/// Returns true if data was written.
pub fn seed_demo_data(db: &Database) -> DbResult<bool> {
    if db.count::<Cow>()? > 0 {
        return Ok(false);
    }

    let today = Utc::now().date_naive();
    let (bulls, locations) = (demo_bulls(), demo_locations());
    let (cows, calves, treatments) = (demo_cows(today), demo_calves(today), demo_treatments(today));
    db.atomically(|db| {
        db.insert_many(&bulls)?;
        db.insert_many(&locations)?;
        db.insert_many(&cows)?;
        db.insert_many(&calves)?;
        db.insert_many(&treatments)
    })?;

    info!(
        bulls = bulls.len(),
        locations = locations.len(),
        cows = cows.len(),
        calves = calves.len(),
        treatments = treatments.len(),
        "seeded demo herd"
    );
    Ok(true)
}

fn days_ago(today: NaiveDate, days: i64) -> String {
    (today - Duration::days(days)).format("%Y-%m-%d").to_string()
}

fn bull(id: &str, name: &str) -> Bull {
    Bull {
        id: id.into(),
        ..Bull::new(name)
    }
}

fn demo_bulls() -> Vec<Bull> {
    vec![bull("bull-1", "Ferdinand"), bull("bull-2", "Taurus")]
}

fn demo_locations() -> Vec<Location> {
    [
        ("loc-1", "Paddock A", "bull-1"),
        ("loc-2", "Stable 7", "bull-2"),
        ("loc-3", "West Field", "bull-1"),
    ]
    .into_iter()
    .map(|(id, name, bull_id)| Location {
        id: id.into(),
        ..Location::new(name, bull_id)
    })
    .collect()
}

fn demo_cows(today: NaiveDate) -> Vec<Cow> {
    [
        ("cow-1", "1111", 1095, "loc-1"),
        ("cow-2", "2222", 1460, "loc-2"),
        ("cow-3", "3333", 730, "loc-1"),
    ]
    .into_iter()
    .map(|(id, dib, age_days, location_id)| Cow {
        id: id.into(),
        ..Cow::new(dib, days_ago(today, age_days), location_id)
    })
    .collect()
}

fn demo_calves(today: NaiveDate) -> Vec<Calf> {
    let calf = |id: &str, dib: &str, sex: Sex, mother: &str, father: &str, age_days: i64| Calf {
        id: id.into(),
        dib: dib.into(),
        sex,
        mother_id: mother.into(),
        father_id: father.into(),
        birth_date: days_ago(today, age_days),
        status: CalfStatus::Alive,
        death_date: None,
        sale: None,
        notes: None,
    };

    let mut sold = calf("calf-5", "3002", Sex::Female, "cow-3", "bull-1", 150);
    sold.status = CalfStatus::Sold;
    sold.sale = Some(SaleInfo::new(days_ago(today, 20), "Finca Vecina"));

    let mut dead = calf("calf-6", "2002", Sex::Male, "cow-2", "bull-2", 200);
    dead.status = CalfStatus::Dead;
    dead.death_date = Some(days_ago(today, 180));

    vec![
        calf("calf-1", "1001", Sex::Female, "cow-1", "bull-1", 30),
        calf("calf-2", "1002", Sex::Male, "cow-1", "bull-1", 45),
        calf("calf-3", "2001", Sex::Male, "cow-2", "bull-2", 90),
        calf("calf-4", "3001", Sex::Female, "cow-3", "bull-1", 120),
        sold,
        dead,
    ]
}

fn demo_treatments(today: NaiveDate) -> Vec<Treatment> {
    let in_days = |days: i64| days_ago(today, -days);

    vec![
        Treatment {
            id: "treat-1".into(),
            ..Treatment::new(AnimalRef::Cow("cow-1".into()), "Vaccine A", "10ml", days_ago(today, 10))
                .with_repeat(days_ago(today, 1))
        },
        Treatment {
            id: "treat-2".into(),
            ..Treatment::new(AnimalRef::Calf("calf-2".into()), "Dewormer", "5ml", days_ago(today, 15))
                .with_repeat(in_days(15))
        },
        Treatment {
            id: "treat-3".into(),
            ..Treatment::new(AnimalRef::Bull("bull-1".into()), "Antibiotic", "20ml", days_ago(today, 5))
        },
        Treatment {
            id: "treat-4".into(),
            ..Treatment::new(AnimalRef::Calf("calf-1".into()), "Vaccine B", "2ml", days_ago(today, 5))
                .with_repeat(in_days(0))
        },
    ]
}
