//! Lifecycle manager: every legal state change of herd records.
//!
//! Cows and bulls move between `Alive`, `Dead` and `Sold`, and into the
//! trash. Calves additionally leave the calf collection through the breeding
//! promotion, which turns them into a cow or a bull. Plain create/update of
//! every record type also runs through here so the same field checks apply
//! everywhere.

mod bulk;
mod promotion;
mod records;
mod status;
mod validate;

pub use promotion::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::{Database, Trashable};
use crate::error::{fetch, fetch_active, HerdError, HerdResult};
use crate::models::{AnimalStatus, Bull, Calf, Cow, EntityRef, Location, SaleInfo};

use validate::{require_date, require_sale};

/// Extra fields a status change may need: a death date for `Dead`, sale
/// info for `Sold`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDetails {
    pub death_date: Option<String>,
    pub sale: Option<SaleInfo>,
}

impl StatusDetails {
    pub fn died(date: impl Into<String>) -> Self {
        Self {
            death_date: Some(date.into()),
            sale: None,
        }
    }

    pub fn sold(sale: SaleInfo) -> Self {
        Self {
            death_date: None,
            sale: Some(sale),
        }
    }

    /// The death date and sale info a record carries once it has `status`.
    /// Fields that do not belong to the status are cleared.
    pub(crate) fn settle(
        &self,
        status: AnimalStatus,
    ) -> HerdResult<(Option<String>, Option<SaleInfo>)> {
        match status {
            AnimalStatus::Alive => Ok((None, None)),
            AnimalStatus::Dead => {
                let date = self
                    .death_date
                    .as_deref()
                    .ok_or_else(|| HerdError::validation("death date is required"))?;
                require_date("death date", date)?;
                Ok((Some(date.to_string()), None))
            }
            AnimalStatus::Sold => Ok((None, Some(require_sale(self.sale.as_ref())?))),
            AnimalStatus::Deleted => Err(HerdError::validation(
                "records enter the trash through soft-delete",
            )),
        }
    }
}

/// Applies lifecycle transitions against the store.
pub struct LifecycleManager<'a> {
    db: &'a Database,
}

impl<'a> LifecycleManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn delete_cow(&self, id: &str) -> HerdResult<()> {
        self.soft_delete::<Cow>(id)
    }

    pub fn delete_calf(&self, id: &str) -> HerdResult<()> {
        self.soft_delete::<Calf>(id)
    }

    pub fn delete_bull(&self, id: &str) -> HerdResult<()> {
        self.soft_delete::<Bull>(id)
    }

    pub fn delete_location(&self, id: &str) -> HerdResult<()> {
        self.soft_delete::<Location>(id)
    }

    /// Move a record into the trash. The record keeps every other field so
    /// a restore brings it back unchanged.
    fn soft_delete<R: Trashable>(&self, id: &str) -> HerdResult<()> {
        let mut record = fetch::<R>(self.db, id)?;
        if record.in_trash() {
            debug!(kind = R::NAME, id, "already in trash");
            return Ok(());
        }

        record.set_in_trash(true);
        self.db.update(&record)?;
        info!(kind = R::NAME, id, "moved to trash");
        Ok(())
    }

    /// A location that exists and is not in the trash.
    fn active_location(&self, id: &str) -> HerdResult<Location> {
        fetch_active(self.db, id)
    }

    /// A bull that exists and is not in the trash.
    fn active_bull(&self, id: &str) -> HerdResult<Bull> {
        fetch_active(self.db, id)
    }
}

/// Trashed records are frozen until restored.
pub(crate) fn ensure_active<R: Trashable>(record: &R) -> HerdResult<()> {
    if record.in_trash() {
        return Err(HerdError::invalid_transition(
            EntityRef::new(R::KIND, record.id()),
            "record is in the trash, restore it first",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Record;

    pub(super) fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert(&Bull {
            id: "bull-1".into(),
            ..Bull::new("Ferdinand")
        })
        .unwrap();
        db.insert(&Location {
            id: "loc-1".into(),
            ..Location::new("Paddock A", "bull-1")
        })
        .unwrap();
        db.insert(&Location {
            id: "loc-2".into(),
            ..Location::new("Paddock B", "bull-1")
        })
        .unwrap();
        db.insert(&Cow {
            id: "cow-1".into(),
            ..Cow::new("1111", "2020-03-01", "loc-1")
        })
        .unwrap();
        db
    }

    #[test]
    fn test_settle_clears_foreign_fields() {
        let details = StatusDetails {
            death_date: Some("2024-01-01".into()),
            sale: Some(SaleInfo::new("2024-02-01", "Finca X")),
        };

        assert_eq!(details.settle(AnimalStatus::Alive).unwrap(), (None, None));
        let (death, sale) = details.settle(AnimalStatus::Dead).unwrap();
        assert_eq!(death.as_deref(), Some("2024-01-01"));
        assert!(sale.is_none());
        let (death, sale) = details.settle(AnimalStatus::Sold).unwrap();
        assert!(death.is_none());
        assert_eq!(sale.unwrap().destination, "Finca X");
    }

    #[test]
    fn test_settle_requires_fields() {
        let empty = StatusDetails::default();
        assert!(matches!(
            empty.settle(AnimalStatus::Dead),
            Err(HerdError::Validation(_))
        ));
        assert!(matches!(
            empty.settle(AnimalStatus::Sold),
            Err(HerdError::Validation(_))
        ));
    }

    #[test]
    fn test_soft_delete_keeps_record() {
        let db = setup_db();
        let lifecycle = LifecycleManager::new(&db);

        lifecycle.delete_cow("cow-1").unwrap();
        let cow = db.get::<Cow>("cow-1").unwrap().unwrap();
        assert_eq!(cow.status, AnimalStatus::Deleted);
        assert_eq!(cow.dib, "1111");

        // second delete is a no-op
        lifecycle.delete_cow("cow-1").unwrap();
        assert_eq!(db.count::<Cow>().unwrap(), 1);
    }

    #[test]
    fn test_delete_location_sets_flag() {
        let db = setup_db();
        LifecycleManager::new(&db).delete_location("loc-2").unwrap();

        let location = db.get::<Location>("loc-2").unwrap().unwrap();
        assert!(location.is_deleted);
        assert!(location.in_trash());
        assert_eq!(location.id(), "loc-2");
    }

    #[test]
    fn test_delete_missing() {
        let db = setup_db();
        let err = LifecycleManager::new(&db).delete_bull("bull-9").unwrap_err();
        assert!(matches!(err, HerdError::NotFound { kind: "bull", .. }));
    }
}
