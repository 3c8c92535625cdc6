//! Trash manager: listing, restoring and purging soft-deleted records.
//!
//! A record moves `Active → InTrash` through the lifecycle manager, then
//! either back to `Active` (restore) or to `Gone` (purge). Purge is the only
//! irreversible operation in the crate. It is refused while a record outside
//! the trash depends on the target:
//!
//! | purged   | blocked by                                   |
//! |----------|----------------------------------------------|
//! | calf     | nothing                                      |
//! | cow      | a calf not in the trash with this mother     |
//! | location | a cow not in the trash kept there            |
//! | bull     | a location not in the trash assigned to it   |
//!
//! Nothing else is checked. Trashed dependents, calves' `father_id` and
//! treatments keep pointing at purged records.

use tracing::{info, warn};

use crate::batch::BatchReport;
use crate::db::{Database, Trashable};
use crate::error::{fetch, HerdError, HerdResult};
use crate::models::{Bull, Calf, Cow, EntityKind, EntityRef, Location, TrashItem};

/// Dependents first, so one batch can purge a calf together with its mother
/// or a cow together with her location.
const PURGE_ORDER: [EntityKind; 4] = [
    EntityKind::Calf,
    EntityKind::Cow,
    EntityKind::Location,
    EntityKind::Bull,
];

pub struct TrashManager<'a> {
    db: &'a Database,
}

impl<'a> TrashManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Everything currently in the trash: cows, calves, bulls, then locations.
    pub fn list(&self) -> HerdResult<Vec<TrashItem>> {
        let mut items = Vec::new();
        collect_trashed::<Cow>(self.db, &mut items)?;
        collect_trashed::<Calf>(self.db, &mut items)?;
        collect_trashed::<Bull>(self.db, &mut items)?;
        collect_trashed::<Location>(self.db, &mut items)?;
        Ok(items)
    }

    /// Bring records back out of the trash. Animals come back alive.
    pub fn restore(&self, items: &[EntityRef]) -> BatchReport {
        let mut report = BatchReport::default();
        for item in items {
            let outcome = match item {
                EntityRef::Cow(id) => self.restore_one::<Cow>(id),
                EntityRef::Calf(id) => self.restore_one::<Calf>(id),
                EntityRef::Bull(id) => self.restore_one::<Bull>(id),
                EntityRef::Location(id) => self.restore_one::<Location>(id),
            };
            report.record(item.clone(), outcome);
        }
        report
    }

    fn restore_one<R: Trashable>(&self, id: &str) -> HerdResult<()> {
        let mut record = fetch::<R>(self.db, id)?;
        if !record.in_trash() {
            return Err(HerdError::invalid_transition(
                EntityRef::new(R::KIND, id),
                "record is not in the trash",
            ));
        }

        record.set_in_trash(false);
        self.db.update(&record)?;
        info!(kind = R::NAME, id, "restored from trash");
        Ok(())
    }

    /// Permanently remove records from the trash.
    ///
    /// Items are grouped by kind and each group is all-or-nothing: one item
    /// that fails its checks keeps every other item of the same kind in the
    /// trash (reported as [`HerdError::PartitionAborted`]). Groups that
    /// passed stay purged.
    pub fn purge(&self, items: &[EntityRef]) -> BatchReport {
        let mut report = BatchReport::default();
        for kind in PURGE_ORDER {
            let mut ids: Vec<String> = Vec::new();
            for item in items.iter().filter(|item| item.kind() == kind) {
                if !ids.iter().any(|id| id == item.id()) {
                    ids.push(item.id().to_string());
                }
            }
            if ids.is_empty() {
                continue;
            }

            report.merge(match kind {
                EntityKind::Calf => self.purge_partition::<Calf>(&ids),
                EntityKind::Cow => self.purge_partition::<Cow>(&ids),
                EntityKind::Location => self.purge_partition::<Location>(&ids),
                EntityKind::Bull => self.purge_partition::<Bull>(&ids),
            });
        }
        report
    }

    fn purge_partition<R: Trashable>(&self, ids: &[String]) -> BatchReport {
        let checks: Vec<(String, HerdResult<()>)> = ids
            .iter()
            .map(|id| (id.clone(), self.check_purge::<R>(id)))
            .collect();

        let mut report = BatchReport::default();
        if checks.iter().any(|(_, check)| check.is_err()) {
            warn!(kind = R::NAME, items = ids.len(), "purge partition aborted");
            for (id, check) in checks {
                let entity = EntityRef::new(R::KIND, id);
                match check {
                    Ok(()) => report.fail(entity, HerdError::PartitionAborted(R::KIND)),
                    Err(error) => report.fail(entity, error),
                }
            }
            return report;
        }

        let deleted = self.db.atomically(|db| db.delete_many::<R>(ids));
        match deleted {
            Ok(count) => {
                info!(kind = R::NAME, count, "purged");
                for id in ids {
                    report.record(EntityRef::new(R::KIND, id.as_str()), Ok(()));
                }
            }
            Err(error) => {
                let mut error = Some(HerdError::from(error));
                for id in ids {
                    let entity = EntityRef::new(R::KIND, id.as_str());
                    report.fail(
                        entity,
                        error
                            .take()
                            .unwrap_or(HerdError::PartitionAborted(R::KIND)),
                    );
                }
            }
        }
        report
    }

    fn check_purge<R: Trashable>(&self, id: &str) -> HerdResult<()> {
        let record = fetch::<R>(self.db, id)?;
        let target = EntityRef::new(R::KIND, id);
        if !record.in_trash() {
            return Err(HerdError::invalid_transition(
                target,
                "only records in the trash can be purged",
            ));
        }

        if let Some(dependent) = self.first_dependent(&target)? {
            return Err(HerdError::DependencyConflict { target, dependent });
        }
        Ok(())
    }

    /// A record outside the trash that still points at `target`.
    fn first_dependent(&self, target: &EntityRef) -> HerdResult<Option<EntityRef>> {
        let dependent = match target {
            EntityRef::Calf(_) => None,
            EntityRef::Cow(id) => self
                .db
                .active_calves_of_mother(id)?
                .into_iter()
                .next()
                .map(|calf| EntityRef::Calf(calf.id)),
            EntityRef::Location(id) => self
                .db
                .active_cows_at_location(id)?
                .into_iter()
                .next()
                .map(|cow| EntityRef::Cow(cow.id)),
            EntityRef::Bull(id) => self
                .db
                .active_locations_with_bull(id)?
                .into_iter()
                .next()
                .map(|location| EntityRef::Location(location.id)),
        };
        Ok(dependent)
    }
}

fn collect_trashed<R: Trashable>(db: &Database, items: &mut Vec<TrashItem>) -> HerdResult<()> {
    for record in db.list_trashed::<R>()? {
        items.push(TrashItem {
            entity: EntityRef::new(R::KIND, record.id()),
            display_name: record.display_name(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleManager;
    use crate::models::{AnimalStatus, CalfStatus, NewCalf, Sex};

    fn setup_db() -> Database {
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
        db.insert(&Cow {
            id: "cow-1".into(),
            ..Cow::new("1111", "2020-03-01", "loc-1")
        })
        .unwrap();
        db.insert(&Calf {
            id: "calf-1".into(),
            ..NewCalf::new("1001", Sex::Female, "cow-1", "2024-01-01").into_calf("bull-1".into())
        })
        .unwrap();
        db
    }

    #[test]
    fn test_list_display_names() {
        let db = setup_db();
        let lifecycle = LifecycleManager::new(&db);
        lifecycle.delete_calf("calf-1").unwrap();
        lifecycle.delete_cow("cow-1").unwrap();
        lifecycle.delete_location("loc-1").unwrap();
        lifecycle.delete_bull("bull-1").unwrap();

        let names: Vec<String> = TrashManager::new(&db)
            .list()
            .unwrap()
            .into_iter()
            .map(|item| item.display_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Cow DIB 1111",
                "Calf DIB 1001",
                "Bull Ferdinand",
                "Location Paddock A"
            ]
        );
    }

    #[test]
    fn test_restore() {
        let db = setup_db();
        LifecycleManager::new(&db).delete_cow("cow-1").unwrap();
        let trash = TrashManager::new(&db);

        let report = trash.restore(&[
            EntityRef::Cow("cow-1".into()),
            EntityRef::Calf("calf-1".into()),
            EntityRef::Bull("bull-404".into()),
        ]);

        assert_eq!(report.succeeded, vec![EntityRef::Cow("cow-1".into())]);
        assert!(matches!(
            report.failures[0].error,
            HerdError::InvalidTransition { .. }
        ));
        assert!(matches!(report.failures[1].error, HerdError::NotFound { .. }));
        assert_eq!(
            db.get::<Cow>("cow-1").unwrap().unwrap().status,
            AnimalStatus::Alive
        );
        assert!(trash.list().unwrap().is_empty());
    }

    #[test]
    fn test_purge_requires_trash() {
        let db = setup_db();
        let report = TrashManager::new(&db).purge(&[EntityRef::Calf("calf-1".into())]);

        assert!(matches!(
            report.failures[0].error,
            HerdError::InvalidTransition { .. }
        ));
        assert!(db.get::<Calf>("calf-1").unwrap().is_some());
    }

    #[test]
    fn test_purge_location_blocked_by_cow() {
        let db = setup_db();
        let lifecycle = LifecycleManager::new(&db);
        lifecycle.delete_location("loc-1").unwrap();
        let trash = TrashManager::new(&db);

        let report = trash.purge(&[EntityRef::Location("loc-1".into())]);
        match &report.failures[0].error {
            HerdError::DependencyConflict { target, dependent } => {
                assert_eq!(*target, EntityRef::Location("loc-1".into()));
                assert_eq!(*dependent, EntityRef::Cow("cow-1".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(trash.list().unwrap().len(), 1);

        // once the cow is gone too, both go in one batch
        lifecycle.delete_calf("calf-1").unwrap();
        lifecycle.delete_cow("cow-1").unwrap();
        let report = trash.purge(&[
            EntityRef::Location("loc-1".into()),
            EntityRef::Cow("cow-1".into()),
            EntityRef::Calf("calf-1".into()),
        ]);
        assert!(report.is_success(), "{:?}", report.summary());
        assert!(db.get::<Location>("loc-1").unwrap().is_none());
        assert!(db.get::<Cow>("cow-1").unwrap().is_none());
        assert!(trash.list().unwrap().is_empty());
    }

    #[test]
    fn test_purge_bull_blocked_by_location() {
        let db = setup_db();
        LifecycleManager::new(&db).delete_bull("bull-1").unwrap();

        let report = TrashManager::new(&db).purge(&[EntityRef::Bull("bull-1".into())]);
        assert!(matches!(
            report.failures[0].error,
            HerdError::DependencyConflict { .. }
        ));
        assert!(db.get::<Bull>("bull-1").unwrap().is_some());
    }

    #[test]
    fn test_purge_cow_blocked_by_calf() {
        let db = setup_db();
        LifecycleManager::new(&db).delete_cow("cow-1").unwrap();

        let report = TrashManager::new(&db).purge(&[EntityRef::Cow("cow-1".into())]);
        match &report.failures[0].error {
            HerdError::DependencyConflict { dependent, .. } => {
                assert_eq!(*dependent, EntityRef::Calf("calf-1".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failing_item_aborts_its_partition_only() {
        let db = setup_db();
        let lifecycle = LifecycleManager::new(&db);
        db.insert(&Cow {
            id: "cow-2".into(),
            ..Cow::new("2222", "2021-01-01", "loc-1")
        })
        .unwrap();
        lifecycle.delete_cow("cow-1").unwrap();
        lifecycle.delete_cow("cow-2").unwrap();
        lifecycle.delete_calf("calf-1").unwrap();

        let calf = db.get::<Calf>("calf-1").unwrap().unwrap();
        db.insert(&Calf {
            id: "calf-2".into(),
            mother_id: "cow-1".into(),
            status: CalfStatus::Alive,
            ..calf
        })
        .unwrap();

        let report = TrashManager::new(&db).purge(&[
            EntityRef::Cow("cow-1".into()),
            EntityRef::Cow("cow-2".into()),
            EntityRef::Calf("calf-1".into()),
        ]);

        assert_eq!(report.succeeded, vec![EntityRef::Calf("calf-1".into())]);
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(
            report.failures[0].error,
            HerdError::DependencyConflict { .. }
        ));
        assert!(matches!(
            report.failures[1].error,
            HerdError::PartitionAborted(EntityKind::Cow)
        ));
        assert!(db.get::<Cow>("cow-2").unwrap().is_some());
        assert!(db.get::<Calf>("calf-1").unwrap().is_none());
    }

    #[test]
    fn test_purge_leaves_treatments() {
        use crate::models::{AnimalRef, Treatment};

        let db = setup_db();
        db.insert(&Treatment::new(
            AnimalRef::Calf("calf-1".into()),
            "Vitamin B",
            "5 ml",
            "2024-01-05",
        ))
        .unwrap();
        LifecycleManager::new(&db).delete_calf("calf-1").unwrap();

        let report = TrashManager::new(&db).purge(&[EntityRef::Calf("calf-1".into())]);
        assert!(report.is_success());
        assert_eq!(db.count::<Treatment>().unwrap(), 1);
    }
}
