//! Application state coordinator.
//!
//! [`HerdState`] owns the store and the latest [`Snapshot`] of every
//! collection. Commands run through the lifecycle and trash managers; after
//! each write the snapshot is reloaded once and handed to every observer.

use serde::Serialize;
use tracing::debug;

use crate::batch::BatchReport;
use crate::config::HerdConfig;
use crate::db::{seed_demo_data, Database, DbResult};
use crate::error::HerdResult;
use crate::lifecycle::{LifecycleManager, Promotion, StatusDetails};
use crate::models::{
    AnimalRef, AnimalStatus, Bull, Calf, Cow, EntityRef, Location, NewCalf, Treatment, TrashItem,
};
use crate::resolver::Relations;
use crate::trash::TrashManager;

/// Every collection as last read from the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub bulls: Vec<Bull>,
    pub locations: Vec<Location>,
    pub cows: Vec<Cow>,
    pub calves: Vec<Calf>,
    pub treatments: Vec<Treatment>,
}

impl Snapshot {
    pub fn load(db: &Database) -> DbResult<Self> {
        Ok(Self {
            bulls: db.list()?,
            locations: db.list()?,
            cows: db.list()?,
            calves: db.list()?,
            treatments: db.list()?,
        })
    }

    pub fn cow(&self, id: &str) -> Option<&Cow> {
        self.cows.iter().find(|c| c.id == id)
    }

    pub fn calf(&self, id: &str) -> Option<&Calf> {
        self.calves.iter().find(|c| c.id == id)
    }

    pub fn bull(&self, id: &str) -> Option<&Bull> {
        self.bulls.iter().find(|b| b.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn treatment(&self, id: &str) -> Option<&Treatment> {
        self.treatments.iter().find(|t| t.id == id)
    }

    pub fn relations(&self) -> Relations<'_> {
        Relations::new(self)
    }
}

/// Handle returned by [`HerdState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&Snapshot) + Send>;

pub struct HerdState {
    db: Database,
    snapshot: Snapshot,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl HerdState {
    /// Open the configured store, seeding the demo herd if asked to and
    /// the herd is empty.
    pub fn open(config: &HerdConfig) -> HerdResult<Self> {
        let db = match &config.database_path {
            Some(path) => {
                debug!(path = %path.display(), "opening herd database");
                Database::open(path)?
            }
            None => {
                debug!("opening in-memory herd database");
                Database::open_in_memory()?
            }
        };
        if config.seed_demo_data {
            seed_demo_data(&db)?;
        }
        Self::with_database(db)
    }

    pub fn open_in_memory() -> HerdResult<Self> {
        Self::open(&HerdConfig::in_memory())
    }

    pub fn with_database(db: Database) -> HerdResult<Self> {
        let snapshot = Snapshot::load(&db)?;
        Ok(Self {
            db,
            snapshot,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Call `observer` with the fresh snapshot after every write.
    pub fn subscribe(&mut self, observer: impl Fn(&Snapshot) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn refresh(&mut self) -> HerdResult<()> {
        self.snapshot = Snapshot::load(&self.db)?;
        debug!(
            cows = self.snapshot.cows.len(),
            calves = self.snapshot.calves.len(),
            bulls = self.snapshot.bulls.len(),
            observers = self.observers.len(),
            "snapshot refreshed"
        );
        for (_, observer) in &self.observers {
            observer(&self.snapshot);
        }
        Ok(())
    }

    fn lifecycle<T>(
        &mut self,
        op: impl FnOnce(&LifecycleManager<'_>) -> HerdResult<T>,
    ) -> HerdResult<T> {
        let value = op(&LifecycleManager::new(&self.db))?;
        self.refresh()?;
        Ok(value)
    }

    fn trash_batch(&mut self, op: impl FnOnce(&TrashManager<'_>) -> BatchReport) -> HerdResult<BatchReport> {
        let report = op(&TrashManager::new(&self.db));
        self.refresh()?;
        Ok(report)
    }

    // Lifecycle commands

    pub fn set_animal_status(
        &mut self,
        animal: &AnimalRef,
        status: AnimalStatus,
        details: StatusDetails,
    ) -> HerdResult<()> {
        self.lifecycle(|l| l.set_animal_status(animal, status, details))
    }

    pub fn promote_calf(
        &mut self,
        calf_id: &str,
        destination_location_id: Option<&str>,
    ) -> HerdResult<Promotion> {
        self.lifecycle(|l| l.promote_calf(calf_id, destination_location_id))
    }

    pub fn batch_sell_calves(
        &mut self,
        calf_ids: &[String],
        destination: &str,
        date: &str,
    ) -> HerdResult<BatchReport> {
        self.lifecycle(|l| l.batch_sell_calves(calf_ids, destination, date))
    }

    pub fn batch_update_cow_locations(
        &mut self,
        cow_ids: &[String],
        location_id: &str,
    ) -> HerdResult<BatchReport> {
        self.lifecycle(|l| l.batch_update_cow_locations(cow_ids, location_id))
    }

    pub fn delete_cow(&mut self, id: &str) -> HerdResult<()> {
        self.lifecycle(|l| l.delete_cow(id))
    }

    pub fn delete_calf(&mut self, id: &str) -> HerdResult<()> {
        self.lifecycle(|l| l.delete_calf(id))
    }

    pub fn delete_bull(&mut self, id: &str) -> HerdResult<()> {
        self.lifecycle(|l| l.delete_bull(id))
    }

    pub fn delete_location(&mut self, id: &str) -> HerdResult<()> {
        self.lifecycle(|l| l.delete_location(id))
    }

    /// Soft-delete any trash-eligible record.
    pub fn delete(&mut self, entity: &EntityRef) -> HerdResult<()> {
        match entity {
            EntityRef::Cow(id) => self.delete_cow(id),
            EntityRef::Calf(id) => self.delete_calf(id),
            EntityRef::Bull(id) => self.delete_bull(id),
            EntityRef::Location(id) => self.delete_location(id),
        }
    }

    pub fn add_cow(&mut self, cow: Cow) -> HerdResult<Cow> {
        self.lifecycle(|l| l.add_cow(cow))
    }

    pub fn update_cow(&mut self, cow: Cow) -> HerdResult<()> {
        self.lifecycle(|l| l.update_cow(cow))
    }

    pub fn add_calf(&mut self, calf: NewCalf) -> HerdResult<Calf> {
        self.lifecycle(|l| l.add_calf(calf))
    }

    pub fn update_calf(
        &mut self,
        calf: Calf,
        destination_location_id: Option<&str>,
    ) -> HerdResult<Option<Promotion>> {
        self.lifecycle(|l| l.update_calf(calf, destination_location_id))
    }

    pub fn add_bull(&mut self, name: &str) -> HerdResult<Bull> {
        self.lifecycle(|l| l.add_bull(name))
    }

    pub fn update_bull(&mut self, bull: Bull) -> HerdResult<()> {
        self.lifecycle(|l| l.update_bull(bull))
    }

    pub fn add_location(&mut self, name: &str, assigned_bull_id: &str) -> HerdResult<Location> {
        self.lifecycle(|l| l.add_location(name, assigned_bull_id))
    }

    pub fn update_location(&mut self, location: Location) -> HerdResult<()> {
        self.lifecycle(|l| l.update_location(location))
    }

    pub fn add_treatment(&mut self, treatment: Treatment) -> HerdResult<Treatment> {
        self.lifecycle(|l| l.add_treatment(treatment))
    }

    pub fn update_treatment(&mut self, treatment: Treatment) -> HerdResult<()> {
        self.lifecycle(|l| l.update_treatment(treatment))
    }

    pub fn delete_treatment(&mut self, id: &str) -> HerdResult<()> {
        self.lifecycle(|l| l.delete_treatment(id))
    }

    // Trash commands

    pub fn trash(&self) -> HerdResult<Vec<TrashItem>> {
        TrashManager::new(&self.db).list()
    }

    pub fn restore(&mut self, items: &[EntityRef]) -> HerdResult<BatchReport> {
        self.trash_batch(|t| t.restore(items))
    }

    pub fn purge(&mut self, items: &[EntityRef]) -> HerdResult<BatchReport> {
        self.trash_batch(|t| t.purge(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_open_seeded() {
        let config = HerdConfig {
            seed_demo_data: true,
            ..HerdConfig::in_memory()
        };
        let state = HerdState::open(&config).unwrap();

        assert_eq!(state.snapshot().cows.len(), 3);
        assert!(state.snapshot().cow("cow-1").is_some());
        assert!(state.snapshot().location("loc-1").is_some());
    }

    #[test]
    fn test_open_empty() {
        let state = HerdState::open_in_memory().unwrap();
        assert_eq!(state.snapshot(), &Snapshot::default());
    }

    #[test]
    fn test_observers_see_fresh_snapshot() {
        let mut state = HerdState::open_in_memory().unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let id = state.subscribe(move |snapshot| {
            counter.store(snapshot.bulls.len(), Ordering::SeqCst);
        });

        state.add_bull("Ferdinand").unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(state.snapshot().bulls.len(), 1);

        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.add_bull("Taurus").unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_command_skips_refresh() {
        let mut state = HerdState::open_in_memory().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        state.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(state.add_bull("").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_batch_refreshes_once() {
        let mut state = HerdState::open(&HerdConfig {
            seed_demo_data: true,
            ..HerdConfig::in_memory()
        })
        .unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        state.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let ids = vec!["cow-1".to_string(), "cow-2".to_string(), "cow-404".to_string()];
        let report = state.batch_update_cow_locations(&ids, "loc-3").unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.snapshot().cow("cow-2").unwrap().location_id, "loc-3");
    }

    #[test]
    fn test_delete_and_restore_through_state() {
        let mut state = HerdState::open(&HerdConfig {
            seed_demo_data: true,
            ..HerdConfig::in_memory()
        })
        .unwrap();

        state.delete(&EntityRef::Cow("cow-3".into())).unwrap();
        assert_eq!(state.trash().unwrap().len(), 1);
        assert!(state.snapshot().cow("cow-3").unwrap().is_deleted());

        let report = state.restore(&[EntityRef::Cow("cow-3".into())]).unwrap();
        assert!(report.is_success());
        assert!(!state.snapshot().cow("cow-3").unwrap().is_deleted());
    }
}
