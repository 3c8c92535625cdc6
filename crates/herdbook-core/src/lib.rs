//! Herdbook Core Library
//!
//! Local-first record keeping for a cattle farm: cows, calves, bulls, the
//! locations they are kept at, and the treatments they receive.
//!
//! # Architecture
//!
//! ```text
//!   caller (Rust: HerdState / foreign: HerdBook)
//!                  │
//!        ┌─────────┴──────────┐
//!        ▼                    ▼
//!  LifecycleManager      TrashManager
//!  status changes        list / restore / purge
//!  calf promotion        dependency checks
//!  batch sell / move
//!        │                    │
//!        └─────────┬──────────┘
//!                  ▼
//!        Database (SQLite, one table per record type)
//!                  │
//!                  ▼
//!        Snapshot reloaded → observers notified → views
//! ```
//!
//! # Core Principle
//!
//! **Nothing disappears by accident.** Deleting a record moves it to the
//! trash; only a purge removes it, and a purge is refused while an active
//! record still depends on its target. References held by trashed records,
//! by calves (`father_id`) and by treatments are not checked and may dangle.
//!
//! # Modules
//!
//! - [`db`]: SQLite store behind the generic [`db::Record`] trait
//! - [`models`]: Domain types (Cow, Calf, Bull, Location, Treatment, refs)
//! - [`lifecycle`]: Status transitions, promotion, create/update, batches
//! - [`trash`]: Soft-delete listing, restore and purge
//! - [`resolver`]: Sire resolution and tolerant relationship lookups
//! - [`state`]: Store + snapshot coordinator with observers
//! - [`views`]: Sales/death history, infirmary and location overview

pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod resolver;
pub mod state;
pub mod trash;
pub mod views;

// Re-export commonly used types
pub use batch::{BatchFailure, BatchReport, BatchSummary};
pub use config::HerdConfig;
pub use db::Database;
pub use error::{HerdError, HerdResult};
pub use lifecycle::{LifecycleManager, Promotion, StatusDetails};
pub use models::{
    AnimalKind, AnimalRef, AnimalStatus, Bull, Calf, CalfStatus, Cow, EntityKind, EntityRef,
    Location, NewCalf, SaleInfo, Sex, Treatment, TrashItem,
};
pub use resolver::{resolve_sire, Relations};
pub use state::{HerdState, Snapshot, SubscriptionId};
pub use trash::TrashManager;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HerdBookError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Dependency conflict: {0}")]
    DependencyConflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<HerdError> for HerdBookError {
    fn from(e: HerdError) -> Self {
        let message = e.to_string();
        match e {
            HerdError::Database(_) => HerdBookError::DatabaseError(message),
            HerdError::Config(_) => HerdBookError::InvalidInput(message),
            HerdError::Validation(_) => HerdBookError::Validation(message),
            HerdError::NotFound { .. } => HerdBookError::NotFound(message),
            HerdError::DependencyConflict { .. } => HerdBookError::DependencyConflict(message),
            HerdError::InvalidTransition { .. } | HerdError::PartitionAborted(_) => {
                HerdBookError::InvalidTransition(message)
            }
            HerdError::Batch { .. } => HerdBookError::InvalidInput(message),
        }
    }
}

impl From<models::ParseEnumError> for HerdBookError {
    fn from(e: models::ParseEnumError) -> Self {
        HerdBookError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for HerdBookError {
    fn from(e: serde_json::Error) -> Self {
        HerdBookError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for HerdBookError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HerdBookError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a herd database at the given path.
#[uniffi::export]
pub fn open_herdbook(
    path: String,
    seed_demo_data: bool,
) -> Result<Arc<HerdBook>, HerdBookError> {
    let config = HerdConfig {
        seed_demo_data,
        ..HerdConfig::at(path)
    };
    HerdBook::open(&config)
}

/// Create an in-memory herd (for testing).
#[uniffi::export]
pub fn open_herdbook_in_memory() -> Result<Arc<HerdBook>, HerdBookError> {
    HerdBook::open(&HerdConfig::in_memory())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe herd wrapper for FFI.
#[derive(uniffi::Object)]
pub struct HerdBook {
    state: Arc<Mutex<HerdState>>,
}

impl HerdBook {
    fn open(config: &HerdConfig) -> Result<Arc<Self>, HerdBookError> {
        let state = HerdState::open(config)?;
        Ok(Arc::new(HerdBook {
            state: Arc::new(Mutex::new(state)),
        }))
    }
}

#[uniffi::export]
impl HerdBook {
    // =========================================================================
    // Reads
    // =========================================================================

    pub fn list_cows(&self) -> Result<Vec<FfiCow>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(state.snapshot().cows.iter().cloned().map(Into::into).collect())
    }

    pub fn list_calves(&self) -> Result<Vec<FfiCalf>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(state.snapshot().calves.iter().cloned().map(Into::into).collect())
    }

    pub fn list_bulls(&self) -> Result<Vec<FfiBull>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(state.snapshot().bulls.iter().cloned().map(Into::into).collect())
    }

    pub fn list_locations(&self) -> Result<Vec<FfiLocation>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(state.snapshot().locations.iter().cloned().map(Into::into).collect())
    }

    pub fn list_treatments(&self) -> Result<Vec<FfiTreatment>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(state.snapshot().treatments.iter().cloned().map(Into::into).collect())
    }

    // =========================================================================
    // Cow / Bull / Location Operations
    // =========================================================================

    pub fn add_cow(
        &self,
        dib: String,
        birth_date: String,
        location_id: String,
    ) -> Result<FfiCow, HerdBookError> {
        let mut state = self.state.lock()?;
        let cow = state.add_cow(Cow::new(dib, birth_date, location_id))?;
        Ok(cow.into())
    }

    pub fn update_cow(&self, cow: FfiCow) -> Result<(), HerdBookError> {
        let mut state = self.state.lock()?;
        state.update_cow(cow.try_into()?)?;
        Ok(())
    }

    pub fn add_bull(&self, name: String) -> Result<FfiBull, HerdBookError> {
        let mut state = self.state.lock()?;
        Ok(state.add_bull(&name)?.into())
    }

    pub fn update_bull(&self, bull: FfiBull) -> Result<(), HerdBookError> {
        let mut state = self.state.lock()?;
        state.update_bull(bull.try_into()?)?;
        Ok(())
    }

    pub fn add_location(
        &self,
        name: String,
        assigned_bull_id: String,
    ) -> Result<FfiLocation, HerdBookError> {
        let mut state = self.state.lock()?;
        Ok(state.add_location(&name, &assigned_bull_id)?.into())
    }

    pub fn update_location(&self, location: FfiLocation) -> Result<(), HerdBookError> {
        let mut state = self.state.lock()?;
        state.update_location(location.into())?;
        Ok(())
    }

    /// Move cows to a location. Per-cow failures are reported, not raised.
    pub fn batch_update_cow_locations(
        &self,
        cow_ids: Vec<String>,
        location_id: String,
    ) -> Result<FfiBatchReport, HerdBookError> {
        let mut state = self.state.lock()?;
        Ok(state.batch_update_cow_locations(&cow_ids, &location_id)?.into())
    }

    // =========================================================================
    // Calf Operations
    // =========================================================================

    /// Record a calf; the father is taken from the mother's location.
    pub fn add_calf(
        &self,
        dib: String,
        sex: String,
        mother_id: String,
        birth_date: String,
        notes: Option<String>,
    ) -> Result<FfiCalf, HerdBookError> {
        let mut state = self.state.lock()?;
        let calf = NewCalf {
            notes,
            ..NewCalf::new(dib, sex.parse()?, mother_id, birth_date)
        };
        Ok(state.add_calf(calf)?.into())
    }

    /// Save a calf. A status of "breeding" promotes it and returns the new
    /// cow or bull.
    pub fn update_calf(
        &self,
        calf: FfiCalf,
        destination_location_id: Option<String>,
    ) -> Result<Option<FfiEntityRef>, HerdBookError> {
        let mut state = self.state.lock()?;
        let promotion = state.update_calf(calf.try_into()?, destination_location_id.as_deref())?;
        Ok(promotion.map(|p| p.entity().into()))
    }

    pub fn promote_calf(
        &self,
        calf_id: String,
        destination_location_id: Option<String>,
    ) -> Result<FfiEntityRef, HerdBookError> {
        let mut state = self.state.lock()?;
        let promotion = state.promote_calf(&calf_id, destination_location_id.as_deref())?;
        Ok(promotion.entity().into())
    }

    /// Sell calves to one destination. Per-calf failures are reported, not raised.
    pub fn batch_sell_calves(
        &self,
        calf_ids: Vec<String>,
        destination: String,
        date: String,
    ) -> Result<FfiBatchReport, HerdBookError> {
        let mut state = self.state.lock()?;
        Ok(state.batch_sell_calves(&calf_ids, &destination, &date)?.into())
    }

    // =========================================================================
    // Status Operations
    // =========================================================================

    /// Change the status of a cow, calf or bull ("alive", "dead", "sold",
    /// "deleted").
    pub fn set_animal_status(
        &self,
        animal_kind: String,
        animal_id: String,
        status: String,
        death_date: Option<String>,
        sale_date: Option<String>,
        sale_destination: Option<String>,
    ) -> Result<(), HerdBookError> {
        let animal = AnimalRef::new(animal_kind.parse()?, animal_id);
        let details = StatusDetails {
            death_date,
            sale: sale_from(sale_date, sale_destination),
        };
        let mut state = self.state.lock()?;
        state.set_animal_status(&animal, status.parse()?, details)?;
        Ok(())
    }

    /// Move a cow, calf, bull or location to the trash.
    pub fn delete_record(&self, entity: FfiEntityRef) -> Result<(), HerdBookError> {
        let entity = EntityRef::try_from(entity)?;
        let mut state = self.state.lock()?;
        state.delete(&entity)?;
        Ok(())
    }

    // =========================================================================
    // Trash Operations
    // =========================================================================

    pub fn list_trash(&self) -> Result<Vec<FfiTrashItem>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(state.trash()?.into_iter().map(Into::into).collect())
    }

    pub fn restore(&self, items: Vec<FfiEntityRef>) -> Result<FfiBatchReport, HerdBookError> {
        let items = entity_refs(items)?;
        let mut state = self.state.lock()?;
        Ok(state.restore(&items)?.into())
    }

    /// Permanently remove trashed records. Irreversible.
    pub fn purge(&self, items: Vec<FfiEntityRef>) -> Result<FfiBatchReport, HerdBookError> {
        let items = entity_refs(items)?;
        let mut state = self.state.lock()?;
        Ok(state.purge(&items)?.into())
    }

    // =========================================================================
    // Treatment Operations
    // =========================================================================

    pub fn add_treatment(
        &self,
        animal_kind: String,
        animal_id: String,
        treatment_type: String,
        dosage: String,
        date_applied: String,
        repeat_date: Option<String>,
    ) -> Result<FfiTreatment, HerdBookError> {
        let animal = AnimalRef::new(animal_kind.parse()?, animal_id);
        let mut treatment = Treatment::new(animal, treatment_type, dosage, date_applied);
        if let Some(date) = repeat_date {
            treatment = treatment.with_repeat(date);
        }
        let mut state = self.state.lock()?;
        Ok(state.add_treatment(treatment)?.into())
    }

    pub fn update_treatment(&self, treatment: FfiTreatment) -> Result<(), HerdBookError> {
        let mut state = self.state.lock()?;
        state.update_treatment(treatment.try_into()?)?;
        Ok(())
    }

    pub fn delete_treatment(&self, id: String) -> Result<(), HerdBookError> {
        let mut state = self.state.lock()?;
        state.delete_treatment(&id)?;
        Ok(())
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Follow-up doses due on or before `today` (YYYY-MM-DD).
    pub fn due_treatments(&self, today: String) -> Result<Vec<FfiTreatment>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(views::due_treatments(state.snapshot(), &today)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn orphaned_treatments(&self) -> Result<Vec<FfiTreatment>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(views::orphaned_treatments(state.snapshot())
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn location_overview(&self) -> Result<Vec<FfiLocationSummary>, HerdBookError> {
        let state = self.state.lock()?;
        Ok(views::location_overview(state.snapshot())
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Sales history grouped by year, as JSON.
    pub fn sales_history_json(&self) -> Result<String, HerdBookError> {
        let state = self.state.lock()?;
        Ok(serde_json::to_string(&views::sales_history(state.snapshot()))?)
    }

    /// Death history grouped by year, as JSON.
    pub fn death_history_json(&self) -> Result<String, HerdBookError> {
        let state = self.state.lock()?;
        Ok(serde_json::to_string(&views::death_history(state.snapshot()))?)
    }
}

fn sale_from(date: Option<String>, destination: Option<String>) -> Option<SaleInfo> {
    match (date, destination) {
        (Some(date), Some(destination)) => Some(SaleInfo { date, destination }),
        _ => None,
    }
}

fn sale_parts(sale: Option<SaleInfo>) -> (Option<String>, Option<String>) {
    match sale {
        Some(sale) => (Some(sale.date), Some(sale.destination)),
        None => (None, None),
    }
}

fn entity_refs(items: Vec<FfiEntityRef>) -> Result<Vec<EntityRef>, HerdBookError> {
    items.into_iter().map(EntityRef::try_from).collect()
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe cow.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCow {
    pub id: String,
    pub dib: String,
    pub birth_date: String,
    pub location_id: String,
    pub status: String,
    pub death_date: Option<String>,
    pub sale_date: Option<String>,
    pub sale_destination: Option<String>,
}

impl From<Cow> for FfiCow {
    fn from(cow: Cow) -> Self {
        let (sale_date, sale_destination) = sale_parts(cow.sale);
        Self {
            id: cow.id,
            dib: cow.dib,
            birth_date: cow.birth_date,
            location_id: cow.location_id,
            status: cow.status.to_string(),
            death_date: cow.death_date,
            sale_date,
            sale_destination,
        }
    }
}

impl TryFrom<FfiCow> for Cow {
    type Error = HerdBookError;

    fn try_from(cow: FfiCow) -> Result<Self, Self::Error> {
        Ok(Cow {
            id: cow.id,
            dib: cow.dib,
            birth_date: cow.birth_date,
            location_id: cow.location_id,
            status: cow.status.parse()?,
            death_date: cow.death_date,
            sale: sale_from(cow.sale_date, cow.sale_destination),
        })
    }
}

/// FFI-safe calf.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalf {
    pub id: String,
    pub dib: String,
    pub sex: String,
    pub mother_id: String,
    pub father_id: String,
    pub birth_date: String,
    pub status: String,
    pub death_date: Option<String>,
    pub sale_date: Option<String>,
    pub sale_destination: Option<String>,
    pub notes: Option<String>,
}

impl From<Calf> for FfiCalf {
    fn from(calf: Calf) -> Self {
        let (sale_date, sale_destination) = sale_parts(calf.sale);
        Self {
            id: calf.id,
            dib: calf.dib,
            sex: calf.sex.to_string(),
            mother_id: calf.mother_id,
            father_id: calf.father_id,
            birth_date: calf.birth_date,
            status: calf.status.to_string(),
            death_date: calf.death_date,
            sale_date,
            sale_destination,
            notes: calf.notes,
        }
    }
}

impl TryFrom<FfiCalf> for Calf {
    type Error = HerdBookError;

    fn try_from(calf: FfiCalf) -> Result<Self, Self::Error> {
        Ok(Calf {
            id: calf.id,
            dib: calf.dib,
            sex: calf.sex.parse()?,
            mother_id: calf.mother_id,
            father_id: calf.father_id,
            birth_date: calf.birth_date,
            status: calf.status.parse()?,
            death_date: calf.death_date,
            sale: sale_from(calf.sale_date, calf.sale_destination),
            notes: calf.notes,
        })
    }
}

/// FFI-safe bull.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBull {
    pub id: String,
    pub name: String,
    pub status: String,
    pub death_date: Option<String>,
    pub sale_date: Option<String>,
    pub sale_destination: Option<String>,
}

impl From<Bull> for FfiBull {
    fn from(bull: Bull) -> Self {
        let (sale_date, sale_destination) = sale_parts(bull.sale);
        Self {
            id: bull.id,
            name: bull.name,
            status: bull.status.to_string(),
            death_date: bull.death_date,
            sale_date,
            sale_destination,
        }
    }
}

impl TryFrom<FfiBull> for Bull {
    type Error = HerdBookError;

    fn try_from(bull: FfiBull) -> Result<Self, Self::Error> {
        Ok(Bull {
            id: bull.id,
            name: bull.name,
            status: bull.status.parse()?,
            death_date: bull.death_date,
            sale: sale_from(bull.sale_date, bull.sale_destination),
        })
    }
}

/// FFI-safe location.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLocation {
    pub id: String,
    pub name: String,
    pub assigned_bull_id: String,
    pub is_deleted: bool,
}

impl From<Location> for FfiLocation {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            assigned_bull_id: location.assigned_bull_id,
            is_deleted: location.is_deleted,
        }
    }
}

impl From<FfiLocation> for Location {
    fn from(location: FfiLocation) -> Self {
        Location {
            id: location.id,
            name: location.name,
            assigned_bull_id: location.assigned_bull_id,
            is_deleted: location.is_deleted,
        }
    }
}

/// FFI-safe treatment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatment {
    pub id: String,
    pub animal_kind: String,
    pub animal_id: String,
    pub treatment_type: String,
    pub dosage: String,
    pub date_applied: String,
    pub repeat_required: bool,
    pub repeat_date: Option<String>,
    pub is_deleted: bool,
}

impl From<Treatment> for FfiTreatment {
    fn from(treatment: Treatment) -> Self {
        Self {
            id: treatment.id,
            animal_kind: treatment.animal.kind().to_string(),
            animal_id: treatment.animal.id().to_string(),
            treatment_type: treatment.treatment_type,
            dosage: treatment.dosage,
            date_applied: treatment.date_applied,
            repeat_required: treatment.repeat_required,
            repeat_date: treatment.repeat_date,
            is_deleted: treatment.is_deleted,
        }
    }
}

impl TryFrom<FfiTreatment> for Treatment {
    type Error = HerdBookError;

    fn try_from(treatment: FfiTreatment) -> Result<Self, Self::Error> {
        Ok(Treatment {
            id: treatment.id,
            animal: AnimalRef::new(treatment.animal_kind.parse()?, treatment.animal_id),
            treatment_type: treatment.treatment_type,
            dosage: treatment.dosage,
            date_applied: treatment.date_applied,
            repeat_required: treatment.repeat_required,
            repeat_date: treatment.repeat_date,
            is_deleted: treatment.is_deleted,
        })
    }
}

/// FFI-safe reference to a cow, calf, bull or location.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiEntityRef {
    pub kind: String,
    pub id: String,
}

impl From<EntityRef> for FfiEntityRef {
    fn from(entity: EntityRef) -> Self {
        Self {
            kind: entity.kind().to_string(),
            id: entity.id().to_string(),
        }
    }
}

impl TryFrom<FfiEntityRef> for EntityRef {
    type Error = HerdBookError;

    fn try_from(entity: FfiEntityRef) -> Result<Self, Self::Error> {
        Ok(EntityRef::new(entity.kind.parse::<EntityKind>()?, entity.id))
    }
}

/// FFI-safe trash row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTrashItem {
    pub kind: String,
    pub id: String,
    pub display_name: String,
}

impl From<TrashItem> for FfiTrashItem {
    fn from(item: TrashItem) -> Self {
        Self {
            kind: item.entity.kind().to_string(),
            id: item.entity.id().to_string(),
            display_name: item.display_name,
        }
    }
}

/// FFI-safe batch failure.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBatchFailure {
    pub entity: FfiEntityRef,
    pub message: String,
}

/// FFI-safe batch report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBatchReport {
    pub succeeded: Vec<FfiEntityRef>,
    pub failures: Vec<FfiBatchFailure>,
}

impl From<BatchReport> for FfiBatchReport {
    fn from(report: BatchReport) -> Self {
        Self {
            succeeded: report.succeeded.into_iter().map(Into::into).collect(),
            failures: report
                .failures
                .into_iter()
                .map(|f| FfiBatchFailure {
                    message: f.error.to_string(),
                    entity: f.entity.into(),
                })
                .collect(),
        }
    }
}

/// FFI-safe row of the locations screen.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLocationSummary {
    pub location_id: String,
    pub name: String,
    pub bull_name: Option<String>,
    pub cow_count: u32,
}

impl From<views::LocationSummary> for FfiLocationSummary {
    fn from(summary: views::LocationSummary) -> Self {
        Self {
            location_id: summary.location_id,
            name: summary.name,
            bull_name: summary.bull_name,
            cow_count: summary.cow_count as u32,
        }
    }
}
