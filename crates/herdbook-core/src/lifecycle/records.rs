//! Create and edit operations for every record type.

use tracing::info;

use super::validate::{require_date, require_dib, require_text};
use super::{ensure_active, LifecycleManager, Promotion, StatusDetails};
use crate::error::{fetch, fetch_active, HerdError, HerdResult};
use crate::models::{
    AnimalRef, AnimalStatus, Bull, Calf, CalfStatus, Cow, EntityRef, Location, NewCalf,
    SaleInfo, Treatment,
};
use crate::resolver::resolve_sire;

impl<'a> LifecycleManager<'a> {
    // Cows

    /// Record a new cow. Cows start out alive at an active location.
    pub fn add_cow(&self, cow: Cow) -> HerdResult<Cow> {
        require_dib(&cow.dib)?;
        require_date("birth date", &cow.birth_date)?;
        if cow.status != AnimalStatus::Alive {
            return Err(HerdError::invalid_transition(
                EntityRef::Cow(cow.id),
                "new cows start out alive",
            ));
        }
        self.active_location(&cow.location_id)?;

        self.db.insert(&cow)?;
        info!(cow = %cow.id, dib = %cow.dib, "cow added");
        Ok(cow)
    }

    /// Replace a cow's fields. Status changes follow the same rules as
    /// [`set_animal_status`](Self::set_animal_status).
    pub fn update_cow(&self, cow: Cow) -> HerdResult<()> {
        require_dib(&cow.dib)?;
        require_date("birth date", &cow.birth_date)?;
        let current = fetch::<Cow>(self.db, &cow.id)?;
        ensure_active(&current)?;
        let (death_date, sale) = settle_edit(
            EntityRef::Cow(cow.id.clone()),
            cow.status,
            &cow.death_date,
            &cow.sale,
        )?;
        if cow.location_id != current.location_id {
            self.active_location(&cow.location_id)?;
        }

        self.db.update(&Cow {
            death_date,
            sale,
            ..cow
        })?;
        info!(cow = %current.id, "cow updated");
        Ok(())
    }

    // Calves

    /// Record a new calf. The father is the bull assigned to the mother's
    /// location right now and never changes afterwards.
    pub fn add_calf(&self, calf: NewCalf) -> HerdResult<Calf> {
        require_dib(&calf.dib)?;
        require_date("birth date", &calf.birth_date)?;
        require_text("mother", &calf.mother_id)?;

        let father_id = resolve_sire(self.db, &calf.mother_id)?;
        let calf = calf.into_calf(father_id);

        self.db.insert(&calf)?;
        info!(calf = %calf.id, mother = %calf.mother_id, father = %calf.father_id, "calf added");
        Ok(calf)
    }

    /// Replace a calf's fields.
    ///
    /// Submitting `Breeding` saves the edit and promotes the calf in one
    /// unit of work; the returned promotion names the new cow or bull.
    pub fn update_calf(
        &self,
        calf: Calf,
        destination_location_id: Option<&str>,
    ) -> HerdResult<Option<Promotion>> {
        require_dib(&calf.dib)?;
        require_date("birth date", &calf.birth_date)?;
        let current = fetch::<Calf>(self.db, &calf.id)?;
        ensure_active(&current)?;

        if calf.status == CalfStatus::Breeding {
            return self.db.atomically(|_| {
                self.save_calf(
                    Calf {
                        status: current.status,
                        death_date: current.death_date.clone(),
                        sale: current.sale.clone(),
                        ..calf
                    },
                    &current,
                )?;
                self.promote_calf(&current.id, destination_location_id)
                    .map(Some)
            });
        }

        self.save_calf(calf, &current)?;
        Ok(None)
    }

    fn save_calf(&self, calf: Calf, current: &Calf) -> HerdResult<()> {
        let status = match calf.status {
            CalfStatus::Alive => AnimalStatus::Alive,
            CalfStatus::Dead => AnimalStatus::Dead,
            CalfStatus::Sold => AnimalStatus::Sold,
            CalfStatus::Breeding | CalfStatus::Deleted => {
                return Err(HerdError::invalid_transition(
                    EntityRef::Calf(calf.id),
                    format!("a calf cannot be edited into {}", calf.status),
                ))
            }
        };
        let details = StatusDetails {
            death_date: calf.death_date.clone(),
            sale: calf.sale.clone(),
        };
        let (death_date, sale) = details.settle(status)?;
        if calf.mother_id != current.mother_id {
            let mother = fetch_active::<Cow>(self.db, &calf.mother_id)?;
            self.active_location(&mother.location_id)?;
        }

        self.db.update(&Calf {
            father_id: current.father_id.clone(),
            death_date,
            sale,
            ..calf
        })?;
        info!(calf = %current.id, "calf updated");
        Ok(())
    }

    // Bulls

    pub fn add_bull(&self, name: &str) -> HerdResult<Bull> {
        require_text("bull name", name)?;
        let bull = Bull::new(name.trim());

        self.db.insert(&bull)?;
        info!(bull = %bull.id, name = %bull.name, "bull added");
        Ok(bull)
    }

    pub fn update_bull(&self, bull: Bull) -> HerdResult<()> {
        require_text("bull name", &bull.name)?;
        let current = fetch::<Bull>(self.db, &bull.id)?;
        ensure_active(&current)?;
        let (death_date, sale) = settle_edit(
            EntityRef::Bull(bull.id.clone()),
            bull.status,
            &bull.death_date,
            &bull.sale,
        )?;

        self.db.update(&Bull {
            death_date,
            sale,
            ..bull
        })?;
        info!(bull = %current.id, "bull updated");
        Ok(())
    }

    // Locations

    pub fn add_location(&self, name: &str, assigned_bull_id: &str) -> HerdResult<Location> {
        require_text("location name", name)?;
        require_text("assigned bull", assigned_bull_id)?;
        self.active_bull(assigned_bull_id)?;
        let location = Location::new(name.trim(), assigned_bull_id);

        self.db.insert(&location)?;
        info!(location = %location.id, bull = %location.assigned_bull_id, "location added");
        Ok(location)
    }

    pub fn update_location(&self, location: Location) -> HerdResult<()> {
        require_text("location name", &location.name)?;
        require_text("assigned bull", &location.assigned_bull_id)?;
        let current = fetch::<Location>(self.db, &location.id)?;
        ensure_active(&current)?;
        if location.is_deleted {
            return Err(trash_by_edit(EntityRef::Location(location.id)));
        }
        if location.assigned_bull_id != current.assigned_bull_id {
            self.active_bull(&location.assigned_bull_id)?;
        }

        self.db.update(&location)?;
        info!(location = %location.id, "location updated");
        Ok(())
    }

    // Treatments

    pub fn add_treatment(&self, treatment: Treatment) -> HerdResult<Treatment> {
        let treatment = self.checked_treatment(Treatment {
            is_deleted: false,
            ..treatment
        })?;

        self.db.insert(&treatment)?;
        info!(treatment = %treatment.id, animal = %treatment.animal, "treatment added");
        Ok(treatment)
    }

    pub fn update_treatment(&self, treatment: Treatment) -> HerdResult<()> {
        let current = fetch::<Treatment>(self.db, &treatment.id)?;
        if current.is_deleted {
            return Err(HerdError::validation(format!(
                "treatment {} is deleted",
                current.id
            )));
        }
        let treatment = self.checked_treatment(Treatment {
            is_deleted: false,
            ..treatment
        })?;

        self.db.update(&treatment)?;
        info!(treatment = %treatment.id, "treatment updated");
        Ok(())
    }

    /// Soft-delete a treatment. Deleting it twice is a no-op.
    pub fn delete_treatment(&self, id: &str) -> HerdResult<()> {
        let mut treatment = fetch::<Treatment>(self.db, id)?;
        if treatment.is_deleted {
            return Ok(());
        }

        treatment.is_deleted = true;
        self.db.update(&treatment)?;
        info!(treatment = %id, "treatment deleted");
        Ok(())
    }

    fn checked_treatment(&self, mut treatment: Treatment) -> HerdResult<Treatment> {
        require_text("treatment type", &treatment.treatment_type)?;
        require_text("dosage", &treatment.dosage)?;
        require_date("date applied", &treatment.date_applied)?;
        if treatment.repeat_required {
            let repeat = treatment
                .repeat_date
                .as_deref()
                .ok_or_else(|| HerdError::validation("repeat date is required"))?;
            require_date("repeat date", repeat)?;
        } else {
            treatment.repeat_date = None;
        }

        match &treatment.animal {
            AnimalRef::Cow(id) => fetch::<Cow>(self.db, id).map(|_| ())?,
            AnimalRef::Calf(id) => fetch::<Calf>(self.db, id).map(|_| ())?,
            AnimalRef::Bull(id) => fetch::<Bull>(self.db, id).map(|_| ())?,
        }
        Ok(treatment)
    }
}

/// Death date and sale info for an edited cow or bull.
fn settle_edit(
    entity: EntityRef,
    status: AnimalStatus,
    death_date: &Option<String>,
    sale: &Option<SaleInfo>,
) -> HerdResult<(Option<String>, Option<SaleInfo>)> {
    if status == AnimalStatus::Deleted {
        return Err(trash_by_edit(entity));
    }
    StatusDetails {
        death_date: death_date.clone(),
        sale: sale.clone(),
    }
    .settle(status)
}

fn trash_by_edit(entity: EntityRef) -> HerdError {
    HerdError::invalid_transition(entity, "records enter the trash through delete, not edit")
}
