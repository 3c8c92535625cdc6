//! Breeding promotion: a calf leaves the calf collection as an adult.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::LifecycleManager;
use crate::error::{fetch, HerdError, HerdResult};
use crate::models::{Bull, Calf, CalfStatus, Cow, EntityRef, Sex};

/// The adult record created by a promotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Promotion {
    Cow(Cow),
    Bull(Bull),
}

impl Promotion {
    pub fn entity(&self) -> EntityRef {
        match self {
            Promotion::Cow(cow) => EntityRef::Cow(cow.id.clone()),
            Promotion::Bull(bull) => EntityRef::Bull(bull.id.clone()),
        }
    }
}

impl<'a> LifecycleManager<'a> {
    /// Promote an alive calf into the breeding herd.
    ///
    /// Females become a cow at `destination_location_id` (required, must be
    /// an active location). Males become a bull named "Toro {dib}". The new
    /// record is created and the calf removed in one unit of work.
    pub fn promote_calf(
        &self,
        calf_id: &str,
        destination_location_id: Option<&str>,
    ) -> HerdResult<Promotion> {
        let calf = fetch::<Calf>(self.db, calf_id)?;
        if calf.status != CalfStatus::Alive {
            return Err(HerdError::invalid_transition(
                EntityRef::Calf(calf.id.clone()),
                format!("only an alive calf can be promoted, this one is {}", calf.status),
            ));
        }

        let promotion = match calf.sex {
            Sex::Female => {
                let destination = destination_location_id
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| {
                        HerdError::validation(
                            "a destination location is required to promote a female calf",
                        )
                    })?;
                let location = self.active_location(destination)?;
                Promotion::Cow(Cow::new(&calf.dib, &calf.birth_date, location.id))
            }
            Sex::Male => Promotion::Bull(Bull::new(Bull::promoted_name(&calf.dib))),
        };

        self.db.atomically(|db| {
            match &promotion {
                Promotion::Cow(cow) => db.insert(cow)?,
                Promotion::Bull(bull) => db.insert(bull)?,
            }
            db.delete_many::<Calf>(std::slice::from_ref(&calf.id))?;
            Ok::<_, HerdError>(())
        })?;

        info!(calf = %calf.id, promoted = %promotion.entity(), "calf promoted");
        Ok(promotion)
    }
}
