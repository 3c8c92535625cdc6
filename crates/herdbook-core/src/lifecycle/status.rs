//! Status changes of cows, calves and bulls.

use tracing::info;

use super::{ensure_active, LifecycleManager, StatusDetails};
use crate::error::{fetch, HerdResult};
use crate::models::{AnimalRef, AnimalStatus, Bull, Calf, Cow};

impl<'a> LifecycleManager<'a> {
    /// Move an animal to `status`.
    ///
    /// `Dead` needs a death date and `Sold` needs sale info; both are checked
    /// before anything is written. `Deleted` is a soft-delete. A record in
    /// the trash has to be restored before its status can change.
    pub fn set_animal_status(
        &self,
        animal: &AnimalRef,
        status: AnimalStatus,
        details: StatusDetails,
    ) -> HerdResult<()> {
        if status == AnimalStatus::Deleted {
            return match animal {
                AnimalRef::Cow(id) => self.delete_cow(id),
                AnimalRef::Calf(id) => self.delete_calf(id),
                AnimalRef::Bull(id) => self.delete_bull(id),
            };
        }

        let (death_date, sale) = details.settle(status)?;

        match animal {
            AnimalRef::Cow(id) => {
                let mut cow = fetch::<Cow>(self.db, id)?;
                ensure_active(&cow)?;
                cow.status = status;
                cow.death_date = death_date;
                cow.sale = sale;
                self.db.update(&cow)?;
            }
            AnimalRef::Calf(id) => {
                let mut calf = fetch::<Calf>(self.db, id)?;
                ensure_active(&calf)?;
                calf.status = status.into();
                calf.death_date = death_date;
                calf.sale = sale;
                self.db.update(&calf)?;
            }
            AnimalRef::Bull(id) => {
                let mut bull = fetch::<Bull>(self.db, id)?;
                ensure_active(&bull)?;
                bull.status = status;
                bull.death_date = death_date;
                bull.sale = sale;
                self.db.update(&bull)?;
            }
        }

        info!(%animal, %status, "status changed");
        Ok(())
    }
}
