//! Batch operations. Each item is attempted on its own; one failing item
//! never undoes the others.

use tracing::info;

use super::validate::require_sale;
use super::{ensure_active, LifecycleManager};
use crate::batch::BatchReport;
use crate::error::{fetch, HerdError, HerdResult};
use crate::models::{Calf, CalfStatus, Cow, EntityRef, SaleInfo};

impl<'a> LifecycleManager<'a> {
    /// Sell several calves to the same destination on the same date.
    ///
    /// Fails up front only if the sale info itself is invalid. Missing calves
    /// and calves that are not alive end up in the report's failures.
    pub fn batch_sell_calves(
        &self,
        calf_ids: &[String],
        destination: &str,
        date: &str,
    ) -> HerdResult<BatchReport> {
        let sale = require_sale(Some(&SaleInfo::new(date, destination)))?;

        let mut report = BatchReport::default();
        for id in calf_ids {
            let outcome = self.sell_calf(id, &sale);
            report.record(EntityRef::Calf(id.clone()), outcome);
        }

        info!(
            sold = report.succeeded.len(),
            failed = report.failures.len(),
            destination = %sale.destination,
            "batch sale finished"
        );
        Ok(report)
    }

    fn sell_calf(&self, id: &str, sale: &SaleInfo) -> HerdResult<()> {
        let mut calf = fetch::<Calf>(self.db, id)?;
        if calf.status != CalfStatus::Alive {
            return Err(HerdError::invalid_transition(
                EntityRef::Calf(calf.id),
                format!("only an alive calf can be sold, this one is {}", calf.status),
            ));
        }

        calf.status = CalfStatus::Sold;
        calf.death_date = None;
        calf.sale = Some(sale.clone());
        self.db.update(&calf)?;
        Ok(())
    }

    /// Move several cows to one location.
    ///
    /// The location must exist and not be in the trash; otherwise nothing is
    /// attempted. Missing or trashed cows end up in the report's failures.
    pub fn batch_update_cow_locations(
        &self,
        cow_ids: &[String],
        location_id: &str,
    ) -> HerdResult<BatchReport> {
        let location = self.active_location(location_id)?;

        let mut report = BatchReport::default();
        for id in cow_ids {
            let outcome = self.move_cow(id, &location.id);
            report.record(EntityRef::Cow(id.clone()), outcome);
        }

        info!(
            moved = report.succeeded.len(),
            failed = report.failures.len(),
            location = %location.id,
            "batch relocation finished"
        );
        Ok(report)
    }

    fn move_cow(&self, id: &str, location_id: &str) -> HerdResult<()> {
        let mut cow = fetch::<Cow>(self.db, id)?;
        ensure_active(&cow)?;
        cow.location_id = location_id.to_string();
        self.db.update(&cow)?;
        Ok(())
    }
}
