//! Bull table mapping.

use rusqlite::types::Value;
use rusqlite::Row;

use super::codec::{opt_text, sale_from_columns, sale_values, text};
use super::{Record, Trashable};
use crate::models::{AnimalStatus, Bull, EntityKind};

impl Record for Bull {
    const NAME: &'static str = "bull";
    const TABLE: &'static str = "bulls";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "status",
        "death_date",
        "sale_date",
        "sale_destination",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Bull {
            id: row.get(0)?,
            name: row.get(1)?,
            status: row.get(2)?,
            death_date: row.get(3)?,
            sale: sale_from_columns(row.get(4)?, row.get(5)?),
        })
    }

    fn to_values(&self) -> Vec<Value> {
        let [sale_date, sale_destination] = sale_values(self.sale.as_ref());
        vec![
            text(&self.id),
            text(&self.name),
            text(self.status.as_str()),
            opt_text(self.death_date.as_deref()),
            sale_date,
            sale_destination,
        ]
    }
}

impl Trashable for Bull {
    const KIND: EntityKind = EntityKind::Bull;

    fn in_trash(&self) -> bool {
        self.status == AnimalStatus::Deleted
    }

    fn display_name(&self) -> String {
        Bull::display_name(self)
    }

    fn set_in_trash(&mut self, in_trash: bool) {
        self.status = if in_trash {
            AnimalStatus::Deleted
        } else {
            AnimalStatus::Alive
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use crate::models::{AnimalStatus, Bull, SaleInfo};

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();

        let mut bull = Bull::new("Taurus");
        bull.status = AnimalStatus::Sold;
        bull.sale = Some(SaleInfo::new("2024-02-01", "Finca Vecina"));
        db.insert(&bull).unwrap();

        let retrieved = db.get::<Bull>(&bull.id).unwrap().unwrap();
        assert_eq!(retrieved, bull);
    }

    #[test]
    fn test_list_trashed() {
        let db = Database::open_in_memory().unwrap();

        let alive = Bull::new("Ferdinand");
        let mut deleted = Bull::new("Taurus");
        deleted.status = AnimalStatus::Deleted;
        db.insert_many(&[alive, deleted.clone()]).unwrap();

        let trashed = db.list_trashed::<Bull>().unwrap();
        assert_eq!(trashed, vec![deleted]);
    }
}
