//! Cow table mapping.

use rusqlite::types::Value;
use rusqlite::{params, Row};

use super::codec::{opt_text, sale_from_columns, sale_values, text};
use super::{Database, DbResult, Record, Trashable};
use crate::models::{AnimalStatus, Cow, EntityKind};

impl Record for Cow {
    const NAME: &'static str = "cow";
    const TABLE: &'static str = "cows";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "dib",
        "birth_date",
        "location_id",
        "status",
        "death_date",
        "sale_date",
        "sale_destination",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Cow {
            id: row.get(0)?,
            dib: row.get(1)?,
            birth_date: row.get(2)?,
            location_id: row.get(3)?,
            status: row.get(4)?,
            death_date: row.get(5)?,
            sale: sale_from_columns(row.get(6)?, row.get(7)?),
        })
    }

    fn to_values(&self) -> Vec<Value> {
        let [sale_date, sale_destination] = sale_values(self.sale.as_ref());
        vec![
            text(&self.id),
            text(&self.dib),
            text(&self.birth_date),
            text(&self.location_id),
            text(self.status.as_str()),
            opt_text(self.death_date.as_deref()),
            sale_date,
            sale_destination,
        ]
    }
}

impl Trashable for Cow {
    const KIND: EntityKind = EntityKind::Cow;

    fn in_trash(&self) -> bool {
        self.status == AnimalStatus::Deleted
    }

    fn display_name(&self) -> String {
        Cow::display_name(self)
    }

    fn set_in_trash(&mut self, in_trash: bool) {
        self.status = if in_trash {
            AnimalStatus::Deleted
        } else {
            AnimalStatus::Alive
        };
    }
}

impl Database {
    /// Cows not in the trash that are kept at the given location.
    pub fn active_cows_at_location(&self, location_id: &str) -> DbResult<Vec<Cow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, dib, birth_date, location_id, status,
                   death_date, sale_date, sale_destination
            FROM cows
            WHERE location_id = ? AND status != ?
            ORDER BY dib
            "#,
        )?;

        let rows = stmt.query_map(params![location_id, AnimalStatus::Deleted], Cow::from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();

        let mut cow = Cow::new("1111", "2021-03-01", "loc-1");
        cow.status = AnimalStatus::Dead;
        cow.death_date = Some("2024-04-01".into());
        db.insert(&cow).unwrap();

        let retrieved = db.require::<Cow>(&cow.id).unwrap();
        assert_eq!(retrieved, cow);
        assert_eq!(retrieved.sale, None);
    }

    #[test]
    fn test_active_cows_at_location() {
        let db = Database::open_in_memory().unwrap();

        let first = Cow::new("2222", "2020-01-01", "loc-1");
        let second = Cow::new("1111", "2021-01-01", "loc-1");
        let elsewhere = Cow::new("3333", "2022-01-01", "loc-2");
        let mut trashed = Cow::new("4444", "2019-01-01", "loc-1");
        trashed.status = AnimalStatus::Deleted;
        db.insert_many(&[first.clone(), second.clone(), elsewhere, trashed])
            .unwrap();

        let at_location = db.active_cows_at_location("loc-1").unwrap();
        assert_eq!(at_location, vec![second, first]); // ordered by DIB
    }
}
