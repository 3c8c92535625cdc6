//! Calf table mapping.

use rusqlite::types::Value;
use rusqlite::{params, Row};

use super::codec::{opt_text, sale_from_columns, sale_values, text};
use super::{Database, DbResult, Record, Trashable};
use crate::models::{Calf, CalfStatus, EntityKind};

impl Record for Calf {
    const NAME: &'static str = "calf";
    const TABLE: &'static str = "calves";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "dib",
        "sex",
        "mother_id",
        "father_id",
        "birth_date",
        "status",
        "death_date",
        "sale_date",
        "sale_destination",
        "notes",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Calf {
            id: row.get(0)?,
            dib: row.get(1)?,
            sex: row.get(2)?,
            mother_id: row.get(3)?,
            father_id: row.get(4)?,
            birth_date: row.get(5)?,
            status: row.get(6)?,
            death_date: row.get(7)?,
            sale: sale_from_columns(row.get(8)?, row.get(9)?),
            notes: row.get(10)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        let [sale_date, sale_destination] = sale_values(self.sale.as_ref());
        vec![
            text(&self.id),
            text(&self.dib),
            text(self.sex.as_str()),
            text(&self.mother_id),
            text(&self.father_id),
            text(&self.birth_date),
            text(self.status.as_str()),
            opt_text(self.death_date.as_deref()),
            sale_date,
            sale_destination,
            opt_text(self.notes.as_deref()),
        ]
    }
}

impl Trashable for Calf {
    const KIND: EntityKind = EntityKind::Calf;

    fn in_trash(&self) -> bool {
        self.status == CalfStatus::Deleted
    }

    fn display_name(&self) -> String {
        Calf::display_name(self)
    }

    fn set_in_trash(&mut self, in_trash: bool) {
        self.status = if in_trash {
            CalfStatus::Deleted
        } else {
            CalfStatus::Alive
        };
    }
}

impl Database {
    /// Calves not in the trash whose mother is the given cow.
    pub fn active_calves_of_mother(&self, mother_id: &str) -> DbResult<Vec<Calf>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, dib, sex, mother_id, father_id, birth_date, status,
                   death_date, sale_date, sale_destination, notes
            FROM calves
            WHERE mother_id = ? AND status != ?
            ORDER BY birth_date DESC
            "#,
        )?;

        let rows = stmt.query_map(params![mother_id, CalfStatus::Deleted], Calf::from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
