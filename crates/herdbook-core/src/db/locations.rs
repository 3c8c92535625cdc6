//! Location table mapping.

use rusqlite::types::Value;
use rusqlite::Row;

use super::codec::text;
use super::{Database, DbResult, Record, Trashable};
use crate::models::{EntityKind, Location};

impl Record for Location {
    const NAME: &'static str = "location";
    const TABLE: &'static str = "locations";
    const COLUMNS: &'static [&'static str] = &["id", "name", "assigned_bull_id", "is_deleted"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Location {
            id: row.get(0)?,
            name: row.get(1)?,
            assigned_bull_id: row.get(2)?,
            is_deleted: row.get(3)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.id),
            text(&self.name),
            text(&self.assigned_bull_id),
            Value::from(self.is_deleted),
        ]
    }
}

impl Trashable for Location {
    const KIND: EntityKind = EntityKind::Location;

    fn in_trash(&self) -> bool {
        self.is_deleted
    }

    fn display_name(&self) -> String {
        Location::display_name(self)
    }

    fn set_in_trash(&mut self, in_trash: bool) {
        self.is_deleted = in_trash;
    }
}

impl Database {
    /// Locations not in the trash that are served by the given bull.
    pub fn active_locations_with_bull(&self, bull_id: &str) -> DbResult<Vec<Location>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, assigned_bull_id, is_deleted
            FROM locations
            WHERE assigned_bull_id = ? AND is_deleted = 0
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([bull_id], Location::from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
