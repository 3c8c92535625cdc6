//! Database layer for herdbook.
//!
//! Every collection is a keyed table behind the [`Record`] trait, so the
//! lifecycle and trash managers only ever talk to the generic store
//! operations below plus a few per-collection queries.

mod bulls;
mod calves;
mod codec;
mod cows;
mod locations;
mod schema;
mod seed;
mod treatments;

pub use schema::*;
pub use seed::*;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

use crate::models::EntityKind;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// A record stored in its own keyed table.
///
/// `COLUMNS[0]` is always the `id` primary key, and `to_values` yields values
/// in `COLUMNS` order.
pub trait Record: Sized {
    /// Singular name used in messages ("cow", "treatment", ...)
    const NAME: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
    fn to_values(&self) -> Vec<Value>;
}

/// A record that can sit in the trash.
pub trait Trashable: Record {
    const KIND: EntityKind;

    fn in_trash(&self) -> bool;
    fn display_name(&self) -> String;

    /// Move into the trash, or back out of it as an active record.
    fn set_in_trash(&mut self, in_trash: bool);
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` as one unit of work: everything it writes is committed
    /// together or rolled back together.
    ///
    /// Built on savepoints so units of work nest.
    pub fn atomically<T, E>(&self, f: impl FnOnce(&Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        self.conn
            .execute_batch("SAVEPOINT herd_unit")
            .map_err(DbError::from)?;

        match f(self) {
            Ok(value) => {
                self.conn
                    .execute_batch("RELEASE herd_unit")
                    .map_err(DbError::from)?;
                Ok(value)
            }
            Err(e) => {
                self.conn
                    .execute_batch("ROLLBACK TO herd_unit; RELEASE herd_unit")
                    .map_err(DbError::from)?;
                Err(e)
            }
        }
    }

    /// All records of a collection, in insertion order.
    pub fn list<R: Record>(&self) -> DbResult<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            R::COLUMNS.join(", "),
            R::TABLE
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], R::from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get one record by ID.
    pub fn get<R: Record>(&self, id: &str) -> DbResult<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            R::COLUMNS.join(", "),
            R::TABLE
        );
        self.conn
            .query_row(&sql, [id], R::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Get one record by ID, failing if it does not exist.
    pub fn require<R: Record>(&self, id: &str) -> DbResult<R> {
        self.get(id)?
            .ok_or_else(|| DbError::NotFound(format!("{} {}", R::NAME, id)))
    }

    /// Insert a new record.
    pub fn insert<R: Record>(&self, record: &R) -> DbResult<()> {
        let placeholders: Vec<String> = (1..=R::COLUMNS.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            R::TABLE,
            R::COLUMNS.join(", "),
            placeholders.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(record.to_values()))?;
        Ok(())
    }

    /// Insert many records at once; either all land or none do.
    pub fn insert_many<R: Record>(&self, records: &[R]) -> DbResult<()> {
        self.atomically(|db| records.iter().try_for_each(|r| db.insert(r)))
    }

    /// Overwrite every field of an existing record.
    ///
    /// Returns false if no record has this ID.
    pub fn update<R: Record>(&self, record: &R) -> DbResult<bool> {
        let assignments: Vec<String> = R::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, col)| format!("{} = ?{}", col, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?1",
            R::TABLE,
            assignments.join(", ")
        );
        let rows_affected = self.conn.execute(&sql, params_from_iter(record.to_values()))?;
        Ok(rows_affected > 0)
    }

    /// Permanently remove records by ID. Returns how many rows were removed.
    pub fn delete_many<R: Record>(&self, ids: &[String]) -> DbResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
        let sql = format!(
            "DELETE FROM {} WHERE id IN ({})",
            R::TABLE,
            placeholders.join(", ")
        );
        let rows_affected = self.conn.execute(&sql, params_from_iter(ids.iter()))?;
        Ok(rows_affected)
    }

    /// Number of records in a collection.
    pub fn count<R: Record>(&self) -> DbResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Records of a collection currently in the trash.
    pub fn list_trashed<R: Trashable>(&self) -> DbResult<Vec<R>> {
        Ok(self
            .list::<R>()?
            .into_iter()
            .filter(|r| r.in_trash())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bull, Cow, Location};

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"bulls".to_string()));
        assert!(tables.contains(&"locations".to_string()));
        assert!(tables.contains(&"cows".to_string()));
        assert!(tables.contains(&"calves".to_string()));
        assert!(tables.contains(&"treatments".to_string()));
    }

    #[test]
    fn test_generic_crud() {
        let db = Database::open_in_memory().unwrap();

        let mut bull = Bull::new("Ferdinand");
        db.insert(&bull).unwrap();
        assert_eq!(db.count::<Bull>().unwrap(), 1);

        bull.name = "Ferdinand II".into();
        assert!(db.update(&bull).unwrap());
        assert_eq!(db.require::<Bull>(&bull.id).unwrap().name, "Ferdinand II");

        assert_eq!(db.delete_many::<Bull>(&[bull.id.clone()]).unwrap(), 1);
        assert!(db.get::<Bull>(&bull.id).unwrap().is_none());
        assert!(matches!(db.require::<Bull>(&bull.id), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_update_missing_record() {
        let db = Database::open_in_memory().unwrap();
        let bull = Bull::new("Ghost");
        assert!(!db.update(&bull).unwrap());
    }

    #[test]
    fn test_insert_many_is_all_or_nothing() {
        let db = Database::open_in_memory().unwrap();
        let bull = Bull::new("Taurus");
        let duplicate = bull.clone();

        let result = db.insert_many(&[bull, duplicate]);
        assert!(result.is_err());
        assert_eq!(db.count::<Bull>().unwrap(), 0);
    }

    #[test]
    fn test_atomically_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();
        let bull = Bull::new("Taurus");
        let location = Location::new("Paddock A", bull.id.clone());

        let result: DbResult<()> = db.atomically(|db| {
            db.insert(&bull)?;
            db.insert(&location)?;
            Err(DbError::NotFound("abort".into()))
        });

        assert!(result.is_err());
        assert_eq!(db.count::<Bull>().unwrap(), 0);
        assert_eq!(db.count::<Location>().unwrap(), 0);
    }

    #[test]
    fn test_atomically_nests() {
        let db = Database::open_in_memory().unwrap();
        let cows = vec![
            Cow::new("1111", "2021-01-01", "loc-1"),
            Cow::new("2222", "2020-01-01", "loc-1"),
        ];

        db.atomically(|db| db.insert_many(&cows)).unwrap();
        assert_eq!(db.count::<Cow>().unwrap(), 2);
    }

    #[test]
    fn test_delete_many_empty_is_noop() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.delete_many::<Cow>(&[]).unwrap(), 0);
    }
}
