//! Treatment table mapping.

use rusqlite::types::Value;
use rusqlite::{params, Row};

use super::codec::{opt_text, text};
use super::{Database, DbResult, Record};
use crate::models::{AnimalKind, AnimalRef, Treatment};

impl Record for Treatment {
    const NAME: &'static str = "treatment";
    const TABLE: &'static str = "treatments";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "animal_id",
        "animal_kind",
        "treatment_type",
        "dosage",
        "date_applied",
        "repeat_required",
        "repeat_date",
        "is_deleted",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let animal_id: String = row.get(1)?;
        let animal_kind: AnimalKind = row.get(2)?;
        Ok(Treatment {
            id: row.get(0)?,
            animal: AnimalRef::new(animal_kind, animal_id),
            treatment_type: row.get(3)?,
            dosage: row.get(4)?,
            date_applied: row.get(5)?,
            repeat_required: row.get(6)?,
            repeat_date: row.get(7)?,
            is_deleted: row.get(8)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.id),
            text(self.animal.id()),
            text(self.animal.kind().as_str()),
            text(&self.treatment_type),
            text(&self.dosage),
            text(&self.date_applied),
            Value::from(self.repeat_required),
            opt_text(self.repeat_date.as_deref()),
            Value::from(self.is_deleted),
        ]
    }
}

impl Database {
    /// Treatments recorded for one animal, most recent first.
    pub fn treatments_for(&self, animal: &AnimalRef) -> DbResult<Vec<Treatment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, animal_id, animal_kind, treatment_type, dosage,
                   date_applied, repeat_required, repeat_date, is_deleted
            FROM treatments
            WHERE animal_kind = ? AND animal_id = ?
            ORDER BY date_applied DESC
            "#,
        )?;

        let rows = stmt.query_map(params![animal.kind(), animal.id()], Treatment::from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();

        let treatment = Treatment::new(AnimalRef::Calf("calf-2".into()), "Dewormer", "5ml", "2024-05-01")
            .with_repeat("2024-05-20");
        db.insert(&treatment).unwrap();

        let retrieved = db.require::<Treatment>(&treatment.id).unwrap();
        assert_eq!(retrieved, treatment);
        assert_eq!(retrieved.animal.kind(), AnimalKind::Calf);
    }

    #[test]
    fn test_treatments_for_keeps_kinds_apart() {
        let db = Database::open_in_memory().unwrap();

        // Same raw id in two collections
        let cow_first = Treatment::new(AnimalRef::Cow("7".into()), "Vaccine A", "10ml", "2024-01-01");
        let cow_second = Treatment::new(AnimalRef::Cow("7".into()), "Vaccine B", "10ml", "2024-03-01");
        let bull = Treatment::new(AnimalRef::Bull("7".into()), "Antibiotic", "20ml", "2024-02-01");
        db.insert_many(&[cow_first.clone(), cow_second.clone(), bull])
            .unwrap();

        let for_cow = db.treatments_for(&AnimalRef::Cow("7".into())).unwrap();
        assert_eq!(for_cow, vec![cow_second, cow_first]);
    }
}
