//! SQL text encoding of the model enums.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};

use crate::models::{AnimalKind, AnimalStatus, CalfStatus, SaleInfo, Sex};

macro_rules! text_enum {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse::<$ty>()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum!(AnimalStatus);
text_enum!(CalfStatus);
text_enum!(Sex);
text_enum!(AnimalKind);

pub(super) fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub(super) fn opt_text(s: Option<&str>) -> Value {
    s.map(text).unwrap_or(Value::Null)
}

/// Sale info is stored as two nullable columns, `sale_date` and `sale_destination`.
pub(super) fn sale_values(sale: Option<&SaleInfo>) -> [Value; 2] {
    [
        opt_text(sale.map(|s| s.date.as_str())),
        opt_text(sale.map(|s| s.destination.as_str())),
    ]
}

pub(super) fn sale_from_columns(date: Option<String>, destination: Option<String>) -> Option<SaleInfo> {
    match (date, destination) {
        (Some(date), Some(destination)) => Some(SaleInfo { date, destination }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_enum_text_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let status: CalfStatus = conn
            .query_row("SELECT ?1", [CalfStatus::Breeding], |row| row.get(0))
            .unwrap();
        assert_eq!(status, CalfStatus::Breeding);

        let raw: String = conn
            .query_row("SELECT ?1", [Sex::Female], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "female");
    }

    #[test]
    fn test_sale_columns_need_both_halves() {
        assert_eq!(
            sale_from_columns(Some("2024-05-01".into()), Some("Finca X".into())),
            Some(SaleInfo::new("2024-05-01", "Finca X"))
        );
        assert_eq!(sale_from_columns(Some("2024-05-01".into()), None), None);

        let [date, destination] = sale_values(None);
        assert_eq!(date, Value::Null);
        assert_eq!(destination, Value::Null);
    }

    #[test]
    fn test_unknown_text_fails_conversion() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<AnimalStatus> =
            conn.query_row("SELECT 'zombie'", [], |row| row.get(0));
        assert!(result.is_err());
    }
}
