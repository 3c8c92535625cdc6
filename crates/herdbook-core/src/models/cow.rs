//! Cow models.

use serde::{Deserialize, Serialize};

use super::{AnimalStatus, SaleInfo};

/// An adult cow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cow {
    pub id: String,
    /// 4-digit identification code
    pub dib: String,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: String,
    pub location_id: String,
    pub status: AnimalStatus,
    pub death_date: Option<String>,
    pub sale: Option<SaleInfo>,
}

impl Cow {
    /// Create a new living cow.
    pub fn new(
        dib: impl Into<String>,
        birth_date: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            dib: dib.into(),
            birth_date: birth_date.into(),
            location_id: location_id.into(),
            status: AnimalStatus::Alive,
            death_date: None,
            sale: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == AnimalStatus::Deleted
    }

    pub fn display_name(&self) -> String {
        format!("Cow DIB {}", self.dib)
    }
}

/// Check that a DIB is exactly four ASCII digits.
pub fn is_valid_dib(dib: &str) -> bool {
    dib.len() == 4 && dib.bytes().all(|b| b.is_ascii_digit())
}
