//! Calf models.

use serde::{Deserialize, Serialize};

use super::{CalfStatus, SaleInfo, Sex};

/// A calf, linked to its mother and to the bull that sired it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Calf {
    pub id: String,
    /// 4-digit identification code
    pub dib: String,
    pub sex: Sex,
    pub mother_id: String,
    /// Bull assigned to the mother's location when the calf was recorded
    pub father_id: String,
    pub birth_date: String,
    pub status: CalfStatus,
    pub death_date: Option<String>,
    pub sale: Option<SaleInfo>,
    pub notes: Option<String>,
}

impl Calf {
    pub fn is_deleted(&self) -> bool {
        self.status == CalfStatus::Deleted
    }

    pub fn display_name(&self) -> String {
        format!("Calf DIB {}", self.dib)
    }
}

/// A calf about to be recorded. The father is resolved from the mother's location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCalf {
    pub dib: String,
    pub sex: Sex,
    pub mother_id: String,
    pub birth_date: String,
    pub notes: Option<String>,
}

impl NewCalf {
    pub fn new(
        dib: impl Into<String>,
        sex: Sex,
        mother_id: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        Self {
            dib: dib.into(),
            sex,
            mother_id: mother_id.into(),
            birth_date: birth_date.into(),
            notes: None,
        }
    }

    /// Build the stored calf once the father is known.
    pub fn into_calf(self, father_id: String) -> Calf {
        Calf {
            id: uuid::Uuid::new_v4().to_string(),
            dib: self.dib,
            sex: self.sex,
            mother_id: self.mother_id,
            father_id,
            birth_date: self.birth_date,
            status: CalfStatus::Alive,
            death_date: None,
            sale: None,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}
