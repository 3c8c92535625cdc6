//! Location models.

use serde::{Deserialize, Serialize};

/// A paddock, stable or field where cows are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Bull currently serving this location; calves born to cows kept here inherit it as father
    pub assigned_bull_id: String,
    /// Soft-delete flag (location is in the trash)
    pub is_deleted: bool,
}

impl Location {
    pub fn new(name: impl Into<String>, assigned_bull_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            assigned_bull_id: assigned_bull_id.into(),
            is_deleted: false,
        }
    }

    pub fn display_name(&self) -> String {
        format!("Location {}", self.name)
    }
}
