//! Bull models.

use serde::{Deserialize, Serialize};

use super::{AnimalStatus, SaleInfo};

/// A breeding bull.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bull {
    /// Unique bull ID
    pub id: String,
    /// Bull name (bulls carry no DIB)
    pub name: String,
    pub status: AnimalStatus,
    /// Set only while status is Dead
    pub death_date: Option<String>,
    /// Set only while status is Sold
    pub sale: Option<SaleInfo>,
}

impl Bull {
    /// Create a new living bull.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            status: AnimalStatus::Alive,
            death_date: None,
            sale: None,
        }
    }

    /// Name given to a bull promoted from a male calf.
    pub fn promoted_name(dib: &str) -> String {
        format!("Toro {}", dib)
    }

    pub fn is_deleted(&self) -> bool {
        self.status == AnimalStatus::Deleted
    }

    pub fn display_name(&self) -> String {
        format!("Bull {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bull() {
        let bull = Bull::new("Ferdinand");
        assert_eq!(bull.name, "Ferdinand");
        assert_eq!(bull.status, AnimalStatus::Alive);
        assert_eq!(bull.id.len(), 36); // UUID format
    }

    #[test]
    fn test_promoted_name() {
        assert_eq!(Bull::promoted_name("1002"), "Toro 1002");
    }
}
