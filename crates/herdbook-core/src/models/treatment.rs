//! Treatment models.

use serde::{Deserialize, Serialize};

use super::AnimalRef;

/// A medical treatment applied to a cow, calf or bull.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    pub id: String,
    /// Treated animal (tagged: ids are only unique per collection)
    pub animal: AnimalRef,
    /// Vaccine, antibiotic, dewormer, ...
    pub treatment_type: String,
    pub dosage: String,
    pub date_applied: String,
    pub repeat_required: bool,
    /// Required when `repeat_required` is set
    pub repeat_date: Option<String>,
    pub is_deleted: bool,
}

impl Treatment {
    pub fn new(
        animal: AnimalRef,
        treatment_type: impl Into<String>,
        dosage: impl Into<String>,
        date_applied: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            animal,
            treatment_type: treatment_type.into(),
            dosage: dosage.into(),
            date_applied: date_applied.into(),
            repeat_required: false,
            repeat_date: None,
            is_deleted: false,
        }
    }

    /// Schedule a follow-up dose.
    pub fn with_repeat(mut self, repeat_date: impl Into<String>) -> Self {
        self.repeat_required = true;
        self.repeat_date = Some(repeat_date.into());
        self
    }

    /// A follow-up dose is due on or before `today` (ISO dates compare lexically).
    pub fn is_due(&self, today: &str) -> bool {
        !self.is_deleted
            && self.repeat_required
            && self
                .repeat_date
                .as_deref()
                .is_some_and(|date| date <= today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_due() {
        let treatment = Treatment::new(AnimalRef::Cow("cow-1".into()), "Vaccine A", "10ml", "2024-05-01")
            .with_repeat("2024-05-15");

        assert!(!treatment.is_due("2024-05-14"));
        assert!(treatment.is_due("2024-05-15"));
        assert!(treatment.is_due("2024-06-01"));
    }

    #[test]
    fn test_deleted_or_single_dose_never_due() {
        let single = Treatment::new(AnimalRef::Bull("bull-1".into()), "Antibiotic", "20ml", "2024-05-01");
        assert!(!single.is_due("2030-01-01"));

        let mut deleted = single.with_repeat("2024-05-02");
        deleted.is_deleted = true;
        assert!(!deleted.is_due("2030-01-01"));
    }
}
