//! Status enums shared by the animal records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a stored or foreign string names no known variant.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Status of a cow or a bull.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnimalStatus {
    Alive,
    Dead,
    Sold,
    /// Soft-deleted, sitting in the trash
    Deleted,
}

impl AnimalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalStatus::Alive => "alive",
            AnimalStatus::Dead => "dead",
            AnimalStatus::Sold => "sold",
            AnimalStatus::Deleted => "deleted",
        }
    }
}

impl FromStr for AnimalStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alive" => Ok(AnimalStatus::Alive),
            "dead" => Ok(AnimalStatus::Dead),
            "sold" => Ok(AnimalStatus::Sold),
            "deleted" => Ok(AnimalStatus::Deleted),
            _ => Err(ParseEnumError::new("animal status", s)),
        }
    }
}

impl fmt::Display for AnimalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a calf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CalfStatus {
    Alive,
    Dead,
    Sold,
    /// Being promoted out of the calf collection into an adult cow or bull
    Breeding,
    Deleted,
}

impl CalfStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalfStatus::Alive => "alive",
            CalfStatus::Dead => "dead",
            CalfStatus::Sold => "sold",
            CalfStatus::Breeding => "breeding",
            CalfStatus::Deleted => "deleted",
        }
    }
}

impl FromStr for CalfStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alive" => Ok(CalfStatus::Alive),
            "dead" => Ok(CalfStatus::Dead),
            "sold" => Ok(CalfStatus::Sold),
            "breeding" => Ok(CalfStatus::Breeding),
            "deleted" => Ok(CalfStatus::Deleted),
            _ => Err(ParseEnumError::new("calf status", s)),
        }
    }
}

impl fmt::Display for CalfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AnimalStatus> for CalfStatus {
    fn from(status: AnimalStatus) -> Self {
        match status {
            AnimalStatus::Alive => CalfStatus::Alive,
            AnimalStatus::Dead => CalfStatus::Dead,
            AnimalStatus::Sold => CalfStatus::Sold,
            AnimalStatus::Deleted => CalfStatus::Deleted,
        }
    }
}

/// Sex of a calf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(ParseEnumError::new("sex", s)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and when an animal was sold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleInfo {
    /// Sale date (YYYY-MM-DD)
    pub date: String,
    /// Buyer or destination farm
    pub destination: String,
}

impl SaleInfo {
    pub fn new(date: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            destination: destination.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("ALIVE".parse::<AnimalStatus>().unwrap(), AnimalStatus::Alive);
        assert_eq!("Breeding".parse::<CalfStatus>().unwrap(), CalfStatus::Breeding);
        assert_eq!("FEMALE".parse::<Sex>().unwrap(), Sex::Female);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = "missing".parse::<AnimalStatus>().unwrap_err();
        assert_eq!(err.kind, "animal status");
        assert_eq!(err.to_string(), "Unknown animal status: missing");
    }

    #[test]
    fn test_round_trip_as_str() {
        for status in [
            CalfStatus::Alive,
            CalfStatus::Dead,
            CalfStatus::Sold,
            CalfStatus::Breeding,
            CalfStatus::Deleted,
        ] {
            assert_eq!(status.as_str().parse::<CalfStatus>().unwrap(), status);
        }
    }
}
