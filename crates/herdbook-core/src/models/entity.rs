//! Tagged references to records across entity types.
//!
//! Identifiers are only unique within one entity type, so every
//! cross-type reference carries its kind alongside the id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// The record collections that take part in the trash.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Cow,
    Calf,
    Bull,
    Location,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Cow => "cow",
            EntityKind::Calf => "calf",
            EntityKind::Bull => "bull",
            EntityKind::Location => "location",
        }
    }
}

impl FromStr for EntityKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cow" => Ok(EntityKind::Cow),
            "calf" => Ok(EntityKind::Calf),
            "bull" => Ok(EntityKind::Bull),
            "location" => Ok(EntityKind::Location),
            _ => Err(ParseEnumError {
                kind: "entity kind",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to one record of a trash-eligible collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Cow(String),
    Calf(String),
    Bull(String),
    Location(String),
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            EntityKind::Cow => EntityRef::Cow(id),
            EntityKind::Calf => EntityRef::Calf(id),
            EntityKind::Bull => EntityRef::Bull(id),
            EntityKind::Location => EntityRef::Location(id),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Cow(_) => EntityKind::Cow,
            EntityRef::Calf(_) => EntityKind::Calf,
            EntityRef::Bull(_) => EntityKind::Bull,
            EntityRef::Location(_) => EntityKind::Location,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            EntityRef::Cow(id)
            | EntityRef::Calf(id)
            | EntityRef::Bull(id)
            | EntityRef::Location(id) => id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

impl From<AnimalRef> for EntityRef {
    fn from(animal: AnimalRef) -> Self {
        match animal {
            AnimalRef::Cow(id) => EntityRef::Cow(id),
            AnimalRef::Calf(id) => EntityRef::Calf(id),
            AnimalRef::Bull(id) => EntityRef::Bull(id),
        }
    }
}

/// The animal collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    Cow,
    Calf,
    Bull,
}

impl AnimalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalKind::Cow => "cow",
            AnimalKind::Calf => "calf",
            AnimalKind::Bull => "bull",
        }
    }
}

impl FromStr for AnimalKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cow" => Ok(AnimalKind::Cow),
            "calf" => Ok(AnimalKind::Calf),
            "bull" => Ok(AnimalKind::Bull),
            _ => Err(ParseEnumError {
                kind: "animal kind",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a cow, calf or bull (e.g. the subject of a treatment).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnimalRef {
    Cow(String),
    Calf(String),
    Bull(String),
}

impl AnimalRef {
    pub fn new(kind: AnimalKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            AnimalKind::Cow => AnimalRef::Cow(id),
            AnimalKind::Calf => AnimalRef::Calf(id),
            AnimalKind::Bull => AnimalRef::Bull(id),
        }
    }

    pub fn kind(&self) -> AnimalKind {
        match self {
            AnimalRef::Cow(_) => AnimalKind::Cow,
            AnimalRef::Calf(_) => AnimalKind::Calf,
            AnimalRef::Bull(_) => AnimalKind::Bull,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AnimalRef::Cow(id) | AnimalRef::Calf(id) | AnimalRef::Bull(id) => id,
        }
    }
}

impl fmt::Display for AnimalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// One row of the trash view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrashItem {
    pub entity: EntityRef,
    /// Human-readable label ("Cow DIB 1111", "Location Paddock A", ...)
    pub display_name: String,
}
