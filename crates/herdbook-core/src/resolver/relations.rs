//! Tolerant joins over an in-memory snapshot.

use crate::models::{AnimalRef, Bull, Calf, Cow, Location};
use crate::state::Snapshot;

/// Display-side joins. Every lookup returns `None` (or an empty list) when a
/// reference dangles; nothing here fails.
#[derive(Debug, Clone, Copy)]
pub struct Relations<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Relations<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn mother_of(&self, calf: &Calf) -> Option<&'a Cow> {
        self.snapshot.cow(&calf.mother_id)
    }

    pub fn location_of(&self, cow: &Cow) -> Option<&'a Location> {
        self.snapshot.location(&cow.location_id)
    }

    pub fn bull_of(&self, location: &Location) -> Option<&'a Bull> {
        self.snapshot.bull(&location.assigned_bull_id)
    }

    /// The recorded father, not the bull currently at the mother's location.
    pub fn sire_of(&self, calf: &Calf) -> Option<&'a Bull> {
        self.snapshot.bull(&calf.father_id)
    }

    /// Calves of a cow that are not in the trash, newest first.
    pub fn calves_of(&self, cow: &Cow) -> Vec<&'a Calf> {
        let mut calves: Vec<&Calf> = self
            .snapshot
            .calves
            .iter()
            .filter(|c| c.mother_id == cow.id && !c.is_deleted())
            .collect();
        calves.sort_by(|a, b| b.birth_date.cmp(&a.birth_date));
        calves
    }

    /// Human label for the animal behind a reference ("Cow DIB 1111", ...).
    pub fn animal_label(&self, animal: &AnimalRef) -> Option<String> {
        match animal {
            AnimalRef::Cow(id) => self.snapshot.cow(id).map(Cow::display_name),
            AnimalRef::Calf(id) => self.snapshot.calf(id).map(Calf::display_name),
            AnimalRef::Bull(id) => self.snapshot.bull(id).map(Bull::display_name),
        }
    }

    /// Where an animal lives: a cow's own location, a calf's mother's
    /// location, or the first active location a bull is assigned to.
    pub fn location_of_animal(&self, animal: &AnimalRef) -> Option<&'a Location> {
        match animal {
            AnimalRef::Cow(id) => self.snapshot.cow(id).and_then(|cow| self.location_of(cow)),
            AnimalRef::Calf(id) => self
                .snapshot
                .calf(id)
                .and_then(|calf| self.mother_of(calf))
                .and_then(|cow| self.location_of(cow)),
            AnimalRef::Bull(id) => self
                .snapshot
                .locations
                .iter()
                .find(|l| !l.is_deleted && l.assigned_bull_id == *id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCalf, Sex};

    fn snapshot() -> Snapshot {
        let bull = Bull {
            id: "bull-1".into(),
            ..Bull::new("Ferdinand")
        };
        let location = Location {
            id: "loc-1".into(),
            ..Location::new("Paddock A", "bull-1")
        };
        let cow = Cow {
            id: "cow-1".into(),
            ..Cow::new("1111", "2020-03-01", "loc-1")
        };
        let older = Calf {
            id: "calf-1".into(),
            ..NewCalf::new("1001", Sex::Female, "cow-1", "2023-01-01").into_calf("bull-1".into())
        };
        let newer = Calf {
            id: "calf-2".into(),
            ..NewCalf::new("1002", Sex::Male, "cow-1", "2024-01-01").into_calf("bull-9".into())
        };
        let orphan = Calf {
            id: "calf-3".into(),
            ..NewCalf::new("1003", Sex::Male, "cow-404", "2024-02-01").into_calf("bull-1".into())
        };

        Snapshot {
            bulls: vec![bull],
            locations: vec![location],
            cows: vec![cow],
            calves: vec![older, newer, orphan],
            treatments: vec![],
        }
    }

    #[test]
    fn test_joins() {
        let snapshot = snapshot();
        let relations = Relations::new(&snapshot);
        let calf = snapshot.calf("calf-1").unwrap();

        let mother = relations.mother_of(calf).unwrap();
        assert_eq!(mother.dib, "1111");
        let location = relations.location_of(mother).unwrap();
        assert_eq!(relations.bull_of(location).unwrap().name, "Ferdinand");
        assert_eq!(relations.sire_of(calf).unwrap().id, "bull-1");
    }

    #[test]
    fn test_dangling_references_are_none() {
        let snapshot = snapshot();
        let relations = Relations::new(&snapshot);

        let orphan = snapshot.calf("calf-3").unwrap();
        assert!(relations.mother_of(orphan).is_none());
        assert!(relations
            .location_of_animal(&AnimalRef::Calf("calf-3".into()))
            .is_none());

        let unknown_sire = snapshot.calf("calf-2").unwrap();
        assert!(relations.sire_of(unknown_sire).is_none());
        assert!(relations.animal_label(&AnimalRef::Cow("cow-404".into())).is_none());
    }

    #[test]
    fn test_calves_of_newest_first() {
        let snapshot = snapshot();
        let relations = Relations::new(&snapshot);
        let cow = snapshot.cow("cow-1").unwrap();

        let dibs: Vec<&str> = relations
            .calves_of(cow)
            .iter()
            .map(|c| c.dib.as_str())
            .collect();
        assert_eq!(dibs, vec!["1002", "1001"]);
    }

    #[test]
    fn test_location_of_animal() {
        let snapshot = snapshot();
        let relations = Relations::new(&snapshot);

        for animal in [
            AnimalRef::Cow("cow-1".into()),
            AnimalRef::Calf("calf-1".into()),
            AnimalRef::Bull("bull-1".into()),
        ] {
            assert_eq!(relations.location_of_animal(&animal).unwrap().id, "loc-1");
        }
        assert_eq!(
            relations.animal_label(&AnimalRef::Bull("bull-1".into())).unwrap(),
            "Bull Ferdinand"
        );
    }
}
