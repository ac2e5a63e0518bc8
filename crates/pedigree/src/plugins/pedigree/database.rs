//! Pedigree database implementation
//!
//! Stores person records in input order together with the partnership set
//! derived from their `mate` fields. Cloning a database deep-copies every
//! record, which is how the engine keeps its working copy and its original
//! snapshot apart.

use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace, warn};

use crate::core::{GridPos, PedigreeError, Person};

/// An undirected partnership between two persons
///
/// The ids are stored sorted, so `Partnership::new("B", "A")` and
/// `Partnership::new("A", "B")` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partnership {
    first: String,
    second: String,
}

impl Partnership {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, id: &str) -> bool {
        self.first == id || self.second == id
    }

    /// The sorted ids joined, unique per pair
    pub fn key(&self) -> String {
        format!("{}+{}", self.first, self.second)
    }
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.first, self.second)
    }
}

/// A reference to an id that no person in the dataset carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Person holding the reference
    pub person: String,
    /// `mate` or `parents`
    pub field: &'static str,
    /// The unresolved id
    pub target: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} references unknown person '{}'",
            self.person, self.field, self.target
        )
    }
}

/// Pedigree database
///
/// Maintains insertion order for deterministic layout and rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PedigreeDatabase {
    /// Persons in input order
    persons: Vec<Person>,
    /// Person id to index in `persons`
    index: HashMap<String, usize>,
    /// Unique partnerships in first-declaration order
    partnerships: Vec<Partnership>,
}

impl PedigreeDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from records, normalizing partnerships
    pub fn from_persons(persons: impl IntoIterator<Item = Person>) -> Result<Self, PedigreeError> {
        let mut database = Self::new();
        for person in persons {
            database.add_person(person)?;
        }

        let probands = database.persons.iter().filter(|p| p.is_proband).count();
        if probands > 1 {
            warn!(probands, "More than one person is flagged as proband");
        }
        debug!(
            person_count = database.len(),
            partnership_count = database.partnerships.len(),
            "Loaded pedigree dataset"
        );
        Ok(database)
    }

    /// Add a person, registering its partnership if it declares a mate
    pub fn add_person(&mut self, person: Person) -> Result<(), PedigreeError> {
        if self.index.contains_key(&person.id) {
            return Err(PedigreeError::dataset_error(format!(
                "duplicate person id '{}'",
                person.id
            )));
        }

        if let Some(mate) = &person.mate {
            if *mate == person.id {
                warn!(id = %person.id, "Ignoring self-partnership");
            } else {
                let partnership = Partnership::new(person.id.as_str(), mate.as_str());
                if !self.partnerships.contains(&partnership) {
                    trace!(%partnership, "Registered partnership");
                    self.partnerships.push(partnership);
                }
            }
        }

        self.index.insert(person.id.clone(), self.persons.len());
        self.persons.push(person);
        Ok(())
    }

    /// Get a person by id
    pub fn get(&self, id: &str) -> Option<&Person> {
        self.index.get(id).map(|&i| &self.persons[i])
    }

    /// Position of a person in input order
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All persons in input order
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// Unique partnerships in first-declaration order
    pub fn partnerships(&self) -> &[Partnership] {
        &self.partnerships
    }

    /// Move a person to a new grid position
    ///
    /// Returns false when the id is unknown.
    pub fn set_position(&mut self, id: &str, pos: GridPos) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.persons[i].pos = pos;
                true
            }
            None => false,
        }
    }

    /// Exchange the horizontal grid positions of two persons by index
    pub fn swap_x(&mut self, a: usize, b: usize) {
        let xa = self.persons[a].pos.x;
        self.persons[a].pos.x = self.persons[b].pos.x;
        self.persons[b].pos.x = xa;
    }

    /// Deep copy of every record
    pub fn snapshot(&self) -> Vec<Person> {
        self.persons.clone()
    }

    /// References to ids that are not in the dataset
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for person in &self.persons {
            if let Some(mate) = &person.mate {
                if !self.contains(mate) {
                    dangling.push(DanglingReference {
                        person: person.id.clone(),
                        field: "mate",
                        target: mate.clone(),
                    });
                }
            }
            if let Some(parents) = &person.parents {
                let mut seen = HashSet::new();
                for parent in parents {
                    if !self.contains(parent) && seen.insert(parent.as_str()) {
                        dangling.push(DanglingReference {
                            person: person.id.clone(),
                            field: "parents",
                            target: parent.clone(),
                        });
                    }
                }
            }
        }
        dangling
    }

    /// Get the number of persons
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Clear all data
    pub fn clear(&mut self) {
        self.persons.clear();
        self.index.clear();
        self.partnerships.clear();
    }
}
