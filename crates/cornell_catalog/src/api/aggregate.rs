//! The roster → subject → classes catalog produced by a collection run.

use super::types::{Class, Roster, Subject};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;

/// Classes of one roster, keyed by subject.
pub type SubjectClasses = HashMap<Subject, Vec<Class>>;

/// Every class of every subject of every roster.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    rosters: HashMap<Roster, SubjectClasses>,
}

impl CatalogData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rosters.
    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    /// Adds a completed roster. Returns the previous subjects if the roster
    /// was already present.
    pub fn insert_roster(
        &mut self,
        roster: Roster,
        subjects: SubjectClasses,
    ) -> Option<SubjectClasses> {
        self.rosters.insert(roster, subjects)
    }

    pub fn rosters(&self) -> impl Iterator<Item = &Roster> {
        self.rosters.keys()
    }

    pub fn roster(&self, slug: &str) -> Option<&Roster> {
        self.rosters.keys().find(|r| r.slug == slug)
    }

    /// Subjects and their classes for the roster `slug`.
    pub fn subjects(&self, slug: &str) -> Option<&SubjectClasses> {
        self.rosters
            .iter()
            .find(|(r, _)| r.slug == slug)
            .map(|(_, subjects)| subjects)
    }

    /// Classes of `subject` in the roster `slug`.
    pub fn classes(&self, slug: &str, subject: &str) -> Option<&[Class]> {
        self.subjects(slug)?
            .iter()
            .find(|(s, _)| s.value == subject)
            .map(|(_, classes)| classes.as_slice())
    }

    /// Total number of classes across all rosters and subjects.
    pub fn class_count(&self) -> usize {
        self.rosters
            .values()
            .flat_map(|subjects| subjects.values())
            .map(Vec::len)
            .sum()
    }

    pub fn into_inner(self) -> HashMap<Roster, SubjectClasses> {
        self.rosters
    }

    /// Serializable view ordered by roster slug, then subject value.
    pub fn snapshot(&self) -> CatalogSnapshot<'_> {
        let mut rosters: Vec<RosterSnapshot<'_>> = self
            .rosters
            .iter()
            .map(|(roster, subjects)| {
                let mut subjects: Vec<SubjectSnapshot<'_>> = subjects
                    .iter()
                    .map(|(subject, classes)| SubjectSnapshot { subject, classes })
                    .collect();
                subjects.sort_by(|a, b| a.subject.value.cmp(&b.subject.value));
                RosterSnapshot { roster, subjects }
            })
            .collect();
        rosters.sort_by(|a, b| a.roster.slug.cmp(&b.roster.slug));
        CatalogSnapshot { rosters }
    }
}

impl From<HashMap<Roster, SubjectClasses>> for CatalogData {
    fn from(rosters: HashMap<Roster, SubjectClasses>) -> Self {
        Self { rosters }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogSnapshot<'a> {
    pub rosters: Vec<RosterSnapshot<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RosterSnapshot<'a> {
    pub roster: &'a Roster,
    pub subjects: Vec<SubjectSnapshot<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SubjectSnapshot<'a> {
    pub subject: &'a Subject,
    pub classes: &'a [Class],
}

/// Collects the classes of one roster from concurrent fetch tasks.
///
/// Each task writes a different subject, so DashMap's sharded locking is the
/// only synchronization needed.
#[derive(Debug, Default)]
pub struct RosterAccumulator {
    subjects: DashMap<Subject, Vec<Class>>,
}

impl RosterAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the classes of `subject`. Returns true if the subject was
    /// already present, which means the API listed it twice.
    pub fn insert(&self, subject: Subject, classes: Vec<Class>) -> bool {
        self.subjects.insert(subject, classes).is_some()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn into_subjects(self) -> SubjectClasses {
        self.subjects.into_iter().collect()
    }
}
