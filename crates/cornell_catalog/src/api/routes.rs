//! Mapping from catalog record types to the API routes that serve them.

use super::error::CatalogError;
use super::types::{AcademicCareer, AcademicGroup, Class, ClassLevel, Roster, Subject};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// Every record type the class roster API can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Roster,
    AcademicCareer,
    AcademicGroup,
    ClassLevel,
    Subject,
    Class,
}

/// Where a record type lives: the route (without `.json`) and the key under
/// `data` holding the record array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiRoute {
    pub route: &'static str,
    pub data_key: &'static str,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Roster,
        RecordKind::AcademicCareer,
        RecordKind::AcademicGroup,
        RecordKind::ClassLevel,
        RecordKind::Subject,
        RecordKind::Class,
    ];

    /// Returns the route for this record type.
    pub const fn route(self) -> ApiRoute {
        match self {
            RecordKind::Roster => ApiRoute {
                route: "config/rosters",
                data_key: "rosters",
            },
            RecordKind::AcademicCareer => ApiRoute {
                route: "config/acadCareers",
                data_key: "acadCareers",
            },
            RecordKind::AcademicGroup => ApiRoute {
                route: "config/acadGroups",
                data_key: "acadGroups",
            },
            RecordKind::ClassLevel => ApiRoute {
                route: "config/classLevels",
                data_key: "classLevels",
            },
            RecordKind::Subject => ApiRoute {
                route: "config/subjects",
                data_key: "subjects",
            },
            RecordKind::Class => ApiRoute {
                route: "search/classes",
                data_key: "classes",
            },
        }
    }

    /// Name used on the command line and in log output.
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::Roster => "rosters",
            RecordKind::AcademicCareer => "acad-careers",
            RecordKind::AcademicGroup => "acad-groups",
            RecordKind::ClassLevel => "class-levels",
            RecordKind::Subject => "subjects",
            RecordKind::Class => "classes",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RecordKind::ALL
            .into_iter()
            .find(|kind| {
                kind.name() == wanted || kind.route().data_key.eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| CatalogError::UnregisteredType {
                name: s.to_string(),
            })
    }
}

/// A record type that can be fetched through [`super::CatalogFetcher`].
///
/// Implementing this trait is what registers a type with the route map, so a
/// type without a route cannot be passed to the fetcher at all.
pub trait CatalogRecord: DeserializeOwned + Send + 'static {
    const KIND: RecordKind;
}

impl CatalogRecord for Roster {
    const KIND: RecordKind = RecordKind::Roster;
}

impl CatalogRecord for AcademicCareer {
    const KIND: RecordKind = RecordKind::AcademicCareer;
}

impl CatalogRecord for AcademicGroup {
    const KIND: RecordKind = RecordKind::AcademicGroup;
}

impl CatalogRecord for ClassLevel {
    const KIND: RecordKind = RecordKind::ClassLevel;
}

impl CatalogRecord for Subject {
    const KIND: RecordKind = RecordKind::Subject;
}

impl CatalogRecord for Class {
    const KIND: RecordKind = RecordKind::Class;
}

/// Optional query filters for a fetch. Absent filters are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub roster: Option<String>,
    pub subject: Option<String>,
}

impl Filters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn roster(slug: impl Into<String>) -> Self {
        Self {
            roster: Some(slug.into()),
            subject: None,
        }
    }

    pub fn roster_subject(slug: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            roster: Some(slug.into()),
            subject: Some(subject.into()),
        }
    }

    /// Query pairs for the filters that are present, in a fixed order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(roster) = &self.roster {
            pairs.push(("roster", roster.as_str()));
        }
        if let Some(subject) = &self.subject {
            pairs.push(("subject", subject.as_str()));
        }
        pairs
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return f.write_str("no filters");
        }
        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        f.write_str(&rendered.join(" "))
    }
}
