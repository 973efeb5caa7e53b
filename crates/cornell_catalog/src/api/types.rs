/// Records returned by the class roster API
///
/// Every record is decoded once from JSON and never modified afterwards.
/// Required fields must be present with the right type; extra keys are ignored.
use super::coerce::{
    deserialize_lenient_int, deserialize_nullable, deserialize_timestamp, deserialize_us_date,
    deserialize_us_time,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ** ROSTERS **

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterCatalogVersion {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterCatalog {
    pub descrshort: String,
    pub descr: String,
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub acalog_catalog_id: i64,
    pub version: RosterCatalogVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterVersion {
    pub status: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub reference_dttm: DateTime<FixedOffset>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub catalog_dttm: DateTime<FixedOffset>,
    pub description_source: String,
    pub show_catalog_note: bool,
    pub catalog: RosterCatalog,
}

/// An academic term, e.g. `FA24`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// Unique key of the roster, used as the `roster` filter
    pub slug: String,
    pub is_default_roster: bool,
    pub strm: String,
    pub descr: String,
    pub descrshort: String,
    pub attribute_src: String,
    pub default_session_code: String,
    pub default_campus: String,
    pub default_location: String,
    pub default_instruction_mode: String,
    pub sharing: bool,
    pub archive_mode: bool,
    pub version: RosterVersion,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_modified_dttm: DateTime<FixedOffset>,
    pub class_material_support: bool,
    pub class_material_auto_action: String,
}

// ** LOOKUP TABLES **

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicCareer {
    pub value: String,
    pub descr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicGroup {
    pub value: String,
    pub descr: String,
}

/// Course level such as `1000`; the API sends the level number as `descr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub value: String,
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub descr: i64,
}

// ** SUBJECTS **

/// A department offering classes in a roster, e.g. `CS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Subject code, used as the `subject` filter
    pub value: String,
    pub descr: String,
    pub descrformal: String,
}

// ** CLASSES **

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInstructor {
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub instr_assign_seq: i64,
    pub netid: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMeeting {
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub class_mtg_nbr: i64,
    /// `None` when the meeting has no scheduled start (e.g. `TBA`)
    #[serde(default, deserialize_with = "deserialize_us_time")]
    pub time_start: Option<NaiveTime>,
    #[serde(default, deserialize_with = "deserialize_us_time")]
    pub time_end: Option<NaiveTime>,
    #[serde(deserialize_with = "deserialize_us_date")]
    pub start_dt: NaiveDate,
    #[serde(deserialize_with = "deserialize_us_date")]
    pub end_dt: NaiveDate,
    pub instructors: Vec<ClassInstructor>,
    pub pattern: String,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub facility_descr: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub bldg_descr: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub facility_descrshort: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub meeting_topic_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNote {
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub class_notes_seq: i64,
    pub descrlong: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSection {
    pub ssr_component: String,
    pub ssr_component_long: String,
    pub section: String,
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub class_nbr: i64,
    pub meetings: Vec<ClassMeeting>,
    pub notes: Vec<ClassNote>,
    pub campus: String,
    pub campus_descr: String,
    pub location: String,
    pub location_descr: String,
    #[serde(deserialize_with = "deserialize_us_date")]
    pub start_dt: NaiveDate,
    #[serde(deserialize_with = "deserialize_us_date")]
    pub end_dt: NaiveDate,
    pub add_consent: String,
    pub add_consent_descr: String,
    pub is_component_graded: bool,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub instruction_mode: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub instr_mode_descrshort: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub instr_mode_descr: Option<String>,
    pub topic_description: String,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub open_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCombination {
    pub subject: String,
    pub catalog_nbr: String,
    #[serde(rename = "type")]
    pub combination_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollGroup {
    pub class_sections: Vec<ClassSection>,
    pub units_minimum: f64,
    pub units_maximum: f64,
    pub components_optional: Vec<String>,
    pub components_required: Vec<String>,
    pub grading_basis: String,
    pub grading_basis_short: String,
    pub grading_basis_long: String,
    pub simple_combinations: Vec<SimpleCombination>,
    pub session_code: String,
    #[serde(deserialize_with = "deserialize_us_date")]
    pub session_begin_dt: NaiveDate,
    #[serde(deserialize_with = "deserialize_us_date")]
    pub session_end_dt: NaiveDate,
}

/// A course offering with its enrollment groups, sections and meetings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub strm: i64,
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub crse_id: i64,
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub crse_offer_nbr: i64,
    pub subject: String,
    pub catalog_nbr: String,
    pub title_short: String,
    pub title_long: String,
    pub enroll_groups: Vec<EnrollGroup>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_distr: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_forbidden_overlaps: Option<String>,
    #[serde(default)]
    pub catalog_attribute: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_when_offered: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_comments: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_prereq_coreq: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_fee: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_satisfies_req: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_permission: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_course_subfield: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub catalog_outcomes: Option<Vec<String>>,
    pub acad_career: String,
    pub acad_group: String,
}

impl Class {
    /// Course code as printed in the catalog, e.g. `CS 2110`.
    pub fn course_code(&self) -> String {
        format!("{} {}", self.subject, self.catalog_nbr)
    }

    /// Iterates over every section of every enrollment group.
    pub fn sections(&self) -> impl Iterator<Item = &ClassSection> {
        self.enroll_groups.iter().flat_map(|g| g.class_sections.iter())
    }
}
