//! In-process stand-in for the class roster API.

#![allow(dead_code)]

use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cornell_catalog::api::CatalogConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API_VERSION: &str = "v1";

/// Canned catalog served by [`MockApi`].
#[derive(Debug, Default)]
pub struct MockCatalog {
    /// Roster slugs in the order the API lists them
    pub rosters: Vec<String>,
    /// Subject codes per roster slug
    pub subjects: HashMap<String, Vec<String>>,
    /// Number of classes returned for every (roster, subject)
    pub classes_per_subject: usize,
    /// Delay before answering each class request
    pub class_delay: Duration,
    /// (roster, subject) pairs whose class request answers 500
    pub failing_classes: Vec<(String, String)>,
    /// Replacement bodies per route name, e.g. `"rosters"`
    pub overrides: HashMap<&'static str, (StatusCode, Value)>,
}

impl MockCatalog {
    pub fn with_rosters(rosters: Vec<(&str, Vec<&str>)>) -> Self {
        Self {
            rosters: rosters.iter().map(|(slug, _)| slug.to_string()).collect(),
            subjects: rosters
                .iter()
                .map(|(slug, subjects)| {
                    (slug.to_string(), subjects.iter().map(|s| s.to_string()).collect())
                })
                .collect(),
            classes_per_subject: 2,
            ..Self::default()
        }
    }
}

/// Observations made by the mock while serving requests.
#[derive(Debug, Default)]
pub struct MockStats {
    pub in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub class_requests: AtomicUsize,
    /// (route name, raw query string) of every request
    pub queries: Mutex<Vec<(&'static str, Option<String>)>>,
}

impl MockStats {
    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn queries_for(&self, route: &str) -> Vec<Option<String>> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == route)
            .map(|(_, q)| q.clone())
            .collect()
    }
}

struct MockState {
    catalog: MockCatalog,
    stats: Arc<MockStats>,
}

pub struct MockApi {
    pub addr: SocketAddr,
    pub stats: Arc<MockStats>,
}

impl MockApi {
    pub async fn start(catalog: MockCatalog) -> Self {
        let stats = Arc::new(MockStats::default());
        let state = Arc::new(MockState {
            catalog,
            stats: stats.clone(),
        });

        let app = Router::new()
            .route("/api/v1/config/rosters.json", get(rosters))
            .route("/api/v1/config/subjects.json", get(subjects))
            .route("/api/v1/config/classLevels.json", get(class_levels))
            .route("/api/v1/search/classes.json", get(classes))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, stats }
    }

    pub fn config(&self) -> CatalogConfig {
        CatalogConfig::new(self.addr.to_string(), API_VERSION).with_scheme("http")
    }
}

fn record(state: &MockState, route: &'static str, raw: Option<String>) -> Option<Response> {
    state.stats.queries.lock().unwrap().push((route, raw));
    state
        .catalog
        .overrides
        .get(route)
        .map(|(status, body)| (*status, Json(body.clone())).into_response())
}

fn envelope(key: &str, records: Vec<Value>) -> Response {
    Json(json!({ "status": "success", "data": { key: records } })).into_response()
}

async fn rosters(State(state): State<Arc<MockState>>, RawQuery(raw): RawQuery) -> Response {
    if let Some(response) = record(&state, "rosters", raw) {
        return response;
    }
    let rosters: Vec<Value> = state
        .catalog
        .rosters
        .iter()
        .map(|slug| roster_json(slug))
        .collect();
    envelope("rosters", rosters)
}

async fn subjects(
    State(state): State<Arc<MockState>>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = record(&state, "subjects", raw) {
        return response;
    }
    let Some(slug) = params.get("roster") else {
        return (StatusCode::BAD_REQUEST, "roster is required").into_response();
    };
    let subjects: Vec<Value> = state
        .catalog
        .subjects
        .get(slug)
        .map(|codes| codes.iter().map(|code| subject_json(code)).collect())
        .unwrap_or_default();
    envelope("subjects", subjects)
}

async fn class_levels(State(state): State<Arc<MockState>>, RawQuery(raw): RawQuery) -> Response {
    if let Some(response) = record(&state, "classLevels", raw) {
        return response;
    }
    envelope(
        "classLevels",
        vec![
            json!({"value": "1000", "descr": "1000"}),
            json!({"value": "2000", "descr": 2000}),
        ],
    )
}

async fn classes(
    State(state): State<Arc<MockState>>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let stats = &state.stats;
    stats.class_requests.fetch_add(1, Ordering::SeqCst);
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.peak_in_flight.fetch_max(now, Ordering::SeqCst);

    if !state.catalog.class_delay.is_zero() {
        tokio::time::sleep(state.catalog.class_delay).await;
    }

    let response = if let Some(response) = record(&state, "classes", raw) {
        response
    } else {
        let roster = params.get("roster").cloned().unwrap_or_default();
        let subject = params.get("subject").cloned().unwrap_or_default();
        if state
            .catalog
            .failing_classes
            .iter()
            .any(|(r, s)| *r == roster && *s == subject)
        {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        } else {
            let classes = (0..state.catalog.classes_per_subject)
                .map(|i| class_json(&subject, &format!("{}", 1100 + i * 10)))
                .collect();
            envelope("classes", classes)
        }
    };

    stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    response
}

pub fn roster_json(slug: &str) -> Value {
    json!({
        "slug": slug,
        "isDefaultRoster": slug == "FA24",
        "strm": "2890",
        "descr": format!("Roster {slug}"),
        "descrshort": slug,
        "attributeSrc": "CRSE",
        "defaultSessionCode": "1",
        "defaultCampus": "MAIN",
        "defaultLocation": "ITH",
        "defaultInstructionMode": "P",
        "sharing": true,
        "archiveMode": false,
        "version": {
            "status": "published",
            "referenceDttm": "2024-03-20T10:34:52-0400",
            "catalogDttm": "2024-03-01T08:00:00-0500",
            "descriptionSource": "catalog",
            "showCatalogNote": false,
            "catalog": {
                "descrshort": "2024-2025",
                "descr": "Courses of Study 2024-2025",
                "acalogCatalogId": "56",
                "version": { "status": "current" }
            }
        },
        "lastModifiedDttm": "2024-04-02T15:00:00-0400",
        "classMaterialSupport": true,
        "classMaterialAutoAction": "N"
    })
}

pub fn subject_json(code: &str) -> Value {
    json!({
        "value": code,
        "descr": format!("{code} Department"),
        "descrformal": format!("Department of {code}")
    })
}

pub fn class_json(subject: &str, catalog_nbr: &str) -> Value {
    json!({
        "strm": 2890,
        "crseId": 100_001,
        "crseOfferNbr": 1,
        "subject": subject,
        "catalogNbr": catalog_nbr,
        "titleShort": format!("{subject} {catalog_nbr}"),
        "titleLong": format!("{subject} {catalog_nbr} long title"),
        "enrollGroups": [{
            "classSections": [{
                "ssrComponent": "LEC",
                "ssrComponentLong": "Lecture",
                "section": "001",
                "classNbr": 12_345,
                "meetings": [{
                    "classMtgNbr": 1,
                    "timeStart": "01:25PM",
                    "timeEnd": "TBA",
                    "startDt": "01/21/2025",
                    "endDt": "05/06/2025",
                    "instructors": [],
                    "pattern": "TR",
                    "facilityDescr": null,
                    "bldgDescr": null,
                    "facilityDescrshort": null,
                    "meetingTopicDescription": null
                }],
                "notes": [],
                "campus": "MAIN",
                "campusDescr": "Main Campus",
                "location": "ITH",
                "locationDescr": "Ithaca, NY (Main Campus)",
                "startDt": "01/21/2025",
                "endDt": "05/06/2025",
                "addConsent": "N",
                "addConsentDescr": "No Special Consent Required",
                "isComponentGraded": true,
                "instructionMode": null,
                "instrModeDescrshort": null,
                "instrModeDescr": null,
                "topicDescription": "",
                "openStatus": null
            }],
            "unitsMinimum": 4,
            "unitsMaximum": 4,
            "componentsOptional": [],
            "componentsRequired": ["LEC"],
            "gradingBasis": "OPT",
            "gradingBasisShort": "Opt NoAud",
            "gradingBasisLong": "Student Option",
            "simpleCombinations": [],
            "sessionCode": "1",
            "sessionBeginDt": "01/21/2025",
            "sessionEndDt": "05/06/2025"
        }],
        "description": null,
        "catalogDistr": null,
        "catalogForbiddenOverlaps": null,
        "catalogWhenOffered": null,
        "catalogComments": null,
        "catalogPrereqCoreq": null,
        "catalogFee": null,
        "catalogSatisfiesReq": null,
        "catalogPermission": null,
        "catalogCourseSubfield": null,
        "catalogOutcomes": null,
        "acadCareer": "UG",
        "acadGroup": "AS"
    })
}
