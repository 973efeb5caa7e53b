/// Class roster API: typed fetching and catalog collection
mod aggregate;
mod client;
mod coerce;
mod collect;
mod config;
mod error;
mod routes;
mod types;

pub use aggregate::{
    CatalogData, CatalogSnapshot, RosterAccumulator, RosterSnapshot, SubjectClasses,
    SubjectSnapshot,
};
pub use client::{decode_envelope, extract_records, CatalogFetcher};
pub use coerce::{parse_timestamp, parse_us_date, parse_us_time, US_DATE_FORMAT, US_TIME_FORMAT};
pub use collect::CatalogCollector;
pub use config::{
    CatalogConfig, DEFAULT_DOWNLOAD_LIMIT, DOWNLOAD_LIMIT_KEY, HOST_KEY, SCHEME_KEY, VERSION_KEY,
};
pub use error::{CatalogError, FetchRequest};
pub use routes::{ApiRoute, CatalogRecord, Filters, RecordKind};
pub use types::*;
