//! HTTP client for the class roster API.
//!
//! Every route answers with the same envelope:
//! `{"status": "...", "data": {"<key>": [ ...records... ]}}`.
//! The fetcher resolves the route for a record type, sends one GET, checks the
//! envelope and decodes every record, failing on the first bad one.

use super::config::CatalogConfig;
use super::error::{CatalogError, FetchRequest};
use super::routes::{CatalogRecord, Filters, RecordKind};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Typed fetcher for the class roster API.
///
/// Holds one connection pool; clone it freely, clones share the pool.
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    client: Client,
    config: CatalogConfig,
}

impl CatalogFetcher {
    /// Creates a fetcher with its own HTTP client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::InvalidConfig {
                key: "http_client".to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a fetcher around an existing HTTP client.
    pub fn with_client(client: Client, config: CatalogConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetches every record of type `T` matching `filters`.
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - All records, possibly none
    /// * `Err(CatalogError::Transport)` - If the request failed or the status was not 2xx
    /// * `Err(CatalogError::Envelope)` - If `data` or the route's key is missing
    /// * `Err(CatalogError::Decode)` - If any record does not match `T`
    pub async fn fetch<T: CatalogRecord>(&self, filters: &Filters) -> Result<Vec<T>, CatalogError> {
        let request = self.build_request(T::KIND, filters)?;
        let body = self.get_json(&request).await?;
        decode_envelope(body, &request)
    }

    /// Fetches the raw JSON records of `kind` without decoding them.
    ///
    /// The envelope is still checked.
    pub async fn fetch_raw(
        &self,
        kind: RecordKind,
        filters: &Filters,
    ) -> Result<Vec<Value>, CatalogError> {
        let request = self.build_request(kind, filters)?;
        let body = self.get_json(&request).await?;
        extract_records(body, &request)
    }

    /// Builds the full URL, adding only the filters that are present.
    pub fn build_request(
        &self,
        kind: RecordKind,
        filters: &Filters,
    ) -> Result<FetchRequest, CatalogError> {
        let raw = self.config.route_url(kind.route().route);
        let mut url = Url::parse(&raw).map_err(|e| CatalogError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;

        let pairs = filters.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(FetchRequest {
            kind,
            filters: filters.clone(),
            url: url.into(),
        })
    }

    /// Sends the GET and parses the body as JSON.
    async fn get_json(&self, request: &FetchRequest) -> Result<Value, CatalogError> {
        let start = Instant::now();
        debug!(kind = %request.kind, filters = %request.filters, url = %request.url, "Fetching");

        let transport_error = |status: Option<u16>, message: String| CatalogError::Transport {
            request: Box::new(request.clone()),
            status,
            message,
        };

        let response = self
            .client
            .get(&request.url)
            .send()
            .await
            .map_err(|e| transport_error(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %request.url, status = %status, "Request returned non-success status");
            return Err(transport_error(
                Some(status.as_u16()),
                format!("HTTP status {}", status),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(Some(status.as_u16()), e.to_string()))?;

        debug!(
            url = %request.url,
            bytes = bytes.len(),
            duration_ms = elapsed_ms(start.elapsed()),
            "Fetched"
        );

        serde_json::from_slice(&bytes).map_err(|e| CatalogError::Envelope {
            request: Box::new(request.clone()),
            reason: format!("body is not JSON: {}", e),
        })
    }
}

/// Pulls the record array out of a response body.
///
/// A missing `data` object or a missing key under it is an error, not an
/// empty result: the API always sends the key, with `[]` when nothing matches.
pub fn extract_records(body: Value, request: &FetchRequest) -> Result<Vec<Value>, CatalogError> {
    let envelope_error = |reason: String| CatalogError::Envelope {
        request: Box::new(request.clone()),
        reason,
    };
    let data_key = request.kind.route().data_key;

    let Value::Object(mut root) = body else {
        return Err(envelope_error("body is not a JSON object".to_string()));
    };

    let Some(Value::Object(mut data)) = root.remove("data") else {
        return Err(envelope_error("missing `data` object".to_string()));
    };

    match data.remove(data_key) {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(envelope_error(format!("`data.{data_key}` is not an array"))),
        None => Err(envelope_error(format!("missing `data.{data_key}`"))),
    }
}

/// Checks the envelope and decodes every record into `T`.
pub fn decode_envelope<T: CatalogRecord>(
    body: Value,
    request: &FetchRequest,
) -> Result<Vec<T>, CatalogError> {
    extract_records(body, request)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|e| CatalogError::Decode {
                request: Box::new(request.clone()),
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

pub(crate) fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{fixtures, Roster, Subject};
    use serde_json::json;

    fn fetcher() -> CatalogFetcher {
        CatalogFetcher::new(CatalogConfig::new("classes.cornell.edu", "2.0")).unwrap()
    }

    fn roster_request() -> FetchRequest {
        fetcher()
            .build_request(RecordKind::Roster, &Filters::none())
            .unwrap()
    }

    #[test]
    fn test_url_without_filters_has_no_query() {
        let request = roster_request();
        assert_eq!(request.url, "https://classes.cornell.edu/api/2.0/config/rosters.json");
    }

    #[test]
    fn test_url_with_filters() {
        let request = fetcher()
            .build_request(RecordKind::Class, &Filters::roster_subject("SU24", "WRIT"))
            .unwrap();
        assert_eq!(
            request.url,
            "https://classes.cornell.edu/api/2.0/search/classes.json?roster=SU24&subject=WRIT"
        );

        let request = fetcher()
            .build_request(RecordKind::Subject, &Filters::roster("FA 24&x"))
            .unwrap();
        assert_eq!(
            request.url,
            "https://classes.cornell.edu/api/2.0/config/subjects.json?roster=FA+24%26x"
        );
    }

    #[test]
    fn test_bad_host_is_invalid_url() {
        let fetcher = CatalogFetcher::new(CatalogConfig::new("not a host", "2.0")).unwrap();
        let err = fetcher
            .build_request(RecordKind::Roster, &Filters::none())
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUrl { .. }));
    }

    #[test]
    fn test_empty_list_is_success() {
        let body = json!({"status": "success", "data": {"rosters": []}});
        let rosters: Vec<Roster> = decode_envelope(body, &roster_request()).unwrap();
        assert!(rosters.is_empty());
    }

    #[test]
    fn test_missing_key_is_envelope_error() {
        let err = decode_envelope::<Roster>(json!({"data": {}}), &roster_request()).unwrap_err();
        match err {
            CatalogError::Envelope { reason, request } => {
                assert_eq!(reason, "missing `data.rosters`");
                assert_eq!(request.kind, RecordKind::Roster);
            }
            other => panic!("expected envelope error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_is_envelope_error() {
        for body in [
            json!({"status": "error", "message": "roster not found"}),
            json!({"data": null}),
            json!({"data": []}),
            json!([]),
        ] {
            let err = decode_envelope::<Roster>(body, &roster_request()).unwrap_err();
            assert!(matches!(err, CatalogError::Envelope { .. }), "{err:?}");
        }
    }

    #[test]
    fn test_non_array_payload_is_envelope_error() {
        let body = json!({"data": {"rosters": {}}});
        let err = decode_envelope::<Roster>(body, &roster_request()).unwrap_err();
        assert!(err.to_string().contains("is not an array"));
    }

    #[test]
    fn test_first_bad_record_fails_whole_call() {
        let request = fetcher()
            .build_request(RecordKind::Subject, &Filters::roster("FA24"))
            .unwrap();
        let body = json!({"data": {"subjects": [
            fixtures::subject("CS"),
            {"value": "MATH"},
            fixtures::subject("WRIT"),
        ]}});
        let err = decode_envelope::<Subject>(body, &request).unwrap_err();
        match err {
            CatalogError::Decode { index, .. } => assert_eq!(index, 1),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decodes_all_records_in_order() {
        let request = fetcher()
            .build_request(RecordKind::Subject, &Filters::roster("FA24"))
            .unwrap();
        let body = json!({"data": {"subjects": [
            fixtures::subject("CS"),
            fixtures::subject("MATH"),
        ]}});
        let subjects: Vec<Subject> = decode_envelope(body, &request).unwrap();
        let values: Vec<&str> = subjects.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["CS", "MATH"]);
    }
}
