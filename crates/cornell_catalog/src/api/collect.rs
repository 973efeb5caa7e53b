//! Collects the whole catalog: rosters, then each roster's subjects, then the
//! classes of every subject.
//!
//! Rosters are walked one at a time. Within a roster, one task is spawned per
//! subject; a semaphore created for the run caps how many of those tasks may
//! have a request in flight, across all rosters. The first error aborts the
//! remaining tasks and ends the run.

use super::aggregate::{CatalogData, RosterAccumulator};
use super::client::{elapsed_ms, CatalogFetcher};
use super::error::CatalogError;
use super::routes::Filters;
use super::types::{Class, Roster, Subject};
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Walks the roster → subject → class graph with bounded concurrency.
#[derive(Debug, Clone)]
pub struct CatalogCollector {
    fetcher: CatalogFetcher,
    download_limit: usize,
}

impl CatalogCollector {
    /// Creates a collector using the fetcher's configured download limit.
    pub fn new(fetcher: CatalogFetcher) -> Self {
        let download_limit = fetcher.config().download_limit;
        Self::with_limit(fetcher, download_limit)
    }

    /// Creates a collector allowing at most `download_limit` concurrent class
    /// fetches. A limit of zero is raised to one.
    pub fn with_limit(fetcher: CatalogFetcher, download_limit: usize) -> Self {
        Self {
            fetcher,
            download_limit: download_limit.max(1),
        }
    }

    pub fn download_limit(&self) -> usize {
        self.download_limit
    }

    pub fn fetcher(&self) -> &CatalogFetcher {
        &self.fetcher
    }

    /// Fetches every roster, subject and class.
    ///
    /// # Returns
    /// * `Ok(CatalogData)` - Every fetched roster with an entry for each of its subjects;
    ///   empty if the API lists no rosters
    /// * `Err(CatalogError)` - The first fetch that failed; nothing partial is returned
    pub async fn collect_all(&self) -> Result<CatalogData, CatalogError> {
        let run_id = generate_run_id();
        let start = Instant::now();
        info!(
            run_id = %run_id,
            download_limit = self.download_limit,
            "Starting catalog collection"
        );

        let result = self.collect_rosters(&run_id).await;

        match &result {
            Ok(data) => info!(
                run_id = %run_id,
                rosters = data.len(),
                classes = data.class_count(),
                duration_ms = elapsed_ms(start.elapsed()),
                "Catalog collection completed"
            ),
            Err(e) => error!(
                run_id = %run_id,
                error = %e,
                duration_ms = elapsed_ms(start.elapsed()),
                "Catalog collection failed"
            ),
        }

        result
    }

    async fn collect_rosters(&self, run_id: &str) -> Result<CatalogData, CatalogError> {
        let rosters = self.fetch_rosters().await?;
        let mut data = CatalogData::new();

        if rosters.is_empty() {
            warn!(run_id = %run_id, "API listed no rosters");
            return Ok(data);
        }

        // One permit pool for the whole run, not per roster.
        let permits = Arc::new(Semaphore::new(self.download_limit));

        for roster in rosters {
            let subjects = self.fetch_roster_subjects(&roster).await?;
            info!(
                run_id = %run_id,
                roster = %roster.slug,
                subjects = subjects.len(),
                "Fetching classes for roster"
            );

            let accumulator = self.fetch_roster_classes(&roster, subjects, &permits).await?;
            if data.insert_roster(roster.clone(), accumulator.into_subjects()).is_some() {
                warn!(
                    run_id = %run_id,
                    roster = %roster.slug,
                    "Roster listed twice, keeping the latest"
                );
            }
        }

        Ok(data)
    }

    /// Fetches all rosters.
    pub async fn fetch_rosters(&self) -> Result<Vec<Roster>, CatalogError> {
        self.fetcher.fetch(&Filters::none()).await
    }

    /// Fetches the subjects of one roster.
    pub async fn fetch_roster_subjects(
        &self,
        roster: &Roster,
    ) -> Result<Vec<Subject>, CatalogError> {
        self.fetcher.fetch(&Filters::roster(&roster.slug)).await
    }

    /// Fetches the classes of one subject in one roster.
    pub async fn fetch_roster_subject_classes(
        &self,
        roster: &Roster,
        subject: &Subject,
    ) -> Result<Vec<Class>, CatalogError> {
        fetch_subject_classes(&self.fetcher, &roster.slug, subject).await
    }

    /// Fans out one task per subject, each holding a permit from `permits`
    /// while its request is in flight.
    async fn fetch_roster_classes(
        &self,
        roster: &Roster,
        subjects: Vec<Subject>,
        permits: &Arc<Semaphore>,
    ) -> Result<RosterAccumulator, CatalogError> {
        let accumulator = Arc::new(RosterAccumulator::new());
        let mut tasks = JoinSet::new();

        for subject in subjects {
            let fetcher = self.fetcher.clone();
            let permits = permits.clone();
            let accumulator = accumulator.clone();
            let slug = roster.slug.clone();

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| CatalogError::TaskFailed {
                        message: format!("download limiter closed: {}", e),
                    })?;

                let classes = fetch_subject_classes(&fetcher, &slug, &subject).await?;
                let value = subject.value.clone();
                if accumulator.insert(subject, classes) {
                    warn!(
                        roster = %slug,
                        subject = %value,
                        "Subject listed twice, keeping the latest"
                    );
                }
                Ok::<(), CatalogError>(())
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(CatalogError::from).and_then(|result| result);
            if let Err(e) = outcome {
                // Stop the requests that are still queued or in flight.
                tasks.abort_all();
                return Err(e);
            }
        }

        Arc::try_unwrap(accumulator).map_err(|_| CatalogError::TaskFailed {
            message: format!(
                "classes of roster {} still shared after all tasks finished",
                roster.slug
            ),
        })
    }
}

async fn fetch_subject_classes(
    fetcher: &CatalogFetcher,
    slug: &str,
    subject: &Subject,
) -> Result<Vec<Class>, CatalogError> {
    let start = Instant::now();
    let classes = fetcher
        .fetch(&Filters::roster_subject(slug, &subject.value))
        .await?;
    debug!(
        roster = %slug,
        subject = %subject.value,
        classes = classes.len(),
        duration_ms = elapsed_ms(start.elapsed()),
        "Fetched classes"
    );
    Ok(classes)
}

/// Generates a short id tying together the log lines of one run.
fn generate_run_id() -> String {
    let random: u32 = rand::thread_rng().gen();
    format!("{:08x}", random)
}
