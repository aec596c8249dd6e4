//! Per-scrape collection of PBX metrics.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pbx_common::source::{FetchError, PbxSource, Source};
use tracing::{debug, error, warn};

use crate::catalog::{self, MetricDesc};
use crate::sample::Sample;
use crate::translate::{service_samples, status_samples, trunk_sample};

/// Stateless collector that turns PBX snapshots into samples on demand.
///
/// Nothing is cached between scrapes: each call to [`PbxCollector::collect`]
/// queries every source again.
pub struct PbxCollector<S> {
    source: S,
    fetch_timeout: Duration,
}

impl<S: PbxSource> PbxCollector<S> {
    /// Create a collector over the given source.
    ///
    /// Each fetch is bounded by `fetch_timeout`.
    pub fn new(source: S, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
        }
    }

    /// The metric families this collector may emit.
    ///
    /// Does not contact the PBX.
    pub fn describe(&self) -> &'static [&'static MetricDesc] {
        catalog::catalog()
    }

    /// Run one scrape.
    pub async fn collect(&self) -> Vec<Sample> {
        self.collect_at(Utc::now()).await
    }

    /// Run one scrape with derived durations computed against `now`.
    ///
    /// Sources are attempted in a fixed order. A failing source is logged and
    /// skipped. An authentication failure of the status fetch ends the scrape
    /// with no samples and without querying the other sources.
    pub async fn collect_at(&self, now: DateTime<Utc>) -> Vec<Sample> {
        let mut samples = Vec::new();

        match self.fetch(self.source.system_status()).await {
            Ok(status) => samples.extend(status_samples(&status, now)),
            Err(e) if e.is_fatal() => {
                error!(
                    source = %Source::SystemStatus,
                    error = %e,
                    "Authentication failed, aborting scrape"
                );
                return Vec::new();
            }
            Err(e) => skip(Source::SystemStatus, &e),
        }

        match self.fetch(self.source.services()).await {
            Ok(services) => samples.extend(services.iter().flat_map(service_samples)),
            Err(e) => skip(Source::ServiceList, &e),
        }

        match self.fetch(self.source.trunks()).await {
            Ok(trunks) => samples.extend(trunks.iter().map(trunk_sample)),
            Err(e) => skip(Source::TrunkList, &e),
        }

        debug!(samples = samples.len(), "Scrape complete");
        samples
    }

    /// Await a fetch, bounded by the configured deadline.
    async fn fetch<T>(
        &self,
        fut: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        tokio::time::timeout(self.fetch_timeout, fut)
            .await
            .unwrap_or(Err(FetchError::Timeout(self.fetch_timeout)))
    }
}

/// Log a failed source that is left out of this scrape.
fn skip(source: Source, error: &FetchError) {
    warn!(source = %source, error = %error, "Failed to fetch {}", source);
}

/// Create a shareable collector handle.
pub type SharedCollector<S> = Arc<PbxCollector<S>>;
