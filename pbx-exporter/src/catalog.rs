//! The fixed set of metrics this exporter can ever emit.
//!
//! The catalog is advertised independently of data availability, so it is
//! a plain static table rather than something built from fetched data.

use serde::Serialize;

/// Prefix a metric name with the `pbx_` namespace at compile time.
macro_rules! metric_name {
    ($name:literal) => {
        concat!("pbx_", $name)
    };
}

/// Label carrying the service or trunk name.
pub const NAME_LABEL: &str = "name";

/// Prometheus value kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    /// Get the TYPE comment string for Prometheus exposition format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

/// Identity of one metric family.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct MetricDesc {
    /// Full metric name including the prefix.
    pub name: &'static str,
    /// Help text.
    pub help: &'static str,
    /// Value kind.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    /// Label names, in the order label values are supplied.
    pub labels: &'static [&'static str],
}

const NO_LABELS: &[&str] = &[];
const NAME_LABELS: &[&str] = &[NAME_LABEL];

const fn unlabeled(name: &'static str, help: &'static str, kind: MetricKind) -> MetricDesc {
    MetricDesc {
        name,
        help,
        kind,
        labels: NO_LABELS,
    }
}

const fn by_name(name: &'static str, help: &'static str) -> MetricDesc {
    MetricDesc {
        name,
        help,
        kind: MetricKind::Gauge,
        labels: NAME_LABELS,
    }
}

pub static BLACKLIST_SIZE: MetricDesc = unlabeled(
    metric_name!("blacklist_size"),
    "Number of blacklisted IP addresses",
    MetricKind::Gauge,
);
pub static CALLS_ACTIVE: MetricDesc = unlabeled(
    metric_name!("calls_active"),
    "Number of current active calls",
    MetricKind::Gauge,
);
pub static CALLS_LIMIT: MetricDesc = unlabeled(
    metric_name!("calls_limit"),
    "Maximum number of supported simultaneous calls",
    MetricKind::Gauge,
);
pub static EXTENSIONS_TOTAL: MetricDesc = unlabeled(
    metric_name!("extensions_total"),
    "Number of total extensions",
    MetricKind::Gauge,
);
pub static EXTENSIONS_REGISTERED: MetricDesc = unlabeled(
    metric_name!("extensions_registered"),
    "Number of registered extensions",
    MetricKind::Gauge,
);
// Exposed as counters for compatibility with existing dashboards, although
// both are signed point-in-time durations.
pub static BACKUP_AGE: MetricDesc = unlabeled(
    metric_name!("backup_age"),
    "Age of last backup in seconds",
    MetricKind::Counter,
);
pub static MAINTENANCE_REMAINING: MetricDesc = unlabeled(
    metric_name!("maintenance_remaining"),
    "Remaining time of maintenance in seconds",
    MetricKind::Counter,
);

pub static SERVICE_STATUS: MetricDesc = by_name(metric_name!("service_status"), "Status of service");
pub static SERVICE_CPU: MetricDesc = by_name(metric_name!("service_cpu"), "CPU usage of service");
pub static SERVICE_MEMORY: MetricDesc =
    by_name(metric_name!("service_memory"), "Memory usage of service");

pub static TRUNK_REGISTERED: MetricDesc =
    by_name(metric_name!("trunk_registered"), "Status of trunk");

/// All metric families, in emission order.
pub static CATALOG: [&MetricDesc; 11] = [
    &BLACKLIST_SIZE,
    &CALLS_ACTIVE,
    &CALLS_LIMIT,
    &EXTENSIONS_TOTAL,
    &EXTENSIONS_REGISTERED,
    &BACKUP_AGE,
    &MAINTENANCE_REMAINING,
    &SERVICE_STATUS,
    &SERVICE_CPU,
    &SERVICE_MEMORY,
    &TRUNK_REGISTERED,
];

/// Enumerate the catalog.
pub fn catalog() -> &'static [&'static MetricDesc] {
    &CATALOG
}

/// Look up a catalog entry by full metric name.
pub fn find(name: &str) -> Option<&'static MetricDesc> {
    CATALOG.iter().find(|desc| desc.name == name).copied()
}
