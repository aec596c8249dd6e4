//! Mapping from PBX snapshots to samples.

use chrono::{DateTime, Utc};
use pbx_common::snapshot::{Service, SystemStatus, Trunk};

use crate::catalog::{
    BACKUP_AGE, BLACKLIST_SIZE, CALLS_ACTIVE, CALLS_LIMIT, EXTENSIONS_REGISTERED,
    EXTENSIONS_TOTAL, MAINTENANCE_REMAINING, SERVICE_CPU, SERVICE_MEMORY, SERVICE_STATUS,
    TRUNK_REGISTERED,
};
use crate::sample::{Sample, seconds_or_absent};

/// Translate the system status into its seven unlabeled samples.
///
/// `now` is the instant captured at the start of the scrape. Durations are
/// not clamped: a backup timestamp in the future yields a negative age.
pub fn status_samples(status: &SystemStatus, now: DateTime<Utc>) -> Vec<Sample> {
    let backup_age = seconds_or_absent(status.last_backup_time.map(|t| now - t));
    let maintenance_remaining =
        seconds_or_absent(status.maintenance_expires_at.map(|t| t - now));

    vec![
        Sample::unlabeled(&BLACKLIST_SIZE, status.blacklisted_ip_count as f64),
        Sample::unlabeled(&CALLS_ACTIVE, status.calls_active as f64),
        Sample::unlabeled(&CALLS_LIMIT, status.max_sim_calls as f64),
        Sample::unlabeled(&EXTENSIONS_TOTAL, status.extensions_total as f64),
        Sample::unlabeled(&EXTENSIONS_REGISTERED, status.extensions_registered as f64),
        Sample::unlabeled(&BACKUP_AGE, backup_age),
        Sample::unlabeled(&MAINTENANCE_REMAINING, maintenance_remaining),
    ]
}

/// Translate one service into its status, CPU and memory samples.
pub fn service_samples(service: &Service) -> [Sample; 3] {
    let labels = vec![service.name.clone()];

    [
        Sample::labeled(&SERVICE_STATUS, labels.clone(), service.status as f64),
        Sample::labeled(&SERVICE_CPU, labels.clone(), service.cpu_usage),
        Sample::labeled(&SERVICE_MEMORY, labels, service.memory_used),
    ]
}

/// Translate one trunk into its registration sample.
pub fn trunk_sample(trunk: &Trunk) -> Sample {
    let registered = if trunk.is_registered { 1.0 } else { 0.0 };
    Sample::labeled(&TRUNK_REGISTERED, vec![trunk.name.clone()], registered)
}
