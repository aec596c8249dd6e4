//! Snapshots of PBX state as returned by the management API.
//!
//! Every fetch produces fresh values; nothing here is cached between scrapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// System-wide status of the PBX.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemStatus {
    /// Number of blocked IP addresses.
    #[serde(rename = "BlacklistedIpCount")]
    pub blacklisted_ip_count: i64,

    /// Calls currently in progress.
    pub calls_active: i64,

    /// Licensed maximum of simultaneous calls.
    pub max_sim_calls: i64,

    /// Configured extensions.
    pub extensions_total: i64,

    /// Extensions currently registered.
    pub extensions_registered: i64,

    /// Completion time of the last backup, if any was ever taken.
    #[serde(rename = "LastBackupDateTime", default)]
    pub last_backup_time: Option<DateTime<Utc>>,

    /// End of the maintenance window, if one is known.
    #[serde(default)]
    pub maintenance_expires_at: Option<DateTime<Utc>>,
}

/// A single service running on the PBX host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    /// Service name, used as the `name` label.
    pub name: String,

    /// Numeric status code as reported by the PBX.
    pub status: i64,

    /// CPU usage in percent.
    pub cpu_usage: f64,

    /// Memory in use.
    pub memory_used: f64,
}

/// A SIP trunk configured on the PBX.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trunk {
    /// Trunk name, used as the `name` label.
    pub name: String,

    /// Whether the trunk is registered with its provider.
    pub is_registered: bool,
}

impl Service {
    /// Create a service entry.
    pub fn new(name: impl Into<String>, status: i64, cpu_usage: f64, memory_used: f64) -> Self {
        Self {
            name: name.into(),
            status,
            cpu_usage,
            memory_used,
        }
    }
}

impl Trunk {
    /// Create a trunk entry.
    pub fn new(name: impl Into<String>, is_registered: bool) -> Self {
        Self {
            name: name.into(),
            is_registered,
        }
    }
}
