//! Prometheus metrics exporter for PBX systems.
//!
//! On every scrape the exporter queries the PBX management API for the
//! system status, the service list and the trunk list, and translates the
//! snapshots into Prometheus samples. Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │   PBX JSON API  │<────│    Collector    │<────│   HTTP Server   │
//! │ (Status/Svc/Tr) │     │   (per scrape)  │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! A failing source is logged and skipped; the other sources still produce
//! samples. Rejected credentials end the scrape with no samples.
//!
//! # Usage
//!
//! ```bash
//! pbx-exporter --config pbx-exporter.json5
//! ```
//!
//! # Configuration
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod catalog;
pub mod client;
pub mod collector;
pub mod config;
pub mod exposition;
pub mod http;
pub mod sample;
pub mod translate;

pub use catalog::{MetricDesc, MetricKind, catalog};
pub use client::PbxClient;
pub use collector::{PbxCollector, SharedCollector};
pub use config::ExporterConfig;
pub use http::HttpServer;
pub use sample::Sample;
