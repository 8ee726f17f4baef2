//! # OMP Queue Status
//!
//! Observing-queue status engine for the OMP telescopes.
//!
//! For a telescope and UT date the engine asks the MSB query evaluator,
//! hour by hour across the night, which MSBs could be observed. The answers
//! are merged into one record per MSB carrying a 24-slot hour vector, then
//! grouped by project and ordered by project id or TAG priority.
//!
//! ## Architecture
//!
//! - [`models`]: MSBs, hour vectors, time windows and query filters
//! - [`db`]: Repository traits and the local catalog-backed repository
//! - [`config`]: Repository selection, affiliation codes and site windows
//! - [`services`]: Sampling, accumulation, grouping and ordering
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```
//! use omp_qstatus::config::{QueueStatusConfig, SiteConfig};
//! use omp_qstatus::db::LocalRepository;
//! use omp_qstatus::services::{group_queue_status, query_queue_status, QueueStatusRequest};
//! use chrono::NaiveDate;
//!
//! let repo = LocalRepository::new();
//! let request = QueueStatusRequest::new("JCMT")
//!     .on_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//! let status = query_queue_status(
//!     &repo,
//!     &SiteConfig::default(),
//!     &QueueStatusConfig::default(),
//!     &request,
//! )
//! .unwrap();
//! let summary = group_queue_status(&status);
//! assert!(summary.msb_counts.is_empty());
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
