//! HTTP server module for the queue status engine.
//!
//! This module provides an axum-based HTTP server that exposes queue status
//! runs as a REST API. Handlers parse query parameters, then run the
//! synchronous service layer on the blocking thread pool.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query string parsing and validation                    │
//! │  - JSON serialization                                     │
//! │  - CORS, compression, error mapping                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Hourly sampling and accumulation                       │
//! │  - Grouping and project ordering                          │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - MSB query evaluator, affiliations, project queues      │
//! │  - LocalRepository                                        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
