//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development

pub mod local;

pub use local::LocalRepository;
