//! Service layer for the queue status engine.
//!
//! Services sit between the repository layer and the HTTP handlers. They
//! sample the MSB query evaluator over a night, group the results by
//! project and order the projects for display.

pub mod error;
pub mod grouping;
pub mod priority;
pub mod queue_status;
pub mod report;
pub mod time_window;

pub use error::{QueueStatusError, QueueStatusResult};
pub use grouping::{group_queue_status, QueueStatusSummary};
pub use priority::{order_projects, rank_projects, representative_msb, ProjectOrder, RankedProject};
pub use queue_status::{query_queue_status, ProjectMsbs, QueueStatus, QueueStatusRequest};
pub use report::{build_report, ProjectStatus, QueueStatusReport};
pub use time_window::resolve_window;
