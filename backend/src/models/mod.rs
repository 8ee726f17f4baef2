pub mod msb;
pub mod project;
pub mod query;
pub mod time;

pub use msb::*;
pub use project::*;
pub use query::*;
pub use time::*;
