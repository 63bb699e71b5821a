pub mod core;
pub mod error;
pub mod filter;
pub mod query;
pub mod report;
pub mod visits;

// Re-exports
pub use error::{Error, Result};
pub use filter::{Filter, FilterBuilder, FilterOperator};
pub use query::QueryString;
pub use visits::VisitQueryParameters;
