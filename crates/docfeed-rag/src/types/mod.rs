//! Request and response types

pub mod query;
pub mod response;

pub use query::QueryRequest;
pub use response::IngestReport;
