pub mod aggregate;
pub mod charts;
pub mod dates;
pub mod error;
pub mod format;
pub mod html;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod output;
pub mod pipeline;

pub use error::{ReportError, Result};
