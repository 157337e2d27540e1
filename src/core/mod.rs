pub mod cleaner;
pub mod date_parser;
pub mod etl;
pub mod extractor;
pub mod input;
pub mod json_repair;
pub mod pipeline;
pub mod summary;

pub use crate::domain::model::{ExtractionReport, JobApplication, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
