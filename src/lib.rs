pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::TomlConfig;
pub use core::{
    cleaner::clean, date_parser::parse_date_text, etl::EtlEngine, extractor::CardExtractor,
    json_repair::repair, pipeline::IndeedPipeline,
};
pub use domain::model::{ExportDocument, JobApplication};
pub use utils::error::{EtlError, Result};
