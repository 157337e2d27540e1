pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::TomlConfig;
    use crate::utils::error::Result;
    use crate::utils::logger::LogFormat;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "indeed-etl")]
    #[command(about = "Extract job application data from a saved Indeed 'My jobs' HTML page")]
    pub struct CliConfig {
        /// Path to the Indeed HTML file (defaults to searching the configured candidates)
        pub input: Option<String>,

        /// Path to a TOML file with schema, defaults and output settings
        #[arg(short, long)]
        pub config: Option<String>,

        /// Output JSON path
        #[arg(short, long)]
        pub output: Option<String>,

        /// Output formats: json, csv, tsv (comma-separated)
        #[arg(long, value_delimiter = ',')]
        pub format: Vec<String>,

        /// Label written to meta.source
        #[arg(long)]
        pub source: Option<String>,

        /// Also report the response rate for locations containing this text
        #[arg(long)]
        pub location: Option<String>,

        /// Do not back up an existing output file
        #[arg(long)]
        pub no_backup: bool,

        /// Extract and report without writing any files
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        /// Also append log lines to this file
        #[arg(long)]
        pub log_file: Option<PathBuf>,

        /// Console log format: compact or json
        #[arg(long, default_value = "compact")]
        pub log_format: LogFormat,
    }

    impl CliConfig {
        /// 載入 TOML 配置 (若有)，再套用命令列覆蓋設定並驗證
        pub fn resolve_config(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    tracing::info!("📁 Loading configuration from: {}", path);
                    TomlConfig::from_file(path)?
                }
                None => TomlConfig::default(),
            };

            self.apply_overrides(&mut config);
            config.validate()?;
            Ok(config)
        }

        pub fn apply_overrides(&self, config: &mut TomlConfig) {
            if let Some(output) = &self.output {
                config.output.path = output.clone();
            }
            if !self.format.is_empty() {
                config.output.formats = self.format.clone();
            }
            if let Some(source) = &self.source {
                config.output.source = source.clone();
            }
            if self.no_backup {
                config.output.backup = false;
            }
            if let Some(location) = &self.location {
                config.summary.location = Some(location.clone());
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core::ConfigProvider;

        #[test]
        fn test_defaults_without_arguments() {
            let cli = CliConfig::parse_from(["indeed-etl"]);
            let config = cli.resolve_config().unwrap();

            assert!(cli.input.is_none());
            assert_eq!(cli.log_format, LogFormat::Compact);
            assert_eq!(config.output_path(), "data/indeed-applications.json");
            assert!(config.backup_enabled());
        }

        #[test]
        fn test_flags_override_config() {
            let cli = CliConfig::parse_from([
                "indeed-etl",
                "saved.html",
                "--output",
                "out/apps.json",
                "--format",
                "json,csv",
                "--no-backup",
                "--log-format",
                "json",
            ]);
            let config = cli.resolve_config().unwrap();

            assert_eq!(cli.input.as_deref(), Some("saved.html"));
            assert_eq!(cli.log_format, LogFormat::Json);
            assert_eq!(config.output_path(), "out/apps.json");
            assert_eq!(config.output_formats(), ["json", "csv"]);
            assert!(!config.backup_enabled());
        }

        #[test]
        fn test_location_flag_sets_summary_filter() {
            let cli = CliConfig::parse_from(["indeed-etl", "--location", "Berlin"]);
            let config = cli.resolve_config().unwrap();

            assert_eq!(config.summary.location.as_deref(), Some("Berlin"));
            assert_eq!(config.summary.top_n, 5);
        }

        #[test]
        fn test_invalid_format_fails_validation() {
            let cli = CliConfig::parse_from(["indeed-etl", "--format", "xml"]);
            assert!(cli.resolve_config().is_err());
        }
    }
}
